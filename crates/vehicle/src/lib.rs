//! Motor and airframe descriptors handed to the flight engine.

use std::f64::consts::PI;
use std::path::PathBuf;

use staging_recovery::Parachute;

/// Thrust-curve interpolation requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    #[default]
    Linear,
    Spline,
    Akima,
}

/// Propellant grain stack geometry.
#[derive(Debug, Clone)]
pub struct GrainGeometry {
    pub number: u32,
    pub separation_m: f64,
    pub density_kg_m3: f64,
    pub outer_radius_m: f64,
    pub initial_inner_radius_m: f64,
    pub initial_height_m: f64,
}

impl GrainGeometry {
    /// Mass of one hollow cylindrical grain at ignition.
    pub fn grain_mass_kg(&self) -> f64 {
        let annulus = PI * (self.outer_radius_m.powi(2) - self.initial_inner_radius_m.powi(2));
        annulus * self.initial_height_m * self.density_kg_m3
    }
}

/// Solid rocket motor. The thrust curve itself stays with the engine.
#[derive(Debug, Clone)]
pub struct SolidMotor {
    pub thrust_source: PathBuf,
    pub burn_out_s: f64,
    pub grain: GrainGeometry,
    pub nozzle_radius_m: f64,
    pub throat_radius_m: f64,
    pub interpolation: Interpolation,
}

impl SolidMotor {
    pub fn burn_out_time(&self) -> f64 {
        self.burn_out_s
    }

    /// Initial propellant mass across all grains.
    pub fn propellant_mass_kg(&self) -> f64 {
        self.grain.grain_mass_kg() * self.grain.number as f64
    }

    /// Nozzle exit to throat area ratio.
    pub fn expansion_ratio(&self) -> f64 {
        (self.nozzle_radius_m / self.throat_radius_m).powi(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoseKind {
    VonKarman,
    Ogive,
    Conical,
    Lvhaack,
}

#[derive(Debug, Clone)]
pub struct NoseCone {
    pub length_m: f64,
    pub kind: NoseKind,
    pub distance_to_cm_m: f64,
}

#[derive(Debug, Clone)]
pub struct FinSet {
    pub count: u32,
    pub span_m: f64,
    pub root_chord_m: f64,
    pub tip_chord_m: f64,
    pub distance_to_cm_m: f64,
}

#[derive(Debug, Clone)]
pub struct Tail {
    pub top_radius_m: f64,
    pub bottom_radius_m: f64,
    pub length_m: f64,
    pub distance_to_cm_m: f64,
}

/// Complete vehicle for one stage.
#[derive(Debug, Clone)]
pub struct Rocket {
    pub motor: SolidMotor,
    pub radius_m: f64,
    /// Mass without propellant.
    pub mass_kg: f64,
    pub inertia_i_kg_m2: f64,
    pub inertia_z_kg_m2: f64,
    pub distance_rocket_nozzle_m: f64,
    pub distance_rocket_propellant_m: f64,
    pub power_off_drag: PathBuf,
    pub power_on_drag: PathBuf,
    pub rail_buttons: Option<[f64; 2]>,
    pub nose: Option<NoseCone>,
    pub fins: Vec<FinSet>,
    pub tail: Option<Tail>,
    pub parachutes: Vec<Parachute>,
}

impl Rocket {
    /// Lift-off mass: airframe plus loaded propellant.
    pub fn initial_mass_kg(&self) -> f64 {
        self.mass_kg + self.motor.propellant_mass_kg()
    }

    pub fn parachute(&self, name: &str) -> Option<&Parachute> {
        self.parachutes
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
