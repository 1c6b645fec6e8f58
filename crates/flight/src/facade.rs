//! Re-exported APIs for consumers of the flight crate.

pub use crate::engine::{
    EngineError, FlightEngine, FlightRequest, InitialSolution, RecordedEngine,
};
pub use crate::environment::{AtmosphericModel, Environment, EnvironmentError};
pub use crate::scenario::{ScenarioError, ScenarioPlan, plan_scenario};
pub use crate::stages::handoff::{
    HandoffConfig, HandoffError, LaunchAttitudeSource, LongitudeBase, StageHandoff,
    plan_handoff,
};
pub use crate::stages::{
    FlightResult, StageError, StageSetup, StagedFlightConfig, StagedFlightError,
    StagedFlightProfile, UpperStage, run_comparison, run_stage, run_staged_flight,
};
pub use staging_vehicle::{Rocket, SolidMotor};

pub mod vehicle {
    use staging_config::{
        InterpolationConfig, MotorConfig, NoseKindConfig, RocketConfig, StageConfig,
        TriggerConfig,
    };
    use staging_recovery::{NoiseProfile, Parachute, RecoveryError, Trigger};
    use staging_vehicle::{
        FinSet, GrainGeometry, Interpolation, NoseCone, NoseKind, Rocket, SolidMotor, Tail,
    };
    use thiserror::Error;

    /// Errors surfaced when converting stage configuration into runtime vehicles.
    #[derive(Debug, Error)]
    pub enum VehicleError {
        #[error("`{field}` must be positive (got {value})")]
        NotPositive { field: &'static str, value: f64 },
        #[error("`{field}` must be finite (got {value})")]
        NotFinite { field: &'static str, value: f64 },
        #[error("grain inner radius {inner} m must be smaller than outer radius {outer} m")]
        GrainBore { inner: f64, outer: f64 },
        #[error("motor needs at least one grain")]
        NoGrains,
        #[error("fin set needs at least one fin")]
        NoFins,
        #[error("path for `{0}` is empty")]
        EmptyPath(&'static str),
        #[error("invalid parachute: {0}")]
        Recovery(#[from] RecoveryError),
    }

    fn positive(field: &'static str, value: f64) -> Result<f64, VehicleError> {
        if value > 0.0 && value.is_finite() {
            Ok(value)
        } else {
            Err(VehicleError::NotPositive { field, value })
        }
    }

    fn finite(field: &'static str, value: f64) -> Result<f64, VehicleError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(VehicleError::NotFinite { field, value })
        }
    }

    /// Convert a `MotorConfig` into a runtime `SolidMotor`.
    pub fn motor_from_config(config: &MotorConfig) -> Result<SolidMotor, VehicleError> {
        if config.thrust_source.as_os_str().is_empty() {
            return Err(VehicleError::EmptyPath("thrust_source"));
        }
        if config.grain_number == 0 {
            return Err(VehicleError::NoGrains);
        }
        let outer = positive("grain_outer_radius_m", config.grain_outer_radius_m)?;
        let inner = finite(
            "grain_initial_inner_radius_m",
            config.grain_initial_inner_radius_m,
        )?;
        if inner < 0.0 || inner >= outer {
            return Err(VehicleError::GrainBore { inner, outer });
        }

        Ok(SolidMotor {
            thrust_source: config.thrust_source.clone(),
            burn_out_s: positive("burn_out_s", config.burn_out_s)?,
            grain: GrainGeometry {
                number: config.grain_number,
                separation_m: finite("grain_separation_m", config.grain_separation_m)?,
                density_kg_m3: positive("grain_density_kg_m3", config.grain_density_kg_m3)?,
                outer_radius_m: outer,
                initial_inner_radius_m: inner,
                initial_height_m: positive(
                    "grain_initial_height_m",
                    config.grain_initial_height_m,
                )?,
            },
            nozzle_radius_m: positive("nozzle_radius_m", config.nozzle_radius_m)?,
            throat_radius_m: positive("throat_radius_m", config.throat_radius_m)?,
            interpolation: match config.interpolation {
                InterpolationConfig::Linear => Interpolation::Linear,
                InterpolationConfig::Spline => Interpolation::Spline,
                InterpolationConfig::Akima => Interpolation::Akima,
            },
        })
    }

    /// Convert a stage's motor and airframe configuration into a runtime `Rocket`.
    pub fn from_config(config: &StageConfig) -> Result<Rocket, VehicleError> {
        let motor = motor_from_config(&config.motor)?;
        rocket_from_config(&config.rocket, motor)
    }

    fn rocket_from_config(config: &RocketConfig, motor: SolidMotor) -> Result<Rocket, VehicleError> {
        if config.power_off_drag.as_os_str().is_empty() {
            return Err(VehicleError::EmptyPath("power_off_drag"));
        }
        if config.power_on_drag.as_os_str().is_empty() {
            return Err(VehicleError::EmptyPath("power_on_drag"));
        }

        let nose = match &config.nose {
            Some(nose) => Some(NoseCone {
                length_m: positive("nose.length_m", nose.length_m)?,
                kind: match nose.kind {
                    NoseKindConfig::VonKarman => NoseKind::VonKarman,
                    NoseKindConfig::Ogive => NoseKind::Ogive,
                    NoseKindConfig::Conical => NoseKind::Conical,
                    NoseKindConfig::Lvhaack => NoseKind::Lvhaack,
                },
                distance_to_cm_m: finite("nose.distance_to_cm_m", nose.distance_to_cm_m)?,
            }),
            None => None,
        };

        let fins = config
            .fins
            .iter()
            .map(|fins| -> Result<FinSet, VehicleError> {
                if fins.count == 0 {
                    return Err(VehicleError::NoFins);
                }
                Ok(FinSet {
                    count: fins.count,
                    span_m: positive("fins.span_m", fins.span_m)?,
                    root_chord_m: positive("fins.root_chord_m", fins.root_chord_m)?,
                    tip_chord_m: finite("fins.tip_chord_m", fins.tip_chord_m)?,
                    distance_to_cm_m: finite("fins.distance_to_cm_m", fins.distance_to_cm_m)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tail = match &config.tail {
            Some(tail) => Some(Tail {
                top_radius_m: positive("tail.top_radius_m", tail.top_radius_m)?,
                bottom_radius_m: positive("tail.bottom_radius_m", tail.bottom_radius_m)?,
                length_m: positive("tail.length_m", tail.length_m)?,
                distance_to_cm_m: finite("tail.distance_to_cm_m", tail.distance_to_cm_m)?,
            }),
            None => None,
        };

        let parachutes = config
            .parachutes
            .iter()
            .map(|cfg| -> Result<Parachute, VehicleError> {
                let parachute = Parachute {
                    name: cfg.name.clone(),
                    cd_s_m2: cfg.cd_s_m2,
                    trigger: match cfg.trigger {
                        TriggerConfig::Descending => Trigger::Descending,
                        TriggerConfig::DescendingBelow { altitude_m } => {
                            Trigger::DescendingBelow { altitude_m }
                        }
                    },
                    sampling_rate_hz: cfg.sampling_rate_hz,
                    lag_s: cfg.lag_s,
                    noise: NoiseProfile {
                        mean_pa: cfg.noise[0],
                        std_dev_pa: cfg.noise[1],
                        time_correlation: cfg.noise[2],
                    },
                };
                parachute.validate()?;
                Ok(parachute)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Rocket {
            motor,
            radius_m: positive("radius_m", config.radius_m)?,
            mass_kg: positive("mass_kg", config.mass_kg)?,
            inertia_i_kg_m2: positive("inertia_i_kg_m2", config.inertia_i_kg_m2)?,
            inertia_z_kg_m2: positive("inertia_z_kg_m2", config.inertia_z_kg_m2)?,
            distance_rocket_nozzle_m: finite(
                "distance_rocket_nozzle_m",
                config.distance_rocket_nozzle_m,
            )?,
            distance_rocket_propellant_m: finite(
                "distance_rocket_propellant_m",
                config.distance_rocket_propellant_m,
            )?,
            power_off_drag: config.power_off_drag.clone(),
            power_on_drag: config.power_on_drag.clone(),
            rail_buttons: config.rail_buttons,
            nose,
            fins,
            tail,
            parachutes,
        })
    }
}
