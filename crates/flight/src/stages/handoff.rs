//! Stage separation: derive the upper stage's launch site and integrator seed from the
//! booster's state at ignition.

use staging_core::constants::EARTH_MEAN_RADIUS_M;
use staging_core::quaternion;
use staging_core::units::{deg_to_rad, rad_to_deg};
use staging_trajectory::{FlightSolution, FlightState, SolutionError};
use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::InitialSolution;
use crate::environment::Environment;

/// Which booster-site coordinate the east-west offset is added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongitudeBase {
    /// Offset the booster site's longitude.
    #[default]
    Longitude,
    /// Offset the booster site's latitude instead. Kept for replaying legacy runs.
    Latitude,
}

/// Source of the upper stage's launch inclination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchAttitudeSource {
    /// Inclination and heading of the body axis at ignition.
    #[default]
    BodyAxis,
    /// `w1` at ignition used directly as the inclination; heading left to the stage.
    AngularRateW1,
}

/// Stage-separation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandoffConfig {
    /// Coast between booster burnout and upper-stage ignition.
    pub ignition_delay_s: f64,
    pub earth_radius_m: f64,
    pub longitude_base: LongitudeBase,
    pub launch_attitude: LaunchAttitudeSource,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            ignition_delay_s: 4.0,
            earth_radius_m: EARTH_MEAN_RADIUS_M,
            longitude_base: LongitudeBase::default(),
            launch_attitude: LaunchAttitudeSource::default(),
        }
    }
}

/// Derived upper-stage launch conditions.
#[derive(Debug, Clone)]
pub struct StageHandoff {
    pub burnout_time_s: f64,
    pub handoff_time_s: f64,
    /// Booster state sampled at `handoff_time_s`.
    pub source_state: FlightState,
    pub environment: Environment,
    pub initial_solution: InitialSolution,
    pub inclination_deg: f64,
    /// `None` keeps the upper stage's configured heading.
    pub heading_deg: Option<f64>,
}

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("booster burnout time {0} s is not finite")]
    InvalidBurnout(f64),
    #[error("ignition delay {0} s must be finite and non-negative")]
    InvalidIgnitionDelay(f64),
    #[error("earth radius {0} m must be positive")]
    InvalidEarthRadius(f64),
    #[error("base latitude {0} deg is too close to a pole for a longitude offset")]
    PolarLatitude(f64),
    #[error("booster trajectory query failed: {0}")]
    Solution(#[from] SolutionError),
}

/// `burnout + delay`, rejecting negative or non-finite inputs.
pub fn handoff_time(burnout_time_s: f64, ignition_delay_s: f64) -> Result<f64, HandoffError> {
    if !burnout_time_s.is_finite() {
        return Err(HandoffError::InvalidBurnout(burnout_time_s));
    }
    if !(ignition_delay_s >= 0.0) || !ignition_delay_s.is_finite() {
        return Err(HandoffError::InvalidIgnitionDelay(ignition_delay_s));
    }
    Ok(burnout_time_s + ignition_delay_s)
}

/// Small-angle flat-Earth conversion of a local `(east, north)` displacement into
/// geodetic offsets from the booster site. Returns `(latitude, longitude)` in degrees,
/// normalised so the result is always a valid launch site.
pub fn geodetic_offset(
    site: &Environment,
    east_m: f64,
    north_m: f64,
    earth_radius_m: f64,
    base: LongitudeBase,
) -> Result<(f64, f64), HandoffError> {
    if !(earth_radius_m > 0.0) || !earth_radius_m.is_finite() {
        return Err(HandoffError::InvalidEarthRadius(earth_radius_m));
    }
    let cos_lat = deg_to_rad(site.latitude_deg).cos();
    if cos_lat.abs() < 1e-9 {
        return Err(HandoffError::PolarLatitude(site.latitude_deg));
    }
    let latitude = site.latitude_deg + rad_to_deg(north_m / earth_radius_m);
    let longitude_base = match base {
        LongitudeBase::Longitude => site.longitude_deg,
        LongitudeBase::Latitude => site.latitude_deg,
    };
    let longitude = longitude_base + rad_to_deg(east_m / earth_radius_m) / cos_lat;
    Ok(normalize_site(latitude, longitude))
}

/// Fold a latitude that crossed a pole back into `[-90, 90]` (moving to the opposite
/// meridian) and wrap longitude into `[-180, 180]`. In-range coordinates pass through
/// untouched.
fn normalize_site(latitude_deg: f64, longitude_deg: f64) -> (f64, f64) {
    let (latitude, mut longitude) = if latitude_deg > 90.0 {
        (180.0 - latitude_deg, longitude_deg + 180.0)
    } else if latitude_deg < -90.0 {
        (-180.0 - latitude_deg, longitude_deg + 180.0)
    } else {
        (latitude_deg, longitude_deg)
    };
    if !(-180.0..=180.0).contains(&longitude) {
        longitude = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    }
    (latitude, longitude)
}

/// Seed vector `[0, x, 0, z, vx, vy, 0, e0, e1, e2, e3, w1, w2, w3]` for the upper stage.
pub fn initial_solution(state: &FlightState) -> InitialSolution {
    let [x, _, z] = state.position_m;
    let [vx, vy, _] = state.velocity_m_s;
    let [e0, e1, e2, e3] = state.attitude;
    let [w1, w2, w3] = state.angular_velocity_rad_s;
    InitialSolution([
        0.0, x, 0.0, z, vx, vy, 0.0, e0, e1, e2, e3, w1, w2, w3,
    ])
}

/// Derive the upper stage's environment and initial conditions from a completed
/// booster flight.
///
/// The booster solution is queried once at `burnout + ignition_delay`; a query outside
/// its integrated span aborts the handoff.
pub fn plan_handoff(
    booster: &FlightSolution,
    booster_site: &Environment,
    burnout_time_s: f64,
    config: &HandoffConfig,
) -> Result<StageHandoff, HandoffError> {
    let t = handoff_time(burnout_time_s, config.ignition_delay_s)?;
    let state = booster.state_at(t)?;

    let (latitude_deg, longitude_deg) = geodetic_offset(
        booster_site,
        state.position_m[0],
        state.position_m[1],
        config.earth_radius_m,
        config.longitude_base,
    )?;
    if config.longitude_base == LongitudeBase::Latitude {
        warn!("upper-stage longitude offset is based on the booster latitude");
    }

    let environment = Environment {
        rail_length_m: 0.0,
        latitude_deg,
        longitude_deg,
        elevation_m: state.altitude_m(),
        date: booster_site.date,
        atmospheric_model: booster_site.atmospheric_model.clone(),
    };

    let (inclination_deg, heading_deg) = match config.launch_attitude {
        LaunchAttitudeSource::BodyAxis => {
            let (inclination, heading) = quaternion::inclination_heading_deg(&state.attitude);
            (inclination, Some(heading))
        }
        LaunchAttitudeSource::AngularRateW1 => {
            warn!("upper-stage inclination taken from booster angular rate w1");
            (state.angular_velocity_rad_s[0], None)
        }
    };

    debug!(
        handoff_time_s = t,
        latitude_deg,
        longitude_deg,
        elevation_m = environment.elevation_m,
        inclination_deg,
        "stage handoff derived"
    );

    Ok(StageHandoff {
        burnout_time_s,
        handoff_time_s: t,
        source_state: state,
        initial_solution: initial_solution(&state),
        environment,
        inclination_deg,
        heading_deg,
    })
}
