//! Parachute deployment triggers and recovery device models.
//!
//! Triggers are pure predicates over `(pressure, state vector)`. The engine calls them
//! at every sampling instant; nothing is cached between calls.

use staging_trajectory::{FlightSolution, SolutionError, StateVector};
use thiserror::Error;

const ALTITUDE: usize = 2;
const VERTICAL_VELOCITY: usize = 5;

/// Altitude below which the main canopy is allowed out (m).
pub const MAIN_DEPLOY_ALTITUDE_M: f64 = 800.0;

/// Fastest barometer sampling a parachute may request (Hz).
pub const MAX_SAMPLING_RATE_HZ: f64 = 10_000.0;

/// Deployment decision evaluated against live flight state.
pub trait DeploymentTrigger {
    fn should_deploy(&self, pressure_pa: f64, state: &StateVector) -> bool;
}

impl<F> DeploymentTrigger for F
where
    F: Fn(f64, &StateVector) -> bool,
{
    fn should_deploy(&self, pressure_pa: f64, state: &StateVector) -> bool {
        self(pressure_pa, state)
    }
}

/// Threshold-parameterised trigger rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Fire once the vehicle is past apogee.
    Descending,
    /// Fire when descending and strictly below `altitude_m`.
    DescendingBelow { altitude_m: f64 },
}

impl DeploymentTrigger for Trigger {
    fn should_deploy(&self, _pressure_pa: f64, state: &StateVector) -> bool {
        let descending = state[VERTICAL_VELOCITY] < 0.0;
        match *self {
            Trigger::Descending => descending,
            Trigger::DescendingBelow { altitude_m } => descending && state[ALTITUDE] < altitude_m,
        }
    }
}

/// Drogue rule: deploy at apogee.
pub fn drogue_trigger(pressure_pa: f64, state: &StateVector) -> bool {
    Trigger::Descending.should_deploy(pressure_pa, state)
}

/// Main rule: deploy on the way down below [`MAIN_DEPLOY_ALTITUDE_M`].
pub fn main_trigger(pressure_pa: f64, state: &StateVector) -> bool {
    Trigger::DescendingBelow {
        altitude_m: MAIN_DEPLOY_ALTITUDE_M,
    }
    .should_deploy(pressure_pa, state)
}

/// Pressure-signal noise handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoiseProfile {
    pub mean_pa: f64,
    pub std_dev_pa: f64,
    pub time_correlation: f64,
}

/// Recovery device attached to a rocket.
#[derive(Debug, Clone)]
pub struct Parachute {
    pub name: String,
    pub cd_s_m2: f64,
    pub trigger: Trigger,
    pub sampling_rate_hz: f64,
    pub lag_s: f64,
    pub noise: NoiseProfile,
}

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("parachute `{0}` needs a positive drag area")]
    InvalidDragArea(String),
    #[error("parachute `{name}` sampling rate {rate_hz} Hz is outside (0, 10000] Hz")]
    InvalidSamplingRate { name: String, rate_hz: f64 },
    #[error("parachute `{0}` has a negative deployment lag")]
    NegativeLag(String),
    #[error("parachute `{0}` has a non-positive deployment altitude")]
    InvalidAltitude(String),
    #[error("trajectory query failed: {0}")]
    Solution(#[from] SolutionError),
}

impl Parachute {
    pub fn validate(&self) -> Result<(), RecoveryError> {
        if !(self.cd_s_m2 > 0.0) {
            return Err(RecoveryError::InvalidDragArea(self.name.clone()));
        }
        if !(self.sampling_rate_hz > 0.0 && self.sampling_rate_hz <= MAX_SAMPLING_RATE_HZ) {
            return Err(RecoveryError::InvalidSamplingRate {
                name: self.name.clone(),
                rate_hz: self.sampling_rate_hz,
            });
        }
        if !(self.lag_s >= 0.0) {
            return Err(RecoveryError::NegativeLag(self.name.clone()));
        }
        if let Trigger::DescendingBelow { altitude_m } = self.trigger {
            if !(altitude_m > 0.0) {
                return Err(RecoveryError::InvalidAltitude(self.name.clone()));
            }
        }
        Ok(())
    }
}

/// When a parachute's trigger fired and when the canopy opened.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentEvent {
    pub parachute: String,
    pub triggered_at_s: f64,
    /// `triggered_at_s + lag_s`; may fall past the end of the recorded flight.
    pub deployed_at_s: f64,
}

/// Replay a parachute's trigger over a completed flight at its sampling rate.
///
/// Returns the first sampling instant at which the trigger fires. When the solution
/// carries no pressure channel the trigger receives `NaN` for pressure.
pub fn scan_deployment(
    parachute: &Parachute,
    solution: &FlightSolution,
) -> Result<Option<DeploymentEvent>, RecoveryError> {
    parachute.validate()?;
    let period = 1.0 / parachute.sampling_rate_hz;
    let start = solution.start_time();
    let end = solution.end_time();

    let mut k: u64 = 0;
    loop {
        let t = start + k as f64 * period;
        if t > end {
            return Ok(None);
        }
        let state = solution.state_at(t)?;
        let pressure = solution.pressure_at(t)?.unwrap_or(f64::NAN);
        if parachute
            .trigger
            .should_deploy(pressure, &state.state_vector())
        {
            return Ok(Some(DeploymentEvent {
                parachute: parachute.name.clone(),
                triggered_at_s: t,
                deployed_at_s: t + parachute.lag_s,
            }));
        }
        k += 1;
    }
}
