//! Stage orchestrator that flies the booster, hands off at separation, and flies the
//! upper stage.

pub mod handoff;

use staging_recovery::{DeploymentEvent, RecoveryError, scan_deployment};
use staging_trajectory::{FlightSolution, FlightSummary, summarize};
use staging_vehicle::Rocket;
use tracing::info;

use self::handoff::{HandoffConfig, HandoffError, StageHandoff, plan_handoff};
use crate::engine::{EngineError, FlightEngine, FlightRequest, InitialSolution};
use crate::environment::{Environment, EnvironmentError};

/// Immutable description of a single flight.
#[derive(Debug, Clone)]
pub struct StageSetup {
    pub name: String,
    pub rocket: Rocket,
    pub environment: Environment,
    pub inclination_deg: f64,
    pub heading_deg: f64,
    pub initial_solution: Option<InitialSolution>,
}

/// Completed flight with its post-processing.
#[derive(Debug, Clone)]
pub struct FlightResult {
    pub name: String,
    pub solution: FlightSolution,
    pub summary: FlightSummary,
    /// One entry per parachute that fired, in rocket order.
    pub deployments: Vec<DeploymentEvent>,
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("invalid environment for `{name}`: {source}")]
    Environment {
        name: String,
        #[source]
        source: EnvironmentError,
    },
    #[error("launch angles for `{name}` must be finite (inclination {inclination_deg}, heading {heading_deg})")]
    LaunchAngles {
        name: String,
        inclination_deg: f64,
        heading_deg: f64,
    },
    #[error("engine failed: {0}")]
    Engine(#[from] EngineError),
    #[error("recovery scan failed: {0}")]
    Recovery(#[from] RecoveryError),
}

/// Fly one stage through the engine and post-process the result.
pub fn run_stage<E>(engine: &E, setup: &StageSetup) -> Result<FlightResult, StageError>
where
    E: FlightEngine + ?Sized,
{
    setup
        .environment
        .validate()
        .map_err(|source| StageError::Environment {
            name: setup.name.clone(),
            source,
        })?;
    if !setup.inclination_deg.is_finite() || !setup.heading_deg.is_finite() {
        return Err(StageError::LaunchAngles {
            name: setup.name.clone(),
            inclination_deg: setup.inclination_deg,
            heading_deg: setup.heading_deg,
        });
    }

    let request = FlightRequest {
        name: &setup.name,
        rocket: &setup.rocket,
        environment: &setup.environment,
        inclination_deg: setup.inclination_deg,
        heading_deg: setup.heading_deg,
        initial_solution: setup.initial_solution.as_ref(),
    };
    let solution = engine.fly(&request)?;
    let summary = summarize(&solution);

    let mut deployments = Vec::new();
    for parachute in &setup.rocket.parachutes {
        if let Some(event) = scan_deployment(parachute, &solution)? {
            deployments.push(event);
        }
    }

    info!(
        flight = %setup.name,
        apogee_m = summary.apogee_m,
        apogee_time_s = summary.apogee_time_s,
        deployments = deployments.len(),
        "flight complete"
    );

    Ok(FlightResult {
        name: setup.name.clone(),
        solution,
        summary,
        deployments,
    })
}

/// Upper stage before its launch site is known.
#[derive(Debug, Clone)]
pub struct UpperStage {
    pub name: String,
    pub rocket: Rocket,
    /// Used when the handoff does not derive a heading.
    pub heading_deg: f64,
}

/// Two-stage flight inputs.
#[derive(Debug, Clone)]
pub struct StagedFlightConfig {
    pub booster: StageSetup,
    pub upper: UpperStage,
    pub handoff: HandoffConfig,
}

/// Both flights plus the separation that links them.
#[derive(Debug, Clone)]
pub struct StagedFlightProfile {
    pub booster: FlightResult,
    pub handoff: StageHandoff,
    pub upper: FlightResult,
}

#[derive(Debug, thiserror::Error)]
pub enum StagedFlightError {
    #[error("booster flight failed: {0}")]
    Booster(#[source] StageError),
    #[error("stage handoff failed: {0}")]
    Handoff(#[from] HandoffError),
    #[error("upper-stage flight failed: {0}")]
    Upper(#[source] StageError),
}

/// Fly the booster to completion, derive the separation state, then fly the upper stage.
pub fn run_staged_flight<E>(
    engine: &E,
    config: &StagedFlightConfig,
) -> Result<StagedFlightProfile, StagedFlightError>
where
    E: FlightEngine + ?Sized,
{
    let booster = run_stage(engine, &config.booster).map_err(StagedFlightError::Booster)?;

    let handoff = plan_handoff(
        &booster.solution,
        &config.booster.environment,
        config.booster.rocket.motor.burn_out_time(),
        &config.handoff,
    )?;

    let upper_setup = StageSetup {
        name: config.upper.name.clone(),
        rocket: config.upper.rocket.clone(),
        environment: handoff.environment.clone(),
        inclination_deg: handoff.inclination_deg,
        heading_deg: handoff.heading_deg.unwrap_or(config.upper.heading_deg),
        initial_solution: Some(handoff.initial_solution),
    };
    let upper = run_stage(engine, &upper_setup).map_err(StagedFlightError::Upper)?;

    Ok(StagedFlightProfile {
        booster,
        handoff,
        upper,
    })
}

/// Fly independent rockets one after another, e.g. to compare airframes.
pub fn run_comparison<E>(engine: &E, setups: &[StageSetup]) -> Result<Vec<FlightResult>, StageError>
where
    E: FlightEngine + ?Sized,
{
    setups.iter().map(|setup| run_stage(engine, setup)).collect()
}
