//! Seam between stage sequencing and the numerical flight engine.
//!
//! The engine integrates the rigid-body dynamics; this crate only hands it a rocket, an
//! environment, and launch conditions, then consumes the time-indexed solution.

use std::collections::BTreeMap;
use std::path::PathBuf;

use staging_trajectory::{self as trajectory, FlightSolution, SolutionError};
use staging_vehicle::Rocket;
use thiserror::Error;
use tracing::debug;

use crate::environment::Environment;

/// Fourteen-element integrator seed: `[t, x, y, z, vx, vy, vz, e0, e1, e2, e3, w1, w2, w3]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialSolution(pub [f64; 14]);

impl InitialSolution {
    pub fn as_array(&self) -> &[f64; 14] {
        &self.0
    }

    pub fn time_s(&self) -> f64 {
        self.0[0]
    }
}

/// Everything the engine needs to fly one stage.
#[derive(Debug, Clone, Copy)]
pub struct FlightRequest<'a> {
    pub name: &'a str,
    pub rocket: &'a Rocket,
    pub environment: &'a Environment,
    pub inclination_deg: f64,
    pub heading_deg: f64,
    pub initial_solution: Option<&'a InitialSolution>,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no recorded trajectory registered for flight `{0}`")]
    NoRecording(String),
    #[error("engine rejected flight `{name}`: {reason}")]
    Rejected { name: String, reason: String },
    #[error("engine output unusable: {0}")]
    Solution(#[from] SolutionError),
}

/// Numerical flight engine.
pub trait FlightEngine {
    /// Integrate a complete flight. Must return only once the solution is final.
    fn fly(&self, request: &FlightRequest<'_>) -> Result<FlightSolution, EngineError>;
}

/// Engine that replays solutions previously produced by an external integrator.
#[derive(Debug, Clone, Default)]
pub struct RecordedEngine {
    recordings: BTreeMap<String, PathBuf>,
}

impl RecordedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the CSV trajectory to replay for flight `name`.
    pub fn with_recording(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.recordings.insert(name.into(), path.into());
        self
    }

    pub fn recording(&self, name: &str) -> Option<&PathBuf> {
        self.recordings.get(name)
    }
}

impl FlightEngine for RecordedEngine {
    fn fly(&self, request: &FlightRequest<'_>) -> Result<FlightSolution, EngineError> {
        let path = self
            .recordings
            .get(request.name)
            .ok_or_else(|| EngineError::NoRecording(request.name.to_string()))?;
        debug!(flight = request.name, path = %path.display(), "replaying recorded trajectory");
        let solution = trajectory::read_solution(path, request.name)?;
        if let Some(initial) = request.initial_solution {
            if !solution.contains(initial.time_s()) {
                return Err(EngineError::Rejected {
                    name: request.name.to_string(),
                    reason: format!(
                        "recording does not cover the initial time {} s",
                        initial.time_s()
                    ),
                });
            }
        }
        Ok(solution)
    }
}
