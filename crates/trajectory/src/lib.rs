//! Time-indexed flight solutions produced by the flight engine.
//!
//! A [`FlightSolution`] is an ordered list of [`FlightState`] samples. Queries between
//! samples interpolate every component linearly; queries outside the sampled span are
//! rejected with [`SolutionError::OutOfDomain`] rather than extrapolated.

use std::path::PathBuf;

use staging_core::quaternion::{self, Quaternion};
use staging_core::vector::{self, Vector3};
use thiserror::Error;

pub mod reader;
pub mod summary;

pub use reader::read_solution;
pub use summary::{FlightSummary, summarize};

/// Flat integrator state: `[x, y, z, vx, vy, vz, e0, e1, e2, e3, w1, w2, w3]`.
pub type StateVector = [f64; 13];

/// Position, velocity, attitude, and angular velocity at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    pub time_s: f64,
    /// Local tangent frame: x east, y north, z up.
    pub position_m: Vector3,
    pub velocity_m_s: Vector3,
    pub attitude: Quaternion,
    pub angular_velocity_rad_s: Vector3,
}

impl FlightState {
    /// Build a state from the flat integrator layout.
    pub fn from_state_vector(time_s: f64, y: &StateVector) -> Self {
        Self {
            time_s,
            position_m: [y[0], y[1], y[2]],
            velocity_m_s: [y[3], y[4], y[5]],
            attitude: [y[6], y[7], y[8], y[9]],
            angular_velocity_rad_s: [y[10], y[11], y[12]],
        }
    }

    /// Flatten into the integrator layout used by trigger predicates.
    pub fn state_vector(&self) -> StateVector {
        let p = self.position_m;
        let v = self.velocity_m_s;
        let q = self.attitude;
        let w = self.angular_velocity_rad_s;
        [
            p[0], p[1], p[2], v[0], v[1], v[2], q[0], q[1], q[2], q[3], w[0], w[1], w[2],
        ]
    }

    pub fn altitude_m(&self) -> f64 {
        self.position_m[2]
    }

    pub fn speed_m_s(&self) -> f64 {
        vector::norm(&self.velocity_m_s)
    }

    fn is_finite(&self) -> bool {
        self.time_s.is_finite() && self.state_vector().iter().all(|v| v.is_finite())
    }

    fn lerp(&self, other: &Self, time_s: f64) -> Self {
        let s = (time_s - self.time_s) / (other.time_s - self.time_s);
        Self {
            time_s,
            position_m: vector::lerp(&self.position_m, &other.position_m, s),
            velocity_m_s: vector::lerp(&self.velocity_m_s, &other.velocity_m_s, s),
            attitude: quaternion::lerp(&self.attitude, &other.attitude, s),
            angular_velocity_rad_s: vector::lerp(
                &self.angular_velocity_rad_s,
                &other.angular_velocity_rad_s,
                s,
            ),
        }
    }
}

/// Named scalar channels of a flight state, in state-vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    X,
    Y,
    Z,
    Vx,
    Vy,
    Vz,
    E0,
    E1,
    E2,
    E3,
    W1,
    W2,
    W3,
}

impl Component {
    pub const ALL: [Component; 13] = [
        Component::X,
        Component::Y,
        Component::Z,
        Component::Vx,
        Component::Vy,
        Component::Vz,
        Component::E0,
        Component::E1,
        Component::E2,
        Component::E3,
        Component::W1,
        Component::W2,
        Component::W3,
    ];

    /// Index into a [`StateVector`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name used in trajectory CSV files.
    pub fn column(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::Vx => "vx",
            Self::Vy => "vy",
            Self::Vz => "vz",
            Self::E0 => "e0",
            Self::E1 => "e1",
            Self::E2 => "e2",
            Self::E3 => "e3",
            Self::W1 => "w1",
            Self::W2 => "w2",
            Self::W3 => "w3",
        }
    }
}

/// Errors surfaced while building or querying a flight solution.
#[derive(Debug, Error)]
pub enum SolutionError {
    #[error("flight solution `{name}` has no samples")]
    Empty { name: String },
    #[error("sample {index} of `{name}` contains a non-finite value")]
    NonFinite { name: String, index: usize },
    #[error("sample times of `{name}` must strictly increase (violated at index {index})")]
    NonMonotonic { name: String, index: usize },
    #[error("query time must be finite (got {t})")]
    NonFiniteTime { t: f64 },
    #[error("time {t} s is outside the solution domain [{start}, {end}] s")]
    OutOfDomain { t: f64, start: f64, end: f64 },
    #[error("pressure series has {actual} entries but the solution has {expected} samples")]
    PressureLength { expected: usize, actual: usize },
    #[error("failed to read trajectory `{path}`: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("trajectory `{path}` is missing column `{column}`")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("trajectory `{path}` row {row}: column `{column}` is not a number")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: &'static str,
    },
}

/// Completed flight, queryable by time.
#[derive(Debug, Clone)]
pub struct FlightSolution {
    name: String,
    samples: Vec<FlightState>,
    pressure_pa: Option<Vec<f64>>,
}

impl FlightSolution {
    /// Validate and wrap engine samples. Times must be finite and strictly increasing.
    pub fn new(name: impl Into<String>, samples: Vec<FlightState>) -> Result<Self, SolutionError> {
        let name = name.into();
        if samples.is_empty() {
            return Err(SolutionError::Empty { name });
        }
        for (index, sample) in samples.iter().enumerate() {
            if !sample.is_finite() {
                return Err(SolutionError::NonFinite { name, index });
            }
            if index > 0 && sample.time_s <= samples[index - 1].time_s {
                return Err(SolutionError::NonMonotonic { name, index });
            }
        }
        Ok(Self {
            name,
            samples,
            pressure_pa: None,
        })
    }

    /// Attach the ambient pressure the engine reported at each sample.
    pub fn with_pressure(mut self, pressure_pa: Vec<f64>) -> Result<Self, SolutionError> {
        if pressure_pa.len() != self.samples.len() {
            return Err(SolutionError::PressureLength {
                expected: self.samples.len(),
                actual: pressure_pa.len(),
            });
        }
        self.pressure_pa = Some(pressure_pa);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[FlightState] {
        &self.samples
    }

    pub fn pressure_samples(&self) -> Option<&[f64]> {
        self.pressure_pa.as_deref()
    }

    pub fn start_time(&self) -> f64 {
        self.samples[0].time_s
    }

    pub fn end_time(&self) -> f64 {
        self.samples[self.samples.len() - 1].time_s
    }

    /// Whether `t` can be queried without error.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_time() && t <= self.end_time()
    }

    /// Interpolated state at `t`.
    pub fn state_at(&self, t: f64) -> Result<FlightState, SolutionError> {
        let (lo, hi) = self.bracket(t)?;
        if lo == hi {
            return Ok(self.samples[lo]);
        }
        Ok(self.samples[lo].lerp(&self.samples[hi], t))
    }

    /// Interpolated ambient pressure at `t`, when the engine reported one.
    pub fn pressure_at(&self, t: f64) -> Result<Option<f64>, SolutionError> {
        let (lo, hi) = self.bracket(t)?;
        let Some(pressure) = &self.pressure_pa else {
            return Ok(None);
        };
        if lo == hi {
            return Ok(Some(pressure[lo]));
        }
        let t0 = self.samples[lo].time_s;
        let t1 = self.samples[hi].time_s;
        let s = (t - t0) / (t1 - t0);
        Ok(Some(pressure[lo] + (pressure[hi] - pressure[lo]) * s))
    }

    /// Single channel at `t`.
    pub fn component(&self, component: Component, t: f64) -> Result<f64, SolutionError> {
        Ok(self.state_at(t)?.state_vector()[component.index()])
    }

    pub fn x(&self, t: f64) -> Result<f64, SolutionError> {
        self.component(Component::X, t)
    }

    pub fn y(&self, t: f64) -> Result<f64, SolutionError> {
        self.component(Component::Y, t)
    }

    pub fn z(&self, t: f64) -> Result<f64, SolutionError> {
        self.component(Component::Z, t)
    }

    pub fn vz(&self, t: f64) -> Result<f64, SolutionError> {
        self.component(Component::Vz, t)
    }

    pub fn w1(&self, t: f64) -> Result<f64, SolutionError> {
        self.component(Component::W1, t)
    }

    /// `(time, altitude)` pairs at every sample, for plotting.
    pub fn altitude_series(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .map(|s| (s.time_s, s.altitude_m()))
            .collect()
    }

    /// Indices of the samples surrounding `t`; equal when `t` hits a sample exactly.
    fn bracket(&self, t: f64) -> Result<(usize, usize), SolutionError> {
        if !t.is_finite() {
            return Err(SolutionError::NonFiniteTime { t });
        }
        if !self.contains(t) {
            return Err(SolutionError::OutOfDomain {
                t,
                start: self.start_time(),
                end: self.end_time(),
            });
        }
        let upper = self.samples.partition_point(|s| s.time_s <= t);
        let lo = upper - 1;
        if self.samples[lo].time_s == t || upper == self.samples.len() {
            Ok((lo, lo))
        } else {
            Ok((lo, upper))
        }
    }
}
