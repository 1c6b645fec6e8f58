//! Post-processing of a completed flight.

use crate::FlightSolution;

/// Headline figures of a flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSummary {
    pub apogee_m: f64,
    pub apogee_time_s: f64,
    pub max_speed_m_s: f64,
    pub max_speed_time_s: f64,
    pub duration_s: f64,
    pub final_altitude_m: f64,
}

/// Scan every sample for apogee and peak speed.
pub fn summarize(solution: &FlightSolution) -> FlightSummary {
    let samples = solution.samples();
    let first = samples[0];
    let mut summary = FlightSummary {
        apogee_m: first.altitude_m(),
        apogee_time_s: first.time_s,
        max_speed_m_s: first.speed_m_s(),
        max_speed_time_s: first.time_s,
        duration_s: solution.end_time() - solution.start_time(),
        final_altitude_m: samples[samples.len() - 1].altitude_m(),
    };
    for sample in &samples[1..] {
        if sample.altitude_m() > summary.apogee_m {
            summary.apogee_m = sample.altitude_m();
            summary.apogee_time_s = sample.time_s;
        }
        let speed = sample.speed_m_s();
        if speed > summary.max_speed_m_s {
            summary.max_speed_m_s = speed;
            summary.max_speed_time_s = sample.time_s;
        }
    }
    summary
}
