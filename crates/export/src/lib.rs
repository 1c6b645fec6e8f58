//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod trajectory {
    use std::io::{self, Write};

    use staging_trajectory::{Component, FlightSolution, FlightState};

    /// Header matching the layout accepted by `staging_trajectory::read_solution`.
    pub fn header(with_pressure: bool) -> String {
        let mut columns = vec!["t"];
        columns.extend(Component::ALL.iter().map(|c| c.column()));
        if with_pressure {
            columns.push("pressure");
        }
        columns.join(",")
    }

    /// Serialize one sample, matching the header ordering.
    pub fn write_state(
        writer: &mut dyn Write,
        state: &FlightState,
        pressure_pa: Option<f64>,
    ) -> io::Result<()> {
        write!(writer, "{}", state.time_s)?;
        for value in state.state_vector() {
            write!(writer, ",{}", value)?;
        }
        if let Some(p) = pressure_pa {
            write!(writer, ",{}", p)?;
        }
        writeln!(writer)
    }

    /// Write every sample of a solution, header first.
    pub fn write_solution(writer: &mut dyn Write, solution: &FlightSolution) -> io::Result<()> {
        let pressure = solution.pressure_samples();
        writeln!(writer, "{}", header(pressure.is_some()))?;
        for (idx, state) in solution.samples().iter().enumerate() {
            write_state(writer, state, pressure.map(|p| p[idx]))?;
        }
        writer.flush()
    }
}

pub mod handoff {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// Stage-2 launch site as exported.
    #[derive(Debug, Clone, Serialize)]
    pub struct EnvironmentRecord {
        pub rail_length_m: f64,
        pub latitude_deg: f64,
        pub longitude_deg: f64,
        pub elevation_m: f64,
        pub date_utc: String,
    }

    /// JSON sidecar describing how stage 2 was seeded from stage 1.
    #[derive(Debug, Clone, Serialize)]
    pub struct HandoffSidecar<'a> {
        pub scenario: &'a str,
        pub from_stage: &'a str,
        pub to_stage: &'a str,
        pub burnout_time_s: f64,
        pub ignition_delay_s: f64,
        pub handoff_time_s: f64,
        pub environment: EnvironmentRecord,
        pub inclination_deg: f64,
        pub heading_deg: f64,
        pub initial_solution: [f64; 14],
    }

    /// Write the sidecar as pretty JSON, creating parent directories as needed.
    pub fn write_sidecar(output: &Path, sidecar: &HandoffSidecar<'_>) -> io::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(output)?, sidecar)?;
        Ok(())
    }
}
