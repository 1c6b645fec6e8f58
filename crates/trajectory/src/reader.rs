//! CSV ingestion of engine output.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::{Component, FlightSolution, FlightState, SolutionError, StateVector};

const TIME_COLUMN: &str = "t";
const PRESSURE_COLUMN: &str = "pressure";

/// Read a flight solution from a CSV file with a header row.
///
/// Required columns are `t` plus the thirteen state channels (`x` .. `w3`), matched
/// case-insensitively in any order. An optional `pressure` column (Pa) is attached
/// when present.
pub fn read_solution(path: &Path, name: &str) -> Result<FlightSolution, SolutionError> {
    let csv_err = |source| SolutionError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = rdr.headers().map_err(csv_err)?.clone();

    let missing = |column| SolutionError::MissingColumn {
        path: path.to_path_buf(),
        column,
    };
    let time_idx = column_index(&headers, TIME_COLUMN).ok_or_else(|| missing(TIME_COLUMN))?;
    let mut state_idx = [0usize; 13];
    for component in Component::ALL {
        state_idx[component.index()] = column_index(&headers, component.column())
            .ok_or_else(|| missing(component.column()))?;
    }
    let pressure_idx = column_index(&headers, PRESSURE_COLUMN);

    let mut samples = Vec::new();
    let mut pressure = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let time_s = parse_field(&record, time_idx, path, row, TIME_COLUMN)?;
        let mut state: StateVector = [0.0; 13];
        for component in Component::ALL {
            state[component.index()] = parse_field(
                &record,
                state_idx[component.index()],
                path,
                row,
                component.column(),
            )?;
        }
        if let Some(idx) = pressure_idx {
            pressure.push(parse_field(&record, idx, path, row, PRESSURE_COLUMN)?);
        }
        samples.push(FlightState::from_state_vector(time_s, &state));
    }

    let solution = FlightSolution::new(name, samples)?;
    if pressure_idx.is_some() {
        solution.with_pressure(pressure)
    } else {
        Ok(solution)
    }
}

fn column_index(headers: &StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(column))
}

fn parse_field(
    record: &StringRecord,
    idx: usize,
    path: &Path,
    row: usize,
    column: &'static str,
) -> Result<f64, SolutionError> {
    record
        .get(idx)
        .and_then(|raw| raw.parse::<f64>().ok())
        .ok_or_else(|| SolutionError::InvalidValue {
            path: path.to_path_buf(),
            row: row + 1,
            column,
        })
}
