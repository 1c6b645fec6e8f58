#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use rocket_staging::trajectory::{FlightSolution, FlightState, StateVector};

/// Ballistic arc used across the tests: east 10 m/s, north 20 m/s, `z = 200 t - 5 t^2`.
pub fn booster_state(t: f64) -> FlightState {
    let y: StateVector = [
        10.0 * t,
        20.0 * t,
        200.0 * t - 5.0 * t * t,
        10.0,
        20.0,
        200.0 - 10.0 * t,
        1.0,
        0.0,
        0.0,
        0.0,
        0.01 * t,
        0.0,
        0.0,
    ];
    FlightState::from_state_vector(t, &y)
}

/// Vertical climb from 2000 m, apogee 6500 m at 30 s; used for the upper stage.
pub fn upper_state(t: f64) -> FlightState {
    let y: StateVector = [
        120.0,
        240.0,
        2000.0 + 300.0 * t - 5.0 * t * t,
        0.0,
        0.0,
        300.0 - 10.0 * t,
        1.0,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
    ];
    FlightState::from_state_vector(t, &y)
}

/// Sample times `start, start + step, ..` up to and including `end`.
pub fn grid(start: f64, end: f64, step: f64) -> Vec<f64> {
    let n = ((end - start) / step).round() as usize;
    (0..=n).map(|i| start + i as f64 * step).collect()
}

pub fn booster_solution() -> FlightSolution {
    let samples = grid(0.0, 40.0, 0.5).into_iter().map(booster_state).collect();
    FlightSolution::new("booster", samples).expect("booster solution")
}

pub fn write_trajectory(path: &Path, times: &[f64], state: fn(f64) -> FlightState) {
    let mut file = File::create(path).expect("trajectory create");
    writeln!(file, "t,x,y,z,vx,vy,vz,e0,e1,e2,e3,w1,w2,w3").unwrap();
    for &t in times {
        let s = state(t);
        write!(file, "{}", s.time_s).unwrap();
        for v in s.state_vector() {
            write!(file, ",{}", v).unwrap();
        }
        writeln!(file).unwrap();
    }
}

/// One stage as TOML. `prefix` is `"stages."` when the stage sits inside a scenario's
/// `[[stages]]` array and empty for a standalone stage file.
pub fn stage_toml(
    prefix: &str,
    name: &str,
    trajectory: &str,
    burn_out_s: f64,
    with_parachutes: bool,
) -> String {
    let mut out = format!(
        r#"
name = "{name}"
inclination_deg = 85.0
heading_deg = 0.0
trajectory = "{trajectory}"

[{prefix}motor]
thrust_source = "thrust/{name}.eng"
burn_out_s = {burn_out_s}
grain_number = 5
grain_separation_m = 0.005
grain_density_kg_m3 = 1815.0
grain_outer_radius_m = 0.033
grain_initial_inner_radius_m = 0.015
grain_initial_height_m = 0.12
nozzle_radius_m = 0.033
throat_radius_m = 0.011

[{prefix}rocket]
radius_m = 0.0635
mass_kg = 16.24
inertia_i_kg_m2 = 6.6
inertia_z_kg_m2 = 0.0351
distance_rocket_nozzle_m = -1.255
distance_rocket_propellant_m = -0.85704
power_off_drag = "drag/power_off.csv"
power_on_drag = "drag/power_on.csv"
rail_buttons = [0.2, -0.5]

[{prefix}rocket.nose]
length_m = 0.55829
kind = "von_karman"
distance_to_cm_m = 0.71971

[[{prefix}rocket.fins]]
count = 4
span_m = 0.1
root_chord_m = 0.12
tip_chord_m = 0.04
distance_to_cm_m = -1.04956
"#
    );
    if with_parachutes {
        out.push_str(&format!(
            r#"
[[{prefix}rocket.parachutes]]
name = "Drogue"
cd_s_m2 = 1.0
trigger = {{ type = "descending" }}
sampling_rate_hz = 10.0
lag_s = 1.5
noise = [0.0, 8.3, 0.5]

[[{prefix}rocket.parachutes]]
name = "Main"
cd_s_m2 = 10.0
trigger = {{ type = "descending_below", altitude_m = 800.0 }}
sampling_rate_hz = 10.0
lag_s = 1.5
noise = [0.0, 8.3, 0.5]
"#
        ));
    }
    out
}

pub const ENVIRONMENT_TOML: &str = r#"
[environment]
rail_length_m = 10.0
latitude_deg = 32.990254
longitude_deg = -106.974998
elevation_m = 1400.0
date = [2020, 9, 21, 12]
"#;

/// Two-stage scenario in `dir`: `scenario.toml`, `booster.csv`, and `sustainer.csv`.
pub fn write_two_stage_scenario(dir: &Path) -> std::path::PathBuf {
    write_trajectory(&dir.join("booster.csv"), &grid(0.0, 40.0, 0.5), booster_state);
    write_trajectory(&dir.join("sustainer.csv"), &grid(0.0, 60.0, 0.5), upper_state);

    let mut manifest = String::from("name = \"Two stage\"\n");
    manifest.push_str(ENVIRONMENT_TOML);
    manifest.push_str("\n[staging]\nignition_delay_s = 4.0\n");
    for (name, csv, burnout, chutes) in [
        ("booster", "booster.csv", 7.857, false),
        ("sustainer", "sustainer.csv", 3.9, true),
    ] {
        manifest.push_str("\n[[stages]]");
        manifest.push_str(&stage_toml("stages.", name, csv, burnout, chutes));
    }
    let path = dir.join("scenario.toml");
    fs::write(&path, manifest).expect("scenario write");
    path
}
