use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;
use rocket_staging::config::load_scenario;
use rocket_staging::export::handoff::{EnvironmentRecord, HandoffSidecar, write_sidecar};
use rocket_staging::export::{trajectory as trajectory_csv, writer_for_path};
use rocket_staging::flight::{FlightResult, Rocket, plan_scenario, run_staged_flight};
use rocket_staging::plot::{AltitudeSeries, render_altitude_plot};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Fly a two-stage rocket, handing the booster state to the upper stage at separation"
)]
struct Cli {
    /// Scenario manifest (TOML or YAML) listing exactly two stages
    #[arg(long)]
    scenario: PathBuf,

    /// Directory receiving trajectory CSVs, the handoff sidecar, and plots
    #[arg(long, default_value = "artifacts")]
    output_dir: PathBuf,

    /// Render an altitude plot of both stages
    #[arg(long, default_value_t = false)]
    plot: bool,

    #[arg(long, default_value_t = 1200)]
    width: u32,

    #[arg(long, default_value_t = 900)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let scenario = load_scenario(&cli.scenario)?;
    let plan = plan_scenario(&scenario)?;
    let scenario_name = plan.name.clone();
    let (engine, config) = plan.into_staged()?;
    let profile = run_staged_flight(&engine, &config)?;
    let handoff = &profile.handoff;
    let site = &handoff.environment;

    println!("=== Staged Flight: {} ===", scenario_name);
    print_vehicle("Booster vehicle", &config.booster.rocket);
    print_flight("Booster flight ", &profile.booster);
    println!(
        "Separation     : t = {:.3} s (burnout {:.3} s + delay {:.3} s)",
        handoff.handoff_time_s, handoff.burnout_time_s, config.handoff.ignition_delay_s
    );
    println!(
        "Upper site     : lat = {:.6} deg, lon = {:.6} deg, elevation = {:.1} m, rail = {:.1} m",
        site.latitude_deg, site.longitude_deg, site.elevation_m, site.rail_length_m
    );
    let upper_heading = handoff.heading_deg.unwrap_or(config.upper.heading_deg);
    println!(
        "Upper launch   : inclination = {:.2} deg, heading = {:.2} deg",
        handoff.inclination_deg, upper_heading
    );
    print_vehicle("Upper vehicle  ", &config.upper.rocket);
    print_flight("Upper flight   ", &profile.upper);

    for result in [&profile.booster, &profile.upper] {
        let path = cli.output_dir.join(format!("{}.csv", result.name));
        let mut writer = writer_for_path(&path)?;
        trajectory_csv::write_solution(writer.as_mut(), &result.solution)?;
    }

    let sidecar = HandoffSidecar {
        scenario: &scenario_name,
        from_stage: &profile.booster.name,
        to_stage: &profile.upper.name,
        burnout_time_s: handoff.burnout_time_s,
        ignition_delay_s: config.handoff.ignition_delay_s,
        handoff_time_s: handoff.handoff_time_s,
        environment: EnvironmentRecord {
            rail_length_m: site.rail_length_m,
            latitude_deg: site.latitude_deg,
            longitude_deg: site.longitude_deg,
            elevation_m: site.elevation_m,
            date_utc: format_date(&site.date),
        },
        inclination_deg: handoff.inclination_deg,
        heading_deg: upper_heading,
        initial_solution: *handoff.initial_solution.as_array(),
    };
    write_sidecar(&cli.output_dir.join("handoff.json"), &sidecar)?;

    if cli.plot {
        let series = [&profile.booster, &profile.upper]
            .into_iter()
            .map(|result| AltitudeSeries {
                name: result.name.clone(),
                points: result.solution.altitude_series(),
            })
            .collect::<Vec<_>>();
        render_altitude_plot(
            &cli.output_dir.join("altitude.png"),
            &series,
            cli.width,
            cli.height,
        )?;
    }

    Ok(())
}

fn print_vehicle(label: &str, rocket: &Rocket) {
    println!(
        "{label}: lift-off mass = {:.2} kg (propellant {:.2} kg), burnout = {:.3} s, expansion ratio = {:.2}",
        rocket.initial_mass_kg(),
        rocket.motor.propellant_mass_kg(),
        rocket.motor.burn_out_time(),
        rocket.motor.expansion_ratio()
    );
}

fn print_flight(label: &str, result: &FlightResult) {
    let s = &result.summary;
    println!(
        "{label}: `{}` apogee = {:.1} m at {:.2} s, max speed = {:.1} m/s at {:.2} s, duration = {:.2} s",
        result.name, s.apogee_m, s.apogee_time_s, s.max_speed_m_s, s.max_speed_time_s, s.duration_s
    );
    for event in &result.deployments {
        println!(
            "                 {} triggered at {:.2} s, deployed at {:.2} s",
            event.parachute, event.triggered_at_s, event.deployed_at_s
        );
    }
}

fn format_date(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
