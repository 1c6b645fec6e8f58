use std::path::PathBuf;

use clap::Parser;
use rocket_staging::config::load_scenario;
use rocket_staging::flight::{plan_scenario, run_comparison};
use rocket_staging::plot::{AltitudeSeries, render_altitude_plot};
use rocket_staging::trajectory::{read_solution, summarize};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Overlay altitude vs. time for one or more named flights"
)]
struct Cli {
    /// Scenario manifest whose stages are flown independently in the same environment
    #[arg(long, conflicts_with = "flights")]
    scenario: Option<PathBuf>,

    /// Recorded flight as NAME=CSV (repeatable)
    #[arg(long = "flight", value_parser = parse_flight)]
    flights: Vec<(String, PathBuf)>,

    #[arg(long, default_value = "artifacts/altitude.png")]
    output: PathBuf,

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
    let series = if let Some(path) = &cli.scenario {
        let scenario = load_scenario(path)?;
        let plan = plan_scenario(&scenario)?;
        let results = run_comparison(&plan.engine, &plan.stages)?;
        results
            .into_iter()
            .map(|result| {
                report(&result.name, &result.summary);
                AltitudeSeries {
                    points: result.solution.altitude_series(),
                    name: result.name,
                }
            })
            .collect::<Vec<_>>()
    } else if !cli.flights.is_empty() {
        cli.flights
            .iter()
            .map(|(name, path)| -> anyhow::Result<AltitudeSeries> {
                let solution = read_solution(path, name)?;
                report(name, &summarize(&solution));
                Ok(AltitudeSeries {
                    name: name.clone(),
                    points: solution.altitude_series(),
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?
    } else {
        return Err(anyhow::anyhow!(
            "provide --scenario or at least one --flight NAME=CSV"
        ));
    };

    render_altitude_plot(&cli.output, &series, cli.width, cli.height)?;
    println!("Altitude plot written to {}", cli.output.display());
    Ok(())
}

fn report(name: &str, summary: &rocket_staging::trajectory::FlightSummary) {
    println!(
        "{name}: apogee = {:.1} m at {:.2} s, max speed = {:.1} m/s",
        summary.apogee_m, summary.apogee_time_s, summary.max_speed_m_s
    );
}

fn parse_flight(raw: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=CSV, got `{raw}`"))?;
    if name.trim().is_empty() || path.trim().is_empty() {
        return Err(format!("expected NAME=CSV, got `{raw}`"));
    }
    Ok((name.trim().to_string(), PathBuf::from(path.trim())))
}
