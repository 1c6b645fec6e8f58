mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn staging_reports_handoff_and_writes_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scenario = common::write_two_stage_scenario(dir.path());
    let out = dir.path().join("artifacts");

    Command::cargo_bin("staging")
        .expect("staging bin")
        .args([
            "--scenario",
            scenario.to_str().unwrap(),
            "--output-dir",
            out.to_str().unwrap(),
            "--plot",
            "--width",
            "400",
            "--height",
            "300",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Staged Flight: Two stage ==="))
        .stdout(predicate::str::contains("Separation     : t = 11.857 s"))
        .stdout(predicate::str::contains("Drogue triggered at"));

    let sidecar = fs::read_to_string(out.join("handoff.json")).expect("handoff sidecar");
    assert!(sidecar.contains("\"to_stage\": \"sustainer\""));
    assert!(sidecar.contains("\"date_utc\": \"2020-09-21T12:00:00Z\""));
    assert!(sidecar.contains("\"rail_length_m\": 0.0"));

    let mut rdr = csv::Reader::from_path(out.join("booster.csv")).expect("booster csv");
    let headers = rdr.headers().expect("headers").clone();
    assert_eq!(&headers[0], "t");
    assert_eq!(&headers[13], "w3");
    assert_eq!(rdr.records().count(), 81);

    let png = fs::metadata(out.join("altitude.png")).expect("png metadata");
    assert!(png.len() > 0, "PNG output should not be empty");
}

#[test]
fn staging_fails_on_single_stage_scenario() {
    let dir = tempfile::tempdir().expect("tempdir");
    common::write_trajectory(
        &dir.path().join("booster.csv"),
        &common::grid(0.0, 40.0, 0.5),
        common::booster_state,
    );
    let path = dir.path().join("single.toml");
    let mut manifest = format!("name = \"Single\"\n{}", common::ENVIRONMENT_TOML);
    manifest.push_str("\n[[stages]]");
    manifest.push_str(&common::stage_toml("stages.", "booster", "booster.csv", 7.857, false));
    fs::write(&path, manifest).unwrap();

    Command::cargo_bin("staging")
        .expect("staging bin")
        .args([
            "--scenario",
            path.to_str().unwrap(),
            "--output-dir",
            dir.path().join("out").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly two stages"));
}

#[test]
fn altitude_plot_overlays_recorded_flights() {
    let dir = tempfile::tempdir().expect("tempdir");
    let calisto = dir.path().join("calisto.csv");
    let dalisto = dir.path().join("dalisto.csv");
    common::write_trajectory(&calisto, &common::grid(0.0, 40.0, 0.5), common::booster_state);
    common::write_trajectory(&dalisto, &common::grid(0.0, 60.0, 0.5), common::upper_state);
    let png = dir.path().join("plots").join("altitude.png");

    Command::cargo_bin("altitude_plot")
        .expect("altitude_plot bin")
        .args([
            "--flight",
            &format!("Calisto={}", calisto.display()),
            "--flight",
            &format!("Dalisto={}", dalisto.display()),
            "--output",
            png.to_str().unwrap(),
            "--width",
            "400",
            "--height",
            "300",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Calisto: apogee = 2000.0 m"))
        .stdout(predicate::str::contains("Dalisto: apogee = 6500.0 m"));

    let metadata = fs::metadata(png).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

#[test]
fn altitude_plot_runs_scenario_stages_side_by_side() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scenario = common::write_two_stage_scenario(dir.path());
    let png = dir.path().join("compare.png");

    Command::cargo_bin("altitude_plot")
        .expect("altitude_plot bin")
        .args([
            "--scenario",
            scenario.to_str().unwrap(),
            "--output",
            png.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("booster: apogee"))
        .stdout(predicate::str::contains("sustainer: apogee"));

    assert!(fs::metadata(png).expect("png metadata").len() > 0);
}

#[test]
fn altitude_plot_requires_input() {
    Command::cargo_bin("altitude_plot")
        .expect("altitude_plot bin")
        .args(["--output", "unused.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--scenario"));
}

#[test]
fn staging_reports_library_version() {
    Command::cargo_bin("staging")
        .expect("staging bin")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(rocket_staging::version()));
}

#[test]
fn bundled_two_stage_scenario_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("staging")
        .expect("staging bin")
        .args([
            "--scenario",
            "data/scenarios/gtxr_two_stage.toml",
            "--output-dir",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Staged Flight: GTXR two stage ==="))
        .stdout(predicate::str::contains("Separation     : t = 11.857 s"))
        .stdout(predicate::str::contains("Main triggered at"));

    assert!(dir.path().join("sustainer.csv").exists());
    assert!(dir.path().join("handoff.json").exists());
}

#[test]
fn bundled_comparison_scenario_plots() {
    let dir = tempfile::tempdir().expect("tempdir");
    let png = dir.path().join("compare.png");
    Command::cargo_bin("altitude_plot")
        .expect("altitude_plot bin")
        .args([
            "--scenario",
            "data/scenarios/calisto_comparison.yaml",
            "--output",
            png.to_str().unwrap(),
            "--width",
            "400",
            "--height",
            "300",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("TestFlight: apogee"))
        .stdout(predicate::str::contains("TestFlight2: apogee"));
    assert!(fs::metadata(png).expect("png metadata").len() > 0);
}
