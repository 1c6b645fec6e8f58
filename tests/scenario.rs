mod common;

use std::fs;

use rocket_staging::config::{
    ConfigError, LaunchAttitudeConfig, TriggerConfig, load_scenario, load_stage_configs,
};
use rocket_staging::flight::{
    ScenarioError, plan_scenario, run_comparison, run_staged_flight,
};
use rocket_staging::recovery::Trigger;

#[test]
fn toml_scenario_resolves_paths_against_its_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = common::write_two_stage_scenario(dir.path());
    let scenario = load_scenario(&path).expect("scenario");

    assert_eq!(scenario.name, "Two stage");
    assert_eq!(scenario.stages.len(), 2);
    assert_eq!(scenario.stages[0].trajectory, dir.path().join("booster.csv"));
    assert_eq!(
        scenario.stages[1].motor.thrust_source,
        dir.path().join("thrust/sustainer.eng")
    );
    let staging = scenario.staging.as_ref().expect("staging table");
    assert_eq!(staging.ignition_delay_s, 4.0);
    assert_eq!(staging.earth_radius_m, 6_378_000.0);
    assert_eq!(staging.launch_attitude, LaunchAttitudeConfig::BodyAxis);
    assert_eq!(
        scenario.stages[1].rocket.parachutes[1].trigger,
        TriggerConfig::DescendingBelow { altitude_m: 800.0 }
    );
}

#[test]
fn yaml_scenario_with_included_stage_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = dir.path().join("stages");
    fs::create_dir(&catalog).unwrap();
    fs::write(
        catalog.join("a_booster.toml"),
        common::stage_toml("", "booster", "booster.csv", 7.857, false),
    )
    .unwrap();
    fs::write(
        catalog.join("b_sustainer.toml"),
        common::stage_toml("", "sustainer", "sustainer.csv", 3.9, true),
    )
    .unwrap();
    fs::write(catalog.join("notes.txt"), "ignored").unwrap();

    let manifest = dir.path().join("scenario.yaml");
    fs::write(
        &manifest,
        "name: Included\n\
         environment:\n  rail_length_m: 10.0\n  latitude_deg: 32.99\n  longitude_deg: -106.97\n  elevation_m: 1400.0\n  date: [2020, 9, 21, 12]\n\
         include:\n  - stages\n",
    )
    .unwrap();

    let scenario = load_scenario(&manifest).expect("scenario");
    let names: Vec<_> = scenario.stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["booster", "sustainer"]);
    assert_eq!(scenario.stages[0].trajectory, catalog.join("booster.csv"));
    assert!(scenario.staging.is_none());

    let stages = load_stage_configs(&catalog).expect("catalog");
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[0].inclination_deg, 85.0);
}

#[test]
fn scenario_without_stages_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.toml");
    fs::write(&path, format!("name = \"Empty\"\n{}", common::ENVIRONMENT_TOML)).unwrap();
    assert!(matches!(
        load_scenario(&path),
        Err(ConfigError::EmptyScenario { .. })
    ));
}

#[test]
fn plan_converts_stages_into_runtime_rockets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scenario = load_scenario(common::write_two_stage_scenario(dir.path())).expect("scenario");
    let plan = plan_scenario(&scenario).expect("plan");

    assert_eq!(plan.stages.len(), 2);
    let sustainer = &plan.stages[1];
    assert_eq!(sustainer.environment.latitude_deg, 32.990254);
    assert_eq!(sustainer.rocket.parachutes.len(), 2);
    assert_eq!(
        sustainer.rocket.parachute("Main").map(|p| p.trigger),
        Some(Trigger::DescendingBelow { altitude_m: 800.0 })
    );
    assert!(plan.engine.recording("booster").is_some());
}

#[test]
fn duplicate_stage_names_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut scenario =
        load_scenario(common::write_two_stage_scenario(dir.path())).expect("scenario");
    scenario.stages[1].name = "booster".to_string();
    assert!(matches!(
        plan_scenario(&scenario),
        Err(ScenarioError::DuplicateStage(name)) if name == "booster"
    ));
}

#[test]
fn invalid_launch_site_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut scenario =
        load_scenario(common::write_two_stage_scenario(dir.path())).expect("scenario");
    scenario.environment.latitude_deg = 95.0;
    assert!(matches!(
        plan_scenario(&scenario),
        Err(ScenarioError::Environment(_))
    ));
}

#[test]
fn staged_flight_seeds_upper_stage_from_booster() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scenario = load_scenario(common::write_two_stage_scenario(dir.path())).expect("scenario");
    let (engine, config) = plan_scenario(&scenario)
        .expect("plan")
        .into_staged()
        .expect("two stages");
    let profile = run_staged_flight(&engine, &config).expect("staged flight");

    assert_eq!(profile.booster.name, "booster");
    assert_eq!(profile.upper.name, "sustainer");
    assert!((profile.handoff.handoff_time_s - 11.857).abs() < 1e-12);
    assert_eq!(
        profile.handoff.environment.elevation_m,
        profile.booster.solution.z(11.857).unwrap()
    );
    assert_eq!(profile.booster.summary.apogee_m, 2000.0);
    assert_eq!(profile.upper.summary.apogee_m, 6500.0);

    let drogue = &profile.upper.deployments[0];
    assert_eq!(drogue.parachute, "Drogue");
    assert!(drogue.triggered_at_s > 29.99 && drogue.triggered_at_s < 30.11);
    assert_eq!(profile.upper.deployments.len(), 1);
}

#[test]
fn comparison_runs_every_stage_from_the_launch_site() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scenario = load_scenario(common::write_two_stage_scenario(dir.path())).expect("scenario");
    let plan = plan_scenario(&scenario).expect("plan");
    let results = run_comparison(&plan.engine, &plan.stages).expect("comparison");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.solution.start_time() == 0.0));
}

#[test]
fn single_stage_scenario_cannot_be_staged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut scenario =
        load_scenario(common::write_two_stage_scenario(dir.path())).expect("scenario");
    scenario.stages.truncate(1);
    let plan = plan_scenario(&scenario).expect("plan");
    assert!(matches!(
        plan.into_staged(),
        Err(ScenarioError::NotTwoStage { count: 1, .. })
    ));
}

#[test]
fn bundled_scenarios_parse() {
    let staged = load_scenario("data/scenarios/gtxr_two_stage.toml").expect("gtxr scenario");
    assert_eq!(staged.stages.len(), 2);
    assert_eq!(staged.stages[1].inclination_deg, 85.0);
    let plan = plan_scenario(&staged).expect("gtxr plan");
    assert!((plan.stages[0].rocket.motor.burn_out_time() - 7.8570528).abs() < 1e-12);

    let comparison =
        load_scenario("data/scenarios/calisto_comparison.yaml").expect("comparison scenario");
    let plan = plan_scenario(&comparison).expect("comparison plan");
    assert_eq!(plan.stages.len(), 2);
    assert!(plan.stages.iter().all(|s| s.rocket.parachutes.len() == 2));
    assert!(plan.stages[1].rocket.tail.is_some());
}
