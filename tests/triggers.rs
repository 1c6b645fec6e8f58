mod common;

use rocket_staging::recovery::{
    DeploymentTrigger, MAIN_DEPLOY_ALTITUDE_M, MAX_SAMPLING_RATE_HZ, NoiseProfile, Parachute,
    RecoveryError, Trigger, drogue_trigger, main_trigger, scan_deployment,
};
use rocket_staging::trajectory::StateVector;

fn state(altitude_m: f64, vertical_velocity_m_s: f64) -> StateVector {
    let mut y = [0.0; 13];
    y[2] = altitude_m;
    y[5] = vertical_velocity_m_s;
    y[6] = 1.0;
    y
}

fn parachute(name: &str, trigger: Trigger) -> Parachute {
    Parachute {
        name: name.to_string(),
        cd_s_m2: 1.0,
        trigger,
        sampling_rate_hz: 10.0,
        lag_s: 1.5,
        noise: NoiseProfile {
            mean_pa: 0.0,
            std_dev_pa: 8.3,
            time_correlation: 0.5,
        },
    }
}

#[test]
fn drogue_fires_only_when_descending() {
    assert!(drogue_trigger(101_325.0, &state(3000.0, -1.0)));
    assert!(!drogue_trigger(101_325.0, &state(3000.0, 1.0)));
    assert!(!drogue_trigger(101_325.0, &state(3000.0, 0.0)));
}

#[test]
fn drogue_ignores_pressure() {
    assert!(drogue_trigger(f64::NAN, &state(10.0, -1.0)));
}

#[test]
fn main_fires_below_eight_hundred_metres_on_descent() {
    assert_eq!(MAIN_DEPLOY_ALTITUDE_M, 800.0);
    assert!(main_trigger(0.0, &state(799.0, -5.0)));
    assert!(!main_trigger(0.0, &state(801.0, -5.0)));
    assert!(!main_trigger(0.0, &state(800.0, -5.0)));
    assert!(!main_trigger(0.0, &state(500.0, 5.0)));
}

#[test]
fn closures_act_as_triggers() {
    let below_ground = |_p: f64, y: &StateVector| y[2] < 0.0;
    assert!(below_ground.should_deploy(0.0, &state(-1.0, 0.0)));
    assert!(!below_ground.should_deploy(0.0, &state(1.0, 0.0)));
}

#[test]
fn scan_reports_first_sample_after_apogee() {
    let booster = common::booster_solution();
    let event = scan_deployment(&parachute("Drogue", Trigger::Descending), &booster)
        .expect("scan")
        .expect("drogue fires");
    assert!(event.triggered_at_s > 19.99 && event.triggered_at_s < 20.11);
    assert!((event.deployed_at_s - event.triggered_at_s - 1.5).abs() < 1e-12);
}

#[test]
fn scan_reports_main_below_threshold() {
    let booster = common::booster_solution();
    let main = parachute(
        "Main",
        Trigger::DescendingBelow {
            altitude_m: MAIN_DEPLOY_ALTITUDE_M,
        },
    );
    let event = scan_deployment(&main, &booster)
        .expect("scan")
        .expect("main fires");
    assert!((event.triggered_at_s - 35.5).abs() < 1e-6);
}

#[test]
fn scan_rejects_non_positive_deployment_altitude() {
    let booster = common::booster_solution();
    let low = parachute("Low", Trigger::DescendingBelow { altitude_m: -10.0 });
    assert!(matches!(
        scan_deployment(&low, &booster),
        Err(RecoveryError::InvalidAltitude(_))
    ));
}

#[test]
fn scan_returns_none_when_trigger_never_fires() {
    let upper: Vec<_> = common::grid(0.0, 20.0, 0.5)
        .into_iter()
        .map(common::booster_state)
        .collect();
    let climbing = rocket_staging::trajectory::FlightSolution::new("climb", upper).unwrap();
    let drogue = parachute("Drogue", Trigger::Descending);
    assert_eq!(scan_deployment(&drogue, &climbing).expect("scan"), None);
}

#[test]
fn parachute_validation_rejects_bad_parameters() {
    let mut chute = parachute("Drogue", Trigger::Descending);
    chute.sampling_rate_hz = 0.0;
    assert!(matches!(
        chute.validate(),
        Err(RecoveryError::InvalidSamplingRate { .. })
    ));
    chute.sampling_rate_hz = f64::INFINITY;
    assert!(matches!(
        chute.validate(),
        Err(RecoveryError::InvalidSamplingRate { .. })
    ));
    chute.sampling_rate_hz = 10.0;
    chute.lag_s = -0.1;
    assert!(matches!(chute.validate(), Err(RecoveryError::NegativeLag(_))));
    chute.lag_s = 0.0;
    chute.cd_s_m2 = 0.0;
    assert!(matches!(
        chute.validate(),
        Err(RecoveryError::InvalidDragArea(_))
    ));
}

#[test]
fn scan_rejects_sampling_faster_than_barometer_limit() {
    let booster = common::booster_solution();
    let mut drogue = parachute("Drogue", Trigger::Descending);
    drogue.sampling_rate_hz = 1e8;
    assert!(matches!(
        scan_deployment(&drogue, &booster),
        Err(RecoveryError::InvalidSamplingRate { rate_hz, .. }) if rate_hz == 1e8
    ));

    drogue.sampling_rate_hz = MAX_SAMPLING_RATE_HZ;
    let event = scan_deployment(&drogue, &booster)
        .expect("scan at the limit")
        .expect("drogue fires");
    assert!(event.triggered_at_s > 19.99 && event.triggered_at_s < 20.01);
}
