//! Integration tests for a full overclocking session.

use memclock_core::hardware::catalog;
use memclock_core::stress::{CancellationToken, DeterministicClock, Intensity, StressPreset};
use memclock_core::thermal::{CoolingSolution, ThermalStatus};
use memclock_core::{
    MemclockConfig, MemclockError, OverclockSession, SafetyApproval, TestOutcome, TimingUpdate,
    Timings, TuningError, VoltageRail,
};

const EPSILON: f64 = 1e-9;

fn session(kit: usize) -> OverclockSession<DeterministicClock> {
    OverclockSession::with_clock(
        catalog::module_spec(kit).unwrap(),
        catalog::controller_spec(0).unwrap(),
        &MemclockConfig::for_testing(),
        DeterministicClock::new(),
    )
}

#[test]
fn test_rated_profile_then_voltage_bump() {
    let mut session = session(0);

    let rated = session.apply_rated_profile();
    assert_eq!(rated.stability, 85.0);
    assert_eq!(session.module().voltage(), 1.35);

    // 1.5V sits exactly on the older class ceiling, so no confirmation
    let metrics = session
        .set_voltage(VoltageRail::Dram, 1.5, SafetyApproval::Unconfirmed)
        .unwrap();

    assert!((metrics.stability - 88.0).abs() < EPSILON);
    assert!((metrics.temperature - (rated.temperature + 2.25)).abs() < EPSILON);
}

#[test]
fn test_voltage_above_ceiling_needs_confirmation() {
    let mut session = session(10);

    let error = session
        .set_voltage(VoltageRail::Dram, 1.45, SafetyApproval::Unconfirmed)
        .unwrap_err();
    assert_eq!(
        error,
        TuningError::UnconfirmedVoltage {
            requested: 1.45,
            ceiling: 1.4
        }
    );
    assert_eq!(session.module().voltage(), 1.1);

    session
        .set_voltage(VoltageRail::Dram, 1.45, SafetyApproval::Confirmed)
        .unwrap();
    assert_eq!(session.module().voltage(), 1.45);
}

#[test]
fn test_newer_class_reset() {
    let mut session = session(10);
    session.set_frequency(6400).unwrap();
    session
        .set_timings(TimingUpdate::at_position(1, 30).unwrap())
        .unwrap();

    let metrics = session.reset_to_defaults();

    assert_eq!(session.module().voltage(), 1.1);
    assert_eq!(session.module().frequency(), 4800);
    assert_eq!(session.module().timings(), Timings::new(40, 40, 40, 76));
    assert_eq!(metrics.stability, 100.0);
    assert_eq!(metrics.temperature, 35.0);
}

#[test]
fn test_thermal_view_follows_environment() {
    let mut session = session(0);
    session.select_cooling(CoolingSolution::AllInOneLiquid);
    session.add_case_fan();
    session.add_case_fan();
    assert_eq!(session.environment().ambient(), 18.0);

    session.set_frequency(3133).unwrap();
    let reading = session.view_thermals();

    // 18 + 10 + 1000 * 0.005
    assert!((reading.temperature - 33.0).abs() < EPSILON);
    assert_eq!(reading.status, ThermalStatus::Excellent);
    assert_eq!(reading.stability_penalty, 0.0);
    assert_eq!(session.module().temperature(), reading.temperature);
}

#[test]
fn test_sensor_reading_does_not_mutate() {
    let mut session = session(0);
    let before = session.module().clone();

    for _ in 0..50 {
        let reading = session.sensor_reading();
        assert!((34.0..36.0).contains(&reading));
    }
    assert_eq!(session.module(), &before);
}

#[test]
fn test_ambient_validation() {
    let mut session = session(0);

    assert_eq!(session.set_ambient(50.0).unwrap(), 35.0);
    assert_eq!(session.set_ambient(-5.0).unwrap(), 15.0);
    assert!(session.set_ambient(f64::NAN).is_err());
    assert_eq!(session.environment().ambient(), 15.0);
}

#[test]
fn test_tuning_session_accumulates_history() {
    let mut session = session(4);
    let cancel = CancellationToken::new();

    session.apply_rated_profile();
    let first = session.run_preset(StressPreset::MemTest86, &cancel).unwrap();
    session.set_frequency(5200).unwrap();
    let second = session.run_custom(45, Intensity::Heavy, &cancel).unwrap();
    session.quick_check();

    assert_eq!(session.history(), &[first, second]);
    assert_eq!(session.history()[1].duration, 45);
    assert!(session.check_invariants().is_empty());

    let recorded: u64 = session
        .history()
        .iter()
        .filter(|report| matches!(report.outcome, TestOutcome::Unstable | TestOutcome::Failed))
        .map(|report| u64::from(report.errors_injected))
        .sum();
    assert!(session.module().error_count() >= recorded);
}

#[test]
fn test_unknown_controller_index() {
    let error = OverclockSession::from_catalog(0, 4, &MemclockConfig::for_testing()).unwrap_err();

    assert!(matches!(
        error,
        MemclockError::UnknownCatalogEntry {
            kind: "memory controller",
            index: 4
        }
    ));
    assert!(error.is_user_error());
}

#[test]
fn test_report_serializes_for_presentation() {
    let mut session = session(0);
    let report = session
        .run_preset(StressPreset::MemTest86, &CancellationToken::new())
        .unwrap();

    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["label"], "MemTest86");
    assert_eq!(value["outcome"], "Passed");
    assert_eq!(value["intensity"], "Light");
    assert_eq!(value["duration"], 10);
}
