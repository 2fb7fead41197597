//! Property tests for the configuration mutators.

use memclock_core::hardware::{MemoryModule, catalog, clamp_stability, ranges};
use memclock_core::tuning::{RATED_PROFILE_STABILITY, SafetyApproval, TimingUpdate};
use proptest::prelude::*;

const EPSILON: f64 = 1e-9;

fn timings_strategy() -> impl Strategy<Value = [u32; 4]> {
    [1u32..60, 1u32..60, 1u32..60, 1u32..80]
}

proptest! {
    #[test]
    fn frequency_replaces_stability(
        kit in 0usize..20,
        earlier in 1u32..10_000,
        timings in timings_strategy(),
        frequency in 1u32..10_000,
    ) {
        let spec = catalog::module_spec(kit).unwrap();
        let mut module = MemoryModule::from_spec(spec);
        module.set_frequency(earlier).unwrap();
        module.set_timings(TimingUpdate::from_values(&timings).unwrap()).unwrap();

        let change = module.set_frequency(frequency).unwrap();

        let rated = f64::from(spec.rated_frequency);
        let expected = 100.0 - ((f64::from(frequency) - rated).abs() / rated * 100.0).min(50.0);
        prop_assert!((change.metrics.stability - expected).abs() < EPSILON);
        prop_assert!(change.metrics.stability >= 50.0);
    }

    #[test]
    fn frequency_heat_tracks_the_step(kit in 0usize..20, frequency in 1u32..10_000) {
        let mut module = MemoryModule::from_spec(catalog::module_spec(kit).unwrap());
        let before = module.temperature();
        let old = f64::from(module.frequency());

        module.set_frequency(frequency).unwrap();

        let expected = before + (f64::from(frequency) - old) * 0.01;
        prop_assert!((module.temperature() - expected).abs() < EPSILON);
    }

    #[test]
    fn timing_delta_is_additive_and_clamped(
        kit in 0usize..20,
        frequency in 1u32..10_000,
        timings in timings_strategy(),
    ) {
        let spec = catalog::module_spec(kit).unwrap();
        let mut module = MemoryModule::from_spec(spec);
        module.set_frequency(frequency).unwrap();
        let before = module.stability();

        let update = TimingUpdate::from_values(&timings).unwrap();
        let metrics = module.set_timings(update).unwrap();

        let delta = ranges::timing_ranges(spec.ic, spec.class)
            .stability_delta(&module.timings());
        prop_assert!((metrics.stability - clamp_stability(before + delta)).abs() < EPSILON);
        prop_assert!((10.0..=100.0).contains(&metrics.stability));
    }

    #[test]
    fn reset_restores_defaults(
        kit in 0usize..20,
        frequency in 1u32..10_000,
        timings in timings_strategy(),
        voltage in 0.8f64..1.8,
        ambient in 15.0f64..35.0,
    ) {
        let spec = catalog::module_spec(kit).unwrap();
        let mut module = MemoryModule::from_spec(spec);
        module.set_frequency(frequency).unwrap();
        module.set_timings(TimingUpdate::from_values(&timings).unwrap()).unwrap();
        module.set_dram_voltage(voltage, SafetyApproval::Confirmed).unwrap();

        let metrics = module.reset_to_defaults(ambient);

        prop_assert_eq!(metrics.stability, 100.0);
        prop_assert!((metrics.temperature - (ambient + 10.0)).abs() < EPSILON);
        prop_assert_eq!(module.frequency(), spec.jedec_frequency);
        prop_assert_eq!(module.timings(), spec.jedec_timings);
        prop_assert_eq!(module.voltage(), spec.class.default_voltage());
    }

    #[test]
    fn rated_profile_pins_stability(
        kit in 0usize..20,
        frequency in 1u32..10_000,
        timings in timings_strategy(),
    ) {
        let spec = catalog::module_spec(kit).unwrap();
        let mut module = MemoryModule::from_spec(spec);
        module.set_frequency(frequency).unwrap();
        module.set_timings(TimingUpdate::from_values(&timings).unwrap()).unwrap();
        let temperature = module.temperature();

        let metrics = module.apply_rated_profile();

        prop_assert_eq!(metrics.stability, RATED_PROFILE_STABILITY);
        prop_assert_eq!(metrics.temperature, temperature);
        prop_assert_eq!(module.frequency(), spec.rated_frequency);
        prop_assert_eq!(module.timings(), spec.rated_timings);
        prop_assert_eq!(module.voltage(), spec.rated_voltage);
    }

    #[test]
    fn repeating_a_voltage_write_is_a_no_op(kit in 0usize..20, voltage in 0.8f64..1.8) {
        let mut module = MemoryModule::from_spec(catalog::module_spec(kit).unwrap());
        let first = module.set_dram_voltage(voltage, SafetyApproval::Confirmed).unwrap();

        let second = module.set_dram_voltage(voltage, SafetyApproval::Confirmed).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn rejected_writes_leave_state_unchanged(
        kit in 0usize..20,
        position in 5usize..10,
        voltage in 1.51f64..3.0,
    ) {
        let mut module = MemoryModule::from_spec(catalog::module_spec(kit).unwrap());
        let before = module.clone();

        prop_assert!(module.set_frequency(0).is_err());
        prop_assert!(TimingUpdate::at_position(position, 16).is_err());
        prop_assert!(module.set_timings(TimingUpdate::at_position(1, 0).unwrap()).is_err());
        prop_assert!(module.set_dram_voltage(voltage, SafetyApproval::Unconfirmed).is_err());
        prop_assert!(module.set_dram_voltage(-voltage, SafetyApproval::Confirmed).is_err());
        prop_assert_eq!(module, before);
    }
}
