//! Overclocking session: the explicit context every operation runs against.
//!
//! A session owns one canonical configurable module. The second DIMM of the
//! dual-channel pair is a configuration-identical mirror and is represented
//! only by [`CHANNEL_COUNT`], so the two can never drift apart.
//!
//! Every mutating method takes `&mut self`. Operations update several fields
//! without atomicity, so a session must not be shared between threads
//! without external synchronization.

use crate::config::MemclockConfig;
use crate::hardware::{
    ControllerSpec, MemoryController, MemoryModule, ModuleMetrics, ModuleSpec, catalog,
};
use crate::invariants::{self, InvariantViolation};
use crate::stress::{
    CancellationToken, FaultRng, Intensity, QuickCheckReport, StressPreset, StressTestEngine,
    StressTestError, StressTestReport, StressTestRequest, TickClock, TickProgress, WallClock,
};
use crate::thermal::{self, CoolingSolution, Environment, ThermalError, ThermalReading};
use crate::tuning::{
    self, FrequencyChange, SafetyApproval, TimingUpdate, TuningError, VoltageRail,
};
use crate::{MemclockError, Result};

/// Number of installed DIMMs; all mirror the primary module.
pub const CHANNEL_COUNT: usize = 2;

/// State of one overclocking session.
#[derive(Debug)]
pub struct OverclockSession<C: TickClock = WallClock> {
    module: MemoryModule,
    controller: MemoryController,
    environment: Environment,
    engine: StressTestEngine<C>,
    rng: FaultRng,
    custom_duration_bounds: (u32, u32),
    history: Vec<StressTestReport>,
    error_floor: u64,
}

impl OverclockSession<WallClock> {
    /// Starts a session that paces stress tests in real time.
    pub fn new(kit: &ModuleSpec, controller: &ControllerSpec, config: &MemclockConfig) -> Self {
        Self::with_clock(kit, controller, config, WallClock::new())
    }

    /// Starts a session from 0-based catalog indices.
    ///
    /// # Errors
    /// - `MemclockError::UnknownCatalogEntry` - Either index is out of range
    pub fn from_catalog(
        kit_index: usize,
        controller_index: usize,
        config: &MemclockConfig,
    ) -> Result<Self> {
        let kit = catalog::module_spec(kit_index).ok_or(MemclockError::UnknownCatalogEntry {
            kind: "memory kit",
            index: kit_index,
        })?;
        let controller =
            catalog::controller_spec(controller_index).ok_or(MemclockError::UnknownCatalogEntry {
                kind: "memory controller",
                index: controller_index,
            })?;
        Ok(Self::new(kit, controller, config))
    }
}

impl<C: TickClock> OverclockSession<C> {
    /// Starts a session with an injected tick clock.
    pub fn with_clock(
        kit: &ModuleSpec,
        controller: &ControllerSpec,
        config: &MemclockConfig,
        clock: C,
    ) -> Self {
        let rng = FaultRng::from_optional_seed(config.simulation.deterministic_seed);
        tracing::info!(
            kit = kit.name,
            controller = controller.name,
            seed = rng.seed(),
            "session started"
        );

        Self {
            module: MemoryModule::from_spec(kit),
            controller: MemoryController::from_spec(controller),
            environment: Environment::new(
                config.environment.ambient_temperature,
                config.environment.cooling,
            ),
            engine: StressTestEngine::new(clock, &config.stress),
            rng,
            custom_duration_bounds: config.stress.custom_duration_bounds(),
            history: Vec::new(),
            error_floor: 0,
        }
    }

    /// The primary module, which every operation acts on.
    pub fn module(&self) -> &MemoryModule {
        &self.module
    }

    pub fn controller(&self) -> &MemoryController {
        &self.controller
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn channel_count(&self) -> usize {
        CHANNEL_COUNT
    }

    pub fn engine(&self) -> &StressTestEngine<C> {
        &self.engine
    }

    /// Seed of the fault RNG, for replaying a session.
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Reports of every stress test run this session, oldest first.
    pub fn history(&self) -> &[StressTestReport] {
        &self.history
    }

    /// # Errors
    /// - `TuningError::InvalidFrequency` - Frequency is zero
    pub fn set_frequency(
        &mut self,
        frequency: u32,
    ) -> std::result::Result<FrequencyChange, TuningError> {
        let change = self.module.set_frequency(frequency)?;
        self.audit("set_frequency");
        Ok(change)
    }

    /// # Errors
    /// - `TuningError::InvalidTiming` - A requested value is zero
    pub fn set_timings(
        &mut self,
        update: TimingUpdate,
    ) -> std::result::Result<ModuleMetrics, TuningError> {
        let metrics = self.module.set_timings(update)?;
        self.audit("set_timings");
        Ok(metrics)
    }

    /// # Errors
    /// - `TuningError::InvalidVoltage` - Voltage is not a positive finite value
    /// - `TuningError::UnconfirmedVoltage` - Unconfirmed DRAM voltage above ceiling
    pub fn set_voltage(
        &mut self,
        rail: VoltageRail,
        voltage: f64,
        approval: SafetyApproval,
    ) -> std::result::Result<ModuleMetrics, TuningError> {
        let metrics =
            tuning::set_voltage(&mut self.module, &mut self.controller, rail, voltage, approval)?;
        self.audit("set_voltage");
        Ok(metrics)
    }

    pub fn apply_rated_profile(&mut self) -> ModuleMetrics {
        let metrics = self.module.apply_rated_profile();
        self.audit("apply_rated_profile");
        metrics
    }

    /// Resets to JEDEC using the session's current ambient temperature.
    pub fn reset_to_defaults(&mut self) -> ModuleMetrics {
        let metrics = self.module.reset_to_defaults(self.environment.ambient());
        self.audit("reset_to_defaults");
        metrics
    }

    /// Recomputes steady-state temperature from the current environment.
    pub fn view_thermals(&mut self) -> ThermalReading {
        let ambient = self.environment.ambient();
        let temperature = thermal::recompute_temperature(&mut self.module, ambient);
        ThermalReading::new(ambient, temperature)
    }

    /// Jittered sensor reading of the stored temperature.
    pub fn sensor_reading(&mut self) -> f64 {
        thermal::sample_sensor(&self.module, &mut self.rng)
    }

    /// # Errors
    /// - `ThermalError::InvalidAmbient` - Value is NaN or infinite
    pub fn set_ambient(&mut self, value: f64) -> std::result::Result<f64, ThermalError> {
        self.environment.set_ambient(value)
    }

    pub fn select_cooling(&mut self, cooling: CoolingSolution) {
        self.environment.select_cooling(cooling);
        tracing::debug!(
            cooling = cooling.label(),
            ambient = self.environment.ambient(),
            "cooling selected"
        );
    }

    pub fn add_case_fan(&mut self) -> f64 {
        self.environment.add_case_fan()
    }

    /// Runs a stress test on the primary module and records its report.
    ///
    /// # Errors
    /// - `StressTestError::ZeroDuration` - Request has no ticks
    pub fn run_stress_test(
        &mut self,
        request: StressTestRequest,
        cancel: &CancellationToken,
    ) -> std::result::Result<StressTestReport, StressTestError> {
        self.run_stress_test_with_progress(request, cancel, |_| {})
    }

    /// Runs a stress test, reporting progress after every tick.
    ///
    /// # Errors
    /// - `StressTestError::ZeroDuration` - Request has no ticks
    pub fn run_stress_test_with_progress<F>(
        &mut self,
        request: StressTestRequest,
        cancel: &CancellationToken,
        on_tick: F,
    ) -> std::result::Result<StressTestReport, StressTestError>
    where
        F: FnMut(TickProgress),
    {
        let report =
            self.engine
                .run_with_progress(&mut self.module, request, &mut self.rng, cancel, on_tick)?;
        self.history.push(report.clone());
        self.audit("run_stress_test");
        Ok(report)
    }

    /// Runs one of the fixed-parameter preset programs.
    ///
    /// # Errors
    /// - `StressTestError::ZeroDuration` - Never for the built-in presets
    pub fn run_preset(
        &mut self,
        preset: StressPreset,
        cancel: &CancellationToken,
    ) -> std::result::Result<StressTestReport, StressTestError> {
        self.run_stress_test(preset.request(), cancel)
    }

    /// Runs a custom test with its duration clamped to the configured bounds.
    ///
    /// # Errors
    /// - `StressTestError::ZeroDuration` - Configured lower bound is zero
    pub fn run_custom(
        &mut self,
        duration: u32,
        intensity: Intensity,
        cancel: &CancellationToken,
    ) -> std::result::Result<StressTestReport, StressTestError> {
        let request = StressTestRequest::custom(duration, intensity, self.custom_duration_bounds);
        self.run_stress_test(request, cancel)
    }

    pub fn quick_check(&mut self) -> QuickCheckReport {
        let report = self.engine.quick_check(&mut self.module, &mut self.rng);
        self.audit("quick_check");
        report
    }

    /// Checks module invariants against the last audited state.
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        invariants::check_module(&self.module, self.error_floor)
    }

    fn audit(&mut self, operation: &str) {
        for violation in self.check_invariants() {
            tracing::error!(operation, %violation, "module invariant violated");
        }
        self.error_floor = self.error_floor.max(self.module.error_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stress::{DeterministicClock, TestOutcome};

    fn session() -> OverclockSession<DeterministicClock> {
        OverclockSession::with_clock(
            catalog::module_spec(0).unwrap(),
            catalog::controller_spec(0).unwrap(),
            &MemclockConfig::for_testing(),
            DeterministicClock::new(),
        )
    }

    #[test]
    fn test_from_catalog_rejects_unknown_kit() {
        let result = OverclockSession::from_catalog(20, 0, &MemclockConfig::for_testing());

        assert!(matches!(
            result,
            Err(MemclockError::UnknownCatalogEntry { index: 20, .. })
        ));
    }

    #[test]
    fn test_new_session_state() {
        let session = session();

        assert_eq!(session.channel_count(), 2);
        assert_eq!(session.module().frequency(), 2133);
        assert_eq!(session.module().stability(), 100.0);
        assert_eq!(session.environment().ambient(), 25.0);
        assert_eq!(session.seed(), 42);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_rejected_voltage_leaves_state_unchanged() {
        let mut session = session();
        let before = session.module().clone();

        let result = session.set_voltage(VoltageRail::Dram, 1.6, SafetyApproval::Unconfirmed);

        assert!(matches!(result, Err(TuningError::UnconfirmedVoltage { .. })));
        assert_eq!(session.module(), &before);
    }

    #[test]
    fn test_controller_rails_do_not_touch_module() {
        let mut session = session();
        let before = session.module().metrics();

        let metrics = session
            .set_voltage(VoltageRail::Vccsa, 1.3, SafetyApproval::Unconfirmed)
            .unwrap();

        assert_eq!(metrics, before);
        assert_eq!(session.controller().vccsa_voltage(), 1.3);
    }

    #[test]
    fn test_reset_follows_selected_cooling() {
        let mut session = session();
        session.select_cooling(CoolingSolution::CustomLoop);

        let metrics = session.reset_to_defaults();

        assert_eq!(metrics.temperature, 30.0);
        assert_eq!(metrics.stability, 100.0);
    }

    #[test]
    fn test_out_of_range_starting_ambient_is_clamped() {
        let mut config = MemclockConfig::for_testing();
        config.environment.ambient_temperature = 90.0;
        let mut session = OverclockSession::with_clock(
            catalog::module_spec(0).unwrap(),
            catalog::controller_spec(0).unwrap(),
            &config,
            DeterministicClock::new(),
        );

        assert_eq!(session.environment().ambient(), 35.0);
        assert_eq!(session.reset_to_defaults().temperature, 45.0);
    }

    #[test]
    fn test_custom_run_with_inverted_bounds() {
        let mut config = MemclockConfig::for_testing();
        config.stress.custom_duration_min = 300;
        config.stress.custom_duration_max = 5;
        let mut session = OverclockSession::with_clock(
            catalog::module_spec(0).unwrap(),
            catalog::controller_spec(0).unwrap(),
            &config,
            DeterministicClock::new(),
        );

        let report = session
            .run_custom(60, Intensity::Light, &CancellationToken::new())
            .unwrap();

        assert_eq!(report.duration, 5);
    }

    #[test]
    fn test_stress_tests_are_recorded_in_order() {
        let mut session = session();
        let cancel = CancellationToken::new();

        let first = session.run_preset(StressPreset::MemTest86, &cancel).unwrap();
        let second = session.run_custom(1, Intensity::Light, &cancel).unwrap();

        assert_eq!(first.outcome, TestOutcome::Passed);
        assert_eq!(second.duration, 5);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].label, "MemTest86");
        assert_eq!(session.history()[1].label, "Custom Test");
        assert_eq!(session.engine().clock().pauses(), 15);
    }

    #[test]
    fn test_zero_duration_is_not_recorded() {
        let mut session = session();
        let request = StressTestRequest::new("empty", 0, Intensity::Light);

        let result = session.run_stress_test(request, &CancellationToken::new());

        assert!(matches!(result, Err(StressTestError::ZeroDuration { .. })));
        assert!(session.history().is_empty());
        assert_eq!(session.module().temperature(), 35.0);
    }

    #[test]
    fn test_operations_preserve_invariants() {
        let mut session = session();
        let cancel = CancellationToken::new();

        session.set_frequency(4000).unwrap();
        session.set_timings(TimingUpdate::from_values(&[1, 1, 1, 1]).unwrap()).unwrap();
        session.run_preset(StressPreset::YCruncher, &cancel).unwrap();
        session.quick_check();
        session.apply_rated_profile();

        assert!(session.check_invariants().is_empty());
        assert!(session.module().stability() >= 10.0);
    }
}
