//! Single stress test run as an explicit tick-driven state machine.
//!
//! `Idle` is the absence of a [`StressRun`]. [`StressRun::begin`] enters
//! `Running`; [`StressRun::conclude`] and [`StressRun::abort`] consume the run
//! and yield a terminal [`TestOutcome`], which leaves the engine idle again.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::clock::FaultRng;
use super::request::{Intensity, StressTestRequest};
use crate::hardware::MemoryModule;

/// Temperature above which each tick risks an extra thermal error.
pub const THERMAL_ERROR_THRESHOLD: f64 = 85.0;

/// Per-tick probability of a thermal error above the threshold.
pub const THERMAL_ERROR_PROBABILITY: f64 = 0.1;

/// Heat left in the module after a completed run.
pub const RESIDUAL_HEAT: f64 = 2.0;

/// Error count at which a run is classified as failed.
const FAILED_ERROR_THRESHOLD: u32 = 5;

const PASSED_STABILITY_GAIN: f64 = 2.0;
const UNSTABLE_STABILITY_LOSS: f64 = 5.0;
const FAILED_STABILITY_LOSS: f64 = 15.0;
const ABORTED_STABILITY_LOSS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StressTestError {
    #[error("Stress test '{label}' must run for at least one tick")]
    ZeroDuration { label: String },
}

/// Terminal state of a stress test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TestOutcome {
    /// No errors
    Passed,
    /// 1-4 errors
    Unstable,
    /// 5 or more errors
    Failed,
    /// Cancelled before completion
    Aborted,
}

impl TestOutcome {
    /// Classifies a completed run by the errors it injected.
    pub fn from_error_count(errors: u32) -> Self {
        match errors {
            0 => TestOutcome::Passed,
            n if n < FAILED_ERROR_THRESHOLD => TestOutcome::Unstable,
            _ => TestOutcome::Failed,
        }
    }

    /// Stability change applied to the module when the run ends.
    pub fn stability_delta(self) -> f64 {
        match self {
            TestOutcome::Passed => PASSED_STABILITY_GAIN,
            TestOutcome::Unstable => -UNSTABLE_STABILITY_LOSS,
            TestOutcome::Failed => -FAILED_STABILITY_LOSS,
            TestOutcome::Aborted => -ABORTED_STABILITY_LOSS,
        }
    }

    /// Whether injected errors are added to the module's error count.
    pub fn records_errors(self) -> bool {
        matches!(self, TestOutcome::Unstable | TestOutcome::Failed)
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TestOutcome::Passed => "PASSED",
            TestOutcome::Unstable => "UNSTABLE",
            TestOutcome::Failed => "FAILED",
            TestOutcome::Aborted => "ABORTED",
        };
        f.write_str(label)
    }
}

/// Progress after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickProgress {
    /// 1-based index of the completed tick
    pub tick: u32,
    pub duration: u32,
    pub percent: f64,
    pub errors_so_far: u32,
}

/// Final record of a stress test run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressTestReport {
    pub label: String,
    pub intensity: Intensity,
    pub duration: u32,
    pub ticks_completed: u32,
    pub outcome: TestOutcome,
    pub errors_injected: u32,
    pub pre_test_temperature: f64,
    pub final_stability: f64,
    pub final_temperature: f64,
}

/// A stress test in the `Running` state.
#[derive(Debug, Clone)]
pub struct StressRun {
    request: StressTestRequest,
    failure_chance: f64,
    pre_test_temperature: f64,
    ticks_completed: u32,
    errors_injected: u32,
}

impl StressRun {
    /// Starts a run: derives the failure chance from current stability and
    /// heats the module by the intensity's fixed increase.
    ///
    /// # Errors
    /// - `StressTestError::ZeroDuration` - Request has no ticks
    pub fn begin(
        module: &mut MemoryModule,
        request: StressTestRequest,
    ) -> Result<Self, StressTestError> {
        if request.duration == 0 {
            return Err(StressTestError::ZeroDuration {
                label: request.label,
            });
        }

        let intensity = request.intensity;
        let failure_chance = (100.0 - module.stability()) * intensity.multiplier() / 100.0;
        let pre_test_temperature = module.temperature();
        module.store_temperature(pre_test_temperature + intensity.temperature_increase());

        tracing::info!(
            label = %request.label,
            duration = request.duration,
            %intensity,
            failure_chance,
            "stress test started"
        );

        Ok(Self {
            request,
            failure_chance,
            pre_test_temperature,
            ticks_completed: 0,
            errors_injected: 0,
        })
    }

    /// `(100 - stability) * multiplier / 100`, spread evenly across ticks.
    pub fn failure_chance(&self) -> f64 {
        self.failure_chance
    }

    pub fn pre_test_temperature(&self) -> f64 {
        self.pre_test_temperature
    }

    pub fn errors_injected(&self) -> u32 {
        self.errors_injected
    }

    pub fn ticks_completed(&self) -> u32 {
        self.ticks_completed
    }

    pub fn is_finished(&self) -> bool {
        self.ticks_completed >= self.request.duration
    }

    /// Executes one tick of fault injection.
    ///
    /// Draws a stability error with probability `failure_chance / duration`,
    /// then, if the module is above 85 °C, an independent thermal error with
    /// probability 0.1. Calling this on a finished run does nothing.
    pub fn advance(&mut self, module: &MemoryModule, rng: &mut FaultRng) -> TickProgress {
        if !self.is_finished() {
            let duration = f64::from(self.request.duration);
            if rng.chance(self.failure_chance / duration) {
                self.errors_injected += 1;
                tracing::trace!(tick = self.ticks_completed + 1, "stability error injected");
            }
            if module.temperature() > THERMAL_ERROR_THRESHOLD
                && rng.chance(THERMAL_ERROR_PROBABILITY)
            {
                self.errors_injected += 1;
                tracing::trace!(tick = self.ticks_completed + 1, "thermal error injected");
            }
            self.ticks_completed += 1;
        }
        self.progress()
    }

    pub fn progress(&self) -> TickProgress {
        let duration = self.request.duration;
        TickProgress {
            tick: self.ticks_completed,
            duration,
            percent: f64::from(self.ticks_completed) / f64::from(duration) * 100.0,
            errors_so_far: self.errors_injected,
        }
    }

    /// Finishes a run and applies its outcome to the module.
    ///
    /// Passed gains 2 stability; Unstable and Failed record the errors and
    /// lose 5 or 15. Temperature always settles at the pre-test value plus
    /// residual heat, discarding the peak reached during the run.
    pub fn conclude(self, module: &mut MemoryModule) -> StressTestReport {
        let outcome = TestOutcome::from_error_count(self.errors_injected);
        if outcome.records_errors() {
            module.record_errors(u64::from(self.errors_injected));
        }
        module.store_stability(module.stability() + outcome.stability_delta());
        module.store_temperature(self.pre_test_temperature + RESIDUAL_HEAT);

        self.into_report(outcome, module)
    }

    /// Cancels a run: loses 10 stability and restores the exact pre-test
    /// temperature. Injected errors are not recorded.
    pub fn abort(self, module: &mut MemoryModule) -> StressTestReport {
        let outcome = TestOutcome::Aborted;
        module.store_stability(module.stability() + outcome.stability_delta());
        module.store_temperature(self.pre_test_temperature);

        self.into_report(outcome, module)
    }

    fn into_report(self, outcome: TestOutcome, module: &MemoryModule) -> StressTestReport {
        tracing::info!(
            label = %self.request.label,
            %outcome,
            errors = self.errors_injected,
            ticks = self.ticks_completed,
            stability = module.stability(),
            "stress test finished"
        );

        StressTestReport {
            label: self.request.label,
            intensity: self.request.intensity,
            duration: self.request.duration,
            ticks_completed: self.ticks_completed,
            outcome,
            errors_injected: self.errors_injected,
            pre_test_temperature: self.pre_test_temperature,
            final_stability: module.stability(),
            final_temperature: module.temperature(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::catalog;

    fn module() -> MemoryModule {
        MemoryModule::from_spec(catalog::module_spec(0).unwrap())
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(TestOutcome::from_error_count(0), TestOutcome::Passed);
        assert_eq!(TestOutcome::from_error_count(1), TestOutcome::Unstable);
        assert_eq!(TestOutcome::from_error_count(4), TestOutcome::Unstable);
        assert_eq!(TestOutcome::from_error_count(5), TestOutcome::Failed);
        assert_eq!(TestOutcome::from_error_count(50), TestOutcome::Failed);
    }

    #[test]
    fn test_begin_heats_module_and_derives_chance() {
        let mut module = module();
        module.store_stability(60.0);

        let run = StressRun::begin(
            &mut module,
            StressTestRequest::new("Heavy", 10, Intensity::Heavy),
        )
        .unwrap();

        assert!((run.failure_chance() - 0.6).abs() < 1e-9);
        assert_eq!(run.pre_test_temperature(), 35.0);
        assert_eq!(module.temperature(), 50.0);
    }

    #[test]
    fn test_zero_duration_rejected_without_heating() {
        let mut module = module();
        let result = StressRun::begin(
            &mut module,
            StressTestRequest::new("Empty", 0, Intensity::Light),
        );

        assert!(matches!(result, Err(StressTestError::ZeroDuration { .. })));
        assert_eq!(module.temperature(), 35.0);
    }

    #[test]
    fn test_advance_stops_at_duration() {
        let mut module = module();
        let mut rng = FaultRng::from_seed(3);
        let mut run = StressRun::begin(
            &mut module,
            StressTestRequest::new("Short", 2, Intensity::Light),
        )
        .unwrap();

        run.advance(&module, &mut rng);
        let progress = run.advance(&module, &mut rng);
        assert_eq!(progress.tick, 2);
        assert_eq!(progress.percent, 100.0);
        assert!(run.is_finished());

        let progress = run.advance(&module, &mut rng);
        assert_eq!(progress.tick, 2);
    }

    #[test]
    fn test_abort_restores_pre_test_temperature() {
        let mut module = module();
        let mut rng = FaultRng::from_seed(3);
        let mut run = StressRun::begin(
            &mut module,
            StressTestRequest::new("Cut short", 10, Intensity::Extreme),
        )
        .unwrap();
        run.advance(&module, &mut rng);

        let report = run.abort(&mut module);

        assert_eq!(report.outcome, TestOutcome::Aborted);
        assert_eq!(module.temperature(), 35.0);
        assert_eq!(module.stability(), 90.0);
        assert_eq!(module.error_count(), 0);
    }
}
