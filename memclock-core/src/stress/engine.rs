//! Drives stress test runs tick by tick against a [`TickClock`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::clock::{FaultRng, TickClock};
use super::quick_check::{QuickCheckReport, QuickCheckVerdict};
use super::request::StressTestRequest;
use super::run::{StressRun, StressTestError, StressTestReport, TickProgress};
use crate::config::StressConfig;
use crate::hardware::MemoryModule;

/// Out-of-band cancellation signal for a running stress test.
///
/// Clones share the same flag, so one can be handed to a signal handler
/// while the engine polls another between ticks.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Synchronous stress test driver.
///
/// Pauses once per tick on its clock and checks for cancellation before and
/// after every tick, so at most one tick of work happens after a cancel
/// request.
#[derive(Debug)]
pub struct StressTestEngine<C: TickClock> {
    clock: C,
    tick_interval: Duration,
    quick_check_interval: Duration,
    quick_check_ticks: u32,
}

impl<C: TickClock> StressTestEngine<C> {
    pub fn new(clock: C, config: &StressConfig) -> Self {
        Self {
            clock,
            tick_interval: config.tick_interval,
            quick_check_interval: config.quick_check_interval,
            quick_check_ticks: config.quick_check_ticks,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Runs a stress test to completion or cancellation.
    ///
    /// # Errors
    /// - `StressTestError::ZeroDuration` - Request has no ticks
    pub fn run(
        &mut self,
        module: &mut MemoryModule,
        request: StressTestRequest,
        rng: &mut FaultRng,
        cancel: &CancellationToken,
    ) -> Result<StressTestReport, StressTestError> {
        self.run_with_progress(module, request, rng, cancel, |_| {})
    }

    /// Runs a stress test, reporting progress after every tick.
    ///
    /// # Errors
    /// - `StressTestError::ZeroDuration` - Request has no ticks
    pub fn run_with_progress<F>(
        &mut self,
        module: &mut MemoryModule,
        request: StressTestRequest,
        rng: &mut FaultRng,
        cancel: &CancellationToken,
        mut on_tick: F,
    ) -> Result<StressTestReport, StressTestError>
    where
        F: FnMut(TickProgress),
    {
        let mut run = StressRun::begin(module, request)?;

        while !run.is_finished() {
            if cancel.is_cancelled() {
                return Ok(run.abort(module));
            }
            let progress = run.advance(module, rng);
            on_tick(progress);
            self.clock.pause(self.tick_interval);
        }

        if cancel.is_cancelled() {
            return Ok(run.abort(module));
        }
        Ok(run.conclude(module))
    }

    /// Runs the five-tick quick check and records any errors it finds.
    ///
    /// Stability and temperature are left unchanged.
    pub fn quick_check(&mut self, module: &mut MemoryModule, rng: &mut FaultRng) -> QuickCheckReport {
        for _ in 0..self.quick_check_ticks {
            self.clock.pause(self.quick_check_interval);
        }

        let verdict = QuickCheckVerdict::from_stability(module.stability());
        let errors_added = verdict.draw_errors(rng);
        module.record_errors(errors_added);

        tracing::info!(?verdict, errors_added, "quick stability check finished");
        QuickCheckReport {
            verdict,
            errors_added,
            stability: module.stability(),
        }
    }
}
