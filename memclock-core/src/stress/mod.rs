//! Stress testing: timed, cancellable fault injection against a module.
//!
//! Runs are single-threaded and cooperative. The only suspension point is
//! the fixed pause after each tick, provided by a [`TickClock`] so tests can
//! run with zero real delay.

mod clock;
mod engine;
mod quick_check;
mod request;
mod run;

pub use clock::{DeterministicClock, FaultRng, TickClock, WallClock};
pub use engine::{CancellationToken, StressTestEngine};
pub use quick_check::{QuickCheckReport, QuickCheckVerdict};
pub use request::{Intensity, StressPreset, StressTestRequest};
pub use run::{
    RESIDUAL_HEAT, StressRun, StressTestError, StressTestReport, THERMAL_ERROR_PROBABILITY,
    THERMAL_ERROR_THRESHOLD, TestOutcome, TickProgress,
};
