//! The trace log captures stress test events regardless of console level.

use memclock_core::config::StressConfig;
use memclock_core::hardware::{MemoryModule, catalog};
use memclock_core::stress::{
    CancellationToken, DeterministicClock, FaultRng, StressPreset, StressTestEngine,
};
use memclock_core::tracing_setup::{LAST_RUN_LOG, init_tracing};
use tempfile::TempDir;

#[test]
fn test_trace_log_records_stress_run() {
    let logs = TempDir::new().unwrap();
    let log_path = init_tracing(tracing::Level::ERROR, Some(logs.path())).unwrap();
    assert_eq!(log_path, logs.path().join(LAST_RUN_LOG));

    let mut engine = StressTestEngine::new(DeterministicClock::new(), &StressConfig::instant());
    let mut module = MemoryModule::from_spec(catalog::module_spec(0).unwrap());
    engine
        .run(
            &mut module,
            StressPreset::MemTest86.request(),
            &mut FaultRng::from_seed(1),
            &CancellationToken::new(),
        )
        .unwrap();

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("stress test started"));
    assert!(contents.contains("stress test finished"));
    assert!(contents.contains("MemTest86"));
}
