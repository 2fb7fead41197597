//! Memclock Core - RAM overclocking simulation
//!
//! Models a dual-channel memory kit on a memory controller: frequency,
//! primary timing and voltage tuning, derived stability and temperature,
//! a thermal environment, and a cancellable tick-driven stress tester that
//! injects faults from a seedable RNG.

pub mod config;
pub mod hardware;
pub mod invariants;
pub mod session;
pub mod stress;
pub mod thermal;
pub mod tracing_setup;
pub mod tuning;

// Re-export main types for convenient access
pub use config::MemclockConfig;
pub use hardware::{MemoryClass, MemoryController, MemoryModule, Timings};
pub use session::OverclockSession;
pub use stress::{CancellationToken, StressTestEngine, StressTestError, TestOutcome};
pub use thermal::{Environment, ThermalError};
pub use tuning::{SafetyApproval, TimingUpdate, TuningError, VoltageRail};

/// Core errors that can bubble up from any Memclock subsystem.
#[derive(Debug, thiserror::Error)]
pub enum MemclockError {
    #[error("Tuning error: {0}")]
    Tuning(#[from] TuningError),

    #[error("Thermal error: {0}")]
    Thermal(#[from] ThermalError),

    #[error("Stress test error: {0}")]
    StressTest(#[from] StressTestError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("No {kind} at catalog index {index}")]
    UnknownCatalogEntry { kind: &'static str, index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MemclockError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            MemclockError::Tuning(e) => match e {
                TuningError::UnconfirmedVoltage { requested, ceiling } => format!(
                    "{requested:.3}V is above the {ceiling:.2}V safe limit; pass --force to apply it anyway"
                ),
                other => other.to_string(),
            },
            MemclockError::Thermal(e) => e.to_string(),
            MemclockError::StressTest(e) => e.to_string(),
            MemclockError::Configuration { reason } => format!("Configuration error: {reason}"),
            MemclockError::UnknownCatalogEntry { kind, index } => {
                format!("Unknown {kind} #{}; run `memclock catalog` to list them", index + 1)
            }
            MemclockError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, MemclockError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, MemclockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfirmed_voltage_message_mentions_force() {
        let error = MemclockError::from(TuningError::UnconfirmedVoltage {
            requested: 1.55,
            ceiling: 1.5,
        });

        assert!(error.is_user_error());
        assert!(error.user_message().contains("--force"));
    }

    #[test]
    fn test_catalog_entry_message_is_one_based() {
        let error = MemclockError::UnknownCatalogEntry {
            kind: "memory kit",
            index: 24,
        };

        assert_eq!(
            error.user_message(),
            "Unknown memory kit #25; run `memclock catalog` to list them"
        );
    }

    #[test]
    fn test_io_errors_are_not_user_errors() {
        let error = MemclockError::from(std::io::Error::other("disk full"));
        assert!(!error.is_user_error());
    }
}
