//! Centralized configuration for Memclock.
//!
//! Tunable pacing, seeding and environment defaults live here. The model's
//! formula constants stay next to the formulas that use them.

use std::time::Duration;

use crate::thermal::CoolingSolution;

/// Central configuration for all Memclock components.
///
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct MemclockConfig {
    pub stress: StressConfig,
    pub simulation: SimulationConfig,
    pub environment: EnvironmentConfig,
}

/// Stress test pacing and bounds.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Pause after each stress test tick
    pub tick_interval: Duration,
    /// Pause after each quick-check tick
    pub quick_check_interval: Duration,
    /// Number of quick-check ticks
    pub quick_check_ticks: u32,
    /// Shortest custom test, in ticks
    pub custom_duration_min: u32,
    /// Longest custom test, in ticks
    pub custom_duration_max: u32,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            quick_check_interval: Duration::from_millis(500),
            quick_check_ticks: 5,
            custom_duration_min: 5,
            custom_duration_max: 300,
        }
    }
}

impl StressConfig {
    /// Custom test duration bounds as an inclusive pair.
    pub fn custom_duration_bounds(&self) -> (u32, u32) {
        (self.custom_duration_min, self.custom_duration_max)
    }

    /// Zero-delay pacing for tests.
    pub fn instant() -> Self {
        Self {
            tick_interval: Duration::ZERO,
            quick_check_interval: Duration::ZERO,
            ..Default::default()
        }
    }
}

/// Fault injection seeding.
#[derive(Debug, Clone, Default)]
pub struct SimulationConfig {
    /// Deterministic seed for reproducible stress tests
    pub deterministic_seed: Option<u64>,
}

impl SimulationConfig {
    /// Creates a configuration for deterministic testing.
    pub fn deterministic_testing() -> Self {
        Self {
            deterministic_seed: Some(42),
        }
    }
}

/// Initial thermal environment of a session.
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// Starting ambient temperature in °C
    pub ambient_temperature: f64,
    pub cooling: CoolingSolution,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            ambient_temperature: 25.0,
            cooling: CoolingSolution::Stock,
        }
    }
}

impl MemclockConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(interval) = std::env::var("MEMCLOCK_TICK_INTERVAL_MS") {
            if let Ok(millis) = interval.parse::<u64>() {
                config.stress.tick_interval = Duration::from_millis(millis);
            }
        }

        if let Ok(seed) = std::env::var("MEMCLOCK_SEED") {
            if let Ok(seed_value) = seed.parse::<u64>() {
                config.simulation.deterministic_seed = Some(seed_value);
            }
        }

        if let Ok(ambient) = std::env::var("MEMCLOCK_AMBIENT") {
            if let Ok(value) = ambient.parse::<f64>() {
                if value.is_finite() {
                    config.environment.ambient_temperature = value;
                }
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    pub fn for_testing() -> Self {
        Self {
            stress: StressConfig::instant(),
            simulation: SimulationConfig::deterministic_testing(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = MemclockConfig::default();

        assert_eq!(config.stress.tick_interval, Duration::from_millis(100));
        assert_eq!(config.stress.quick_check_ticks, 5);
        assert_eq!(config.stress.custom_duration_bounds(), (5, 300));
        assert_eq!(config.simulation.deterministic_seed, None);
        assert_eq!(config.environment.ambient_temperature, 25.0);
        assert_eq!(config.environment.cooling, CoolingSolution::Stock);
    }

    #[test]
    fn test_testing_preset() {
        let config = MemclockConfig::for_testing();

        assert!(config.stress.tick_interval.is_zero());
        assert!(config.stress.quick_check_interval.is_zero());
        assert_eq!(config.simulation.deterministic_seed, Some(42));
    }
}
