//! Memory module state and derived metrics.

use serde::Serialize;

use super::types::{MemoryClass, MemoryIc, Timings};

/// Lowest stability score any operation may produce.
pub const MIN_STABILITY: f64 = 10.0;

/// Highest stability score any operation may produce.
pub const MAX_STABILITY: f64 = 100.0;

/// Clamps a raw stability value into the valid score range.
pub fn clamp_stability(value: f64) -> f64 {
    value.clamp(MIN_STABILITY, MAX_STABILITY)
}

/// Immutable catalog description of a memory kit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleSpec {
    pub name: &'static str,
    pub class: MemoryClass,
    pub ic: MemoryIc,
    pub jedec_frequency: u32,
    pub jedec_timings: Timings,
    /// XMP/EXPO frequency
    pub rated_frequency: u32,
    pub rated_timings: Timings,
    pub rated_voltage: f64,
    /// Capacity per stick in GB
    pub capacity_gb: u32,
    /// Temperature of an idle module before any tuning
    pub idle_temperature: f64,
    /// Quality bin from 1 (worst) to 10 (best)
    pub quality_bin: u8,
}

/// Stability and temperature after an operation, for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModuleMetrics {
    pub stability: f64,
    pub temperature: f64,
}

/// A single memory module: baseline attributes plus mutable runtime state.
///
/// Runtime fields are only written through the tuning operations, the
/// thermal model and the stress engine, which keep stability in
/// [`MIN_STABILITY`, `MAX_STABILITY`] and the error count non-decreasing.
///
/// Operations update several fields without any atomicity, so a module must
/// not be mutated from more than one place at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryModule {
    spec: ModuleSpec,
    frequency: u32,
    timings: Timings,
    voltage: f64,
    temperature: f64,
    stability: f64,
    error_count: u64,
}

impl MemoryModule {
    /// Instantiates a module from a catalog entry at JEDEC defaults.
    pub fn from_spec(spec: &ModuleSpec) -> Self {
        Self {
            frequency: spec.jedec_frequency,
            timings: spec.jedec_timings,
            voltage: spec.class.default_voltage(),
            temperature: spec.idle_temperature,
            stability: MAX_STABILITY,
            error_count: 0,
            spec: spec.clone(),
        }
    }

    pub fn spec(&self) -> &ModuleSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        self.spec.name
    }

    pub fn class(&self) -> MemoryClass {
        self.spec.class
    }

    pub fn ic(&self) -> MemoryIc {
        self.spec.ic
    }

    /// Current frequency in MHz.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Current DRAM voltage.
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    /// Current temperature in °C.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn stability(&self) -> f64 {
        self.stability
    }

    /// Cumulative errors recorded this session.
    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn metrics(&self) -> ModuleMetrics {
        ModuleMetrics {
            stability: self.stability,
            temperature: self.temperature,
        }
    }

    pub(crate) fn store_frequency(&mut self, frequency: u32) {
        self.frequency = frequency;
    }

    pub(crate) fn store_timings(&mut self, timings: Timings) {
        self.timings = timings;
    }

    pub(crate) fn store_voltage(&mut self, voltage: f64) {
        self.voltage = voltage;
    }

    pub(crate) fn store_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }

    /// Stores a stability value after clamping it into range.
    pub(crate) fn store_stability(&mut self, stability: f64) {
        self.stability = clamp_stability(stability);
    }

    pub(crate) fn record_errors(&mut self, count: u64) {
        self.error_count = self.error_count.saturating_add(count);
    }
}
