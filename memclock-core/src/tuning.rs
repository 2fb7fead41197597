//! Configuration mutators for frequency, timings and voltages.
//!
//! Each operation validates its input first and rejects it without touching
//! any state; on success it writes the new setting and recomputes the
//! stability and temperature deltas that setting implies.

use serde::Serialize;
use thiserror::Error;

use crate::hardware::{
    FrequencyRange, FrequencyWarning, MAX_STABILITY, MemoryController, MemoryModule,
    ModuleMetrics, TimingSlot, Timings, ranges,
};

/// Stability assigned after loading a rated (XMP/EXPO) profile.
pub const RATED_PROFILE_STABILITY: f64 = 85.0;

/// Largest stability penalty a frequency change can impose.
const MAX_FREQUENCY_PENALTY: f64 = 50.0;

/// Degrees of temperature change per MHz during a frequency adjustment.
const FREQUENCY_HEAT_PER_MHZ: f64 = 0.01;

/// Degrees above ambient for a module reset to JEDEC settings.
pub const IDLE_OFFSET_ABOVE_AMBIENT: f64 = 10.0;

/// Errors from rejected tuning requests.
///
/// A rejected request leaves module and controller state unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("Frequency must be a positive number of MHz")]
    InvalidFrequency,

    #[error("Expected 4 primary timings, got {count}")]
    TimingCount { count: usize },

    #[error("Timing position {position} is out of range (1-4)")]
    TimingPositionOutOfRange { position: usize },

    #[error("{slot} must be a positive number of cycles")]
    InvalidTiming { slot: &'static str },

    #[error("Voltage {value} is not a positive value")]
    InvalidVoltage { value: f64 },

    #[error("DRAM voltage {requested:.3}V exceeds the {ceiling:.2}V safety ceiling")]
    UnconfirmedVoltage { requested: f64, ceiling: f64 },
}

/// Result of a frequency change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrequencyChange {
    pub metrics: ModuleMetrics,
    /// Advisory only; the frequency was written regardless.
    pub warning: Option<FrequencyWarning>,
    /// Typical range for the module's IC
    pub typical_range: FrequencyRange,
}

/// Requested change to the primary timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingUpdate {
    All(Timings),
    Single { slot: TimingSlot, value: u32 },
}

impl TimingUpdate {
    /// Builds a full update from exactly four values in CL, tRCD, tRP, tRAS order.
    ///
    /// # Errors
    /// - `TuningError::TimingCount` - Not exactly four values
    pub fn from_values(values: &[u32]) -> Result<Self, TuningError> {
        let values: [u32; 4] = values
            .try_into()
            .map_err(|_| TuningError::TimingCount {
                count: values.len(),
            })?;
        Ok(TimingUpdate::All(Timings::from_array(values)))
    }

    /// Builds a single-slot update from a 1-based position.
    ///
    /// # Errors
    /// - `TuningError::TimingPositionOutOfRange` - Position outside 1-4
    pub fn at_position(position: usize, value: u32) -> Result<Self, TuningError> {
        let slot = TimingSlot::from_position(position)
            .ok_or(TuningError::TimingPositionOutOfRange { position })?;
        Ok(TimingUpdate::Single { slot, value })
    }

    fn apply_to(self, current: Timings) -> Timings {
        match self {
            TimingUpdate::All(timings) => timings,
            TimingUpdate::Single { slot, value } => current.with(slot, value),
        }
    }
}

/// Voltage rail targeted by a voltage write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VoltageRail {
    Dram,
    Vccio,
    Vccsa,
}

/// Whether the caller explicitly accepted a safety warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafetyApproval {
    #[default]
    Unconfirmed,
    Confirmed,
}

fn validate_voltage(value: f64) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::InvalidVoltage { value })
    }
}

impl MemoryModule {
    /// Typical frequency range for this module's IC.
    pub fn typical_frequency_range(&self) -> FrequencyRange {
        ranges::frequency_range(self.ic(), self.class())
    }

    /// Sets the frequency and recomputes stability from the distance to the
    /// rated frequency.
    ///
    /// Stability is replaced, not adjusted: `100 - min(50, stress * 100)`
    /// where `stress = |new - rated| / rated`.
    ///
    /// # Errors
    /// - `TuningError::InvalidFrequency` - Frequency is zero
    pub fn set_frequency(&mut self, frequency: u32) -> Result<FrequencyChange, TuningError> {
        if frequency == 0 {
            return Err(TuningError::InvalidFrequency);
        }

        let typical_range = self.typical_frequency_range();
        let warning =
            ranges::classify_frequency(frequency, self.spec().jedec_frequency, typical_range);
        if let Some(warning) = warning {
            tracing::warn!(frequency, ?warning, "frequency outside recommended range");
        }

        let old_frequency = self.frequency();
        let rated = f64::from(self.spec().rated_frequency);
        let stress = (f64::from(frequency) - rated).abs() / rated;
        let penalty = (stress * 100.0).min(MAX_FREQUENCY_PENALTY);

        self.store_frequency(frequency);
        self.store_stability(MAX_STABILITY - penalty);
        let heat = (f64::from(frequency) - f64::from(old_frequency)) * FREQUENCY_HEAT_PER_MHZ;
        self.store_temperature(self.temperature() + heat);

        tracing::debug!(
            old_frequency,
            frequency,
            stability = self.stability(),
            "frequency applied"
        );

        Ok(FrequencyChange {
            metrics: self.metrics(),
            warning,
            typical_range,
        })
    }

    /// Applies new primary timings and adjusts stability by the signed sum of
    /// per-slot penalties and bonuses against the IC's typical ranges.
    ///
    /// # Errors
    /// - `TuningError::InvalidTiming` - A requested value is zero
    pub fn set_timings(&mut self, update: TimingUpdate) -> Result<ModuleMetrics, TuningError> {
        let timings = update.apply_to(self.timings());
        if let Some(slot) = TimingSlot::ALL.into_iter().find(|&s| timings.get(s) == 0) {
            return Err(TuningError::InvalidTiming { slot: slot.label() });
        }

        let delta = ranges::timing_ranges(self.ic(), self.class()).stability_delta(&timings);

        self.store_timings(timings);
        self.store_stability(self.stability() + delta);

        tracing::debug!(%timings, delta, stability = self.stability(), "timings applied");
        Ok(self.metrics())
    }

    /// Whether a DRAM voltage needs explicit confirmation before it is applied.
    pub fn requires_voltage_confirmation(&self, voltage: f64) -> bool {
        voltage > self.class().dram_voltage_ceiling()
    }

    /// Sets DRAM voltage, trading temperature for stability.
    ///
    /// Both deltas scale with the change from the voltage in effect before the
    /// write, so repeating the same request has no further effect.
    ///
    /// # Errors
    /// - `TuningError::InvalidVoltage` - Voltage is not a positive finite value
    /// - `TuningError::UnconfirmedVoltage` - Voltage exceeds the class ceiling
    ///   and `approval` is not [`SafetyApproval::Confirmed`]
    pub fn set_dram_voltage(
        &mut self,
        voltage: f64,
        approval: SafetyApproval,
    ) -> Result<ModuleMetrics, TuningError> {
        validate_voltage(voltage)?;

        let class = self.class();
        if self.requires_voltage_confirmation(voltage) {
            let ceiling = class.dram_voltage_ceiling();
            if approval != SafetyApproval::Confirmed {
                return Err(TuningError::UnconfirmedVoltage {
                    requested: voltage,
                    ceiling,
                });
            }
            tracing::warn!(voltage, ceiling, "DRAM voltage above safety ceiling confirmed");
        }

        let change = voltage - self.voltage();
        self.store_voltage(voltage);
        self.store_stability(self.stability() + change * class.voltage_stability_gain());
        self.store_temperature(self.temperature() + change * class.voltage_heat_gain());

        tracing::debug!(voltage, change, stability = self.stability(), "DRAM voltage applied");
        Ok(self.metrics())
    }

    /// Loads the rated profile frequency, timings and voltage.
    ///
    /// Rated profiles are treated as validated but not perfect, so stability
    /// becomes a fixed 85. Temperature is left as is.
    pub fn apply_rated_profile(&mut self) -> ModuleMetrics {
        let spec = self.spec().clone();
        self.store_frequency(spec.rated_frequency);
        self.store_timings(spec.rated_timings);
        self.store_voltage(spec.rated_voltage);
        self.store_stability(RATED_PROFILE_STABILITY);

        tracing::debug!(
            frequency = spec.rated_frequency,
            timings = %spec.rated_timings,
            "rated profile applied"
        );
        self.metrics()
    }

    /// Restores JEDEC frequency and timings, the class default voltage, full
    /// stability and an idle temperature of `ambient + 10`.
    pub fn reset_to_defaults(&mut self, ambient: f64) -> ModuleMetrics {
        let spec = self.spec().clone();
        self.store_frequency(spec.jedec_frequency);
        self.store_timings(spec.jedec_timings);
        self.store_voltage(spec.class.default_voltage());
        self.store_stability(MAX_STABILITY);
        self.store_temperature(ambient + IDLE_OFFSET_ABOVE_AMBIENT);

        tracing::debug!(ambient, "module reset to JEDEC defaults");
        self.metrics()
    }
}

/// Writes a voltage to the requested rail.
///
/// DRAM writes go to the module. VCCIO and VCCSA writes go to the controller
/// and have no stability or temperature effect.
///
/// # Errors
/// - `TuningError::InvalidVoltage` - Voltage is not a positive finite value
/// - `TuningError::UnconfirmedVoltage` - Unconfirmed DRAM voltage above ceiling
pub fn set_voltage(
    module: &mut MemoryModule,
    controller: &mut MemoryController,
    rail: VoltageRail,
    voltage: f64,
    approval: SafetyApproval,
) -> Result<ModuleMetrics, TuningError> {
    match rail {
        VoltageRail::Dram => module.set_dram_voltage(voltage, approval),
        VoltageRail::Vccio => {
            validate_voltage(voltage)?;
            controller.store_vccio(voltage);
            tracing::debug!(voltage, "VCCIO applied");
            Ok(module.metrics())
        }
        VoltageRail::Vccsa => {
            validate_voltage(voltage)?;
            controller.store_vccsa(voltage);
            tracing::debug!(voltage, "VCCSA applied");
            Ok(module.metrics())
        }
    }
}
