//! Memory controller (IMC) state.

use serde::Serialize;

use super::types::MemoryClass;

/// Command rate in clock cycles per command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandRate {
    OneT,
    TwoT,
}

impl CommandRate {
    pub fn cycles(self) -> u8 {
        match self {
            CommandRate::OneT => 1,
            CommandRate::TwoT => 2,
        }
    }
}

/// Controller-to-memory clock ratio (DDR5 only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GearMode {
    Gear1,
    Gear2,
}

impl GearMode {
    pub fn ratio(self) -> u8 {
        match self {
            GearMode::Gear1 => 1,
            GearMode::Gear2 => 2,
        }
    }
}

/// Immutable catalog description of a memory controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSpec {
    pub name: &'static str,
    /// IMC quality bin from 1 (worst) to 10 (best)
    pub imc_quality: u8,
    pub max_safe_voltage: f64,
    pub supports_gear_down: bool,
    pub supports_command_rate_1t: bool,
    pub command_rate: CommandRate,
    pub gear_mode: GearMode,
    pub vccio_voltage: f64,
    pub vccsa_voltage: f64,
}

/// Controller-side voltages and timing-mode flags for the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryController {
    spec: ControllerSpec,
    command_rate: CommandRate,
    gear_mode: GearMode,
    vccio_voltage: f64,
    vccsa_voltage: f64,
}

impl MemoryController {
    /// Selects a controller from its catalog entry.
    pub fn from_spec(spec: &ControllerSpec) -> Self {
        Self {
            command_rate: spec.command_rate,
            gear_mode: spec.gear_mode,
            vccio_voltage: spec.vccio_voltage,
            vccsa_voltage: spec.vccsa_voltage,
            spec: spec.clone(),
        }
    }

    pub fn spec(&self) -> &ControllerSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        self.spec.name
    }

    pub fn imc_quality(&self) -> u8 {
        self.spec.imc_quality
    }

    pub fn command_rate(&self) -> CommandRate {
        self.command_rate
    }

    pub fn gear_mode(&self) -> GearMode {
        self.gear_mode
    }

    /// Gear mode when it is meaningful for the installed memory class.
    pub fn effective_gear_mode(&self, class: MemoryClass) -> Option<GearMode> {
        class.uses_gear_modes().then_some(self.gear_mode)
    }

    pub fn vccio_voltage(&self) -> f64 {
        self.vccio_voltage
    }

    pub fn vccsa_voltage(&self) -> f64 {
        self.vccsa_voltage
    }

    pub(crate) fn store_vccio(&mut self, voltage: f64) {
        self.vccio_voltage = voltage;
    }

    pub(crate) fn store_vccsa(&mut self, voltage: f64) {
        self.vccsa_voltage = voltage;
    }
}
