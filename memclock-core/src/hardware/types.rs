//! Closed vocabularies describing memory hardware.

use std::fmt;

use serde::Serialize;

/// Memory generation of a module.
///
/// The older generation is DDR4, the newer DDR5. Every class-dependent
/// constant in the model is looked up through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MemoryClass {
    Ddr4,
    Ddr5,
}

impl MemoryClass {
    /// JEDEC default DRAM voltage for this generation.
    pub fn default_voltage(self) -> f64 {
        match self {
            MemoryClass::Ddr4 => 1.2,
            MemoryClass::Ddr5 => 1.1,
        }
    }

    /// DRAM voltage above which a write needs explicit confirmation.
    pub fn dram_voltage_ceiling(self) -> f64 {
        match self {
            MemoryClass::Ddr4 => 1.5,
            MemoryClass::Ddr5 => 1.4,
        }
    }

    /// Stability points gained per volt of DRAM voltage increase.
    pub fn voltage_stability_gain(self) -> f64 {
        match self {
            MemoryClass::Ddr4 => 20.0,
            MemoryClass::Ddr5 => 25.0,
        }
    }

    /// Degrees gained per volt of DRAM voltage increase during an adjustment.
    pub fn voltage_heat_gain(self) -> f64 {
        match self {
            MemoryClass::Ddr4 => 15.0,
            MemoryClass::Ddr5 => 18.0,
        }
    }

    /// Degrees per volt above the class default in the steady-state model.
    pub fn thermal_voltage_coefficient(self) -> f64 {
        match self {
            MemoryClass::Ddr4 => 20.0,
            MemoryClass::Ddr5 => 25.0,
        }
    }

    /// Whether controller gear modes apply to this generation.
    pub fn uses_gear_modes(self) -> bool {
        matches!(self, MemoryClass::Ddr5)
    }
}

impl fmt::Display for MemoryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryClass::Ddr4 => write!(f, "DDR4"),
            MemoryClass::Ddr5 => write!(f, "DDR5"),
        }
    }
}

/// DRAM die vendor and process family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MemoryIc {
    SamsungBDie,
    SamsungCDie,
    SamsungEDie,
    HynixCjr,
    HynixDjr,
    HynixMfr,
    MicronEDie,
    MicronBDie,
}

impl fmt::Display for MemoryIc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemoryIc::SamsungBDie => "Samsung B-Die",
            MemoryIc::SamsungCDie => "Samsung C-Die",
            MemoryIc::SamsungEDie => "Samsung E-Die",
            MemoryIc::HynixCjr => "Hynix CJR",
            MemoryIc::HynixDjr => "Hynix DJR",
            MemoryIc::HynixMfr => "Hynix MFR",
            MemoryIc::MicronEDie => "Micron E-Die",
            MemoryIc::MicronBDie => "Micron B-Die",
        };
        f.write_str(name)
    }
}

/// One of the four primary timing slots, in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimingSlot {
    Cl,
    Trcd,
    Trp,
    Tras,
}

impl TimingSlot {
    /// All slots in CL, tRCD, tRP, tRAS order.
    pub const ALL: [TimingSlot; 4] = [
        TimingSlot::Cl,
        TimingSlot::Trcd,
        TimingSlot::Trp,
        TimingSlot::Tras,
    ];

    /// Maps a 1-based menu position to a slot.
    pub fn from_position(position: usize) -> Option<Self> {
        position
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// Zero-based index into a timing quadruple.
    pub fn index(self) -> usize {
        match self {
            TimingSlot::Cl => 0,
            TimingSlot::Trcd => 1,
            TimingSlot::Trp => 2,
            TimingSlot::Tras => 3,
        }
    }

    /// Short display name.
    pub fn label(self) -> &'static str {
        match self {
            TimingSlot::Cl => "CL",
            TimingSlot::Trcd => "tRCD",
            TimingSlot::Trp => "tRP",
            TimingSlot::Tras => "tRAS",
        }
    }
}

/// Primary timing quadruple (CL, tRCD, tRP, tRAS) in memory clock cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Timings {
    pub cl: u32,
    pub trcd: u32,
    pub trp: u32,
    pub tras: u32,
}

impl Timings {
    pub const fn new(cl: u32, trcd: u32, trp: u32, tras: u32) -> Self {
        Self { cl, trcd, trp, tras }
    }

    pub fn from_array(values: [u32; 4]) -> Self {
        let [cl, trcd, trp, tras] = values;
        Self { cl, trcd, trp, tras }
    }

    pub fn to_array(self) -> [u32; 4] {
        [self.cl, self.trcd, self.trp, self.tras]
    }

    pub fn get(&self, slot: TimingSlot) -> u32 {
        self.to_array()[slot.index()]
    }

    /// Returns a copy with one slot replaced.
    pub fn with(self, slot: TimingSlot, value: u32) -> Self {
        let mut values = self.to_array();
        values[slot.index()] = value;
        Self::from_array(values)
    }
}

impl fmt::Display for Timings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}-{}", self.cl, self.trcd, self.trp, self.tras)
    }
}
