//! Fixed catalogs of memory kits and memory controllers.

use super::controller::{CommandRate, ControllerSpec, GearMode};
use super::module::ModuleSpec;
use super::types::{MemoryClass, MemoryIc, Timings};
use MemoryClass::{Ddr4, Ddr5};
use MemoryIc::{
    HynixCjr, HynixDjr, HynixMfr, MicronBDie, MicronEDie, SamsungBDie, SamsungCDie, SamsungEDie,
};

const DDR4_JEDEC: (u32, Timings) = (2133, Timings::new(15, 15, 15, 36));
const DDR5_JEDEC: (u32, Timings) = (4800, Timings::new(40, 40, 40, 76));

#[allow(clippy::too_many_arguments)]
const fn kit(
    name: &'static str,
    class: MemoryClass,
    ic: MemoryIc,
    rated_frequency: u32,
    rated_timings: Timings,
    rated_voltage: f64,
    capacity_gb: u32,
    idle_temperature: f64,
    quality_bin: u8,
) -> ModuleSpec {
    let (jedec_frequency, jedec_timings) = match class {
        MemoryClass::Ddr4 => DDR4_JEDEC,
        MemoryClass::Ddr5 => DDR5_JEDEC,
    };
    ModuleSpec {
        name,
        class,
        ic,
        jedec_frequency,
        jedec_timings,
        rated_frequency,
        rated_timings,
        rated_voltage,
        capacity_gb,
        idle_temperature,
        quality_bin,
    }
}

/// Every selectable memory kit, older generation first.
#[rustfmt::skip]
pub static MODULE_CATALOG: [ModuleSpec; 20] = [
    kit("Corsair Vengeance LPX 3200", Ddr4, HynixCjr, 3200, Timings::new(16, 18, 18, 36), 1.35, 16, 35.0, 6),
    kit("G.Skill Trident Z Neo 3600", Ddr4, SamsungCDie, 3600, Timings::new(16, 19, 19, 39), 1.35, 16, 38.0, 7),
    kit("G.Skill Trident Z Royal 4000", Ddr4, SamsungBDie, 4000, Timings::new(19, 19, 19, 39), 1.4, 16, 40.0, 9),
    kit("Crucial Ballistix 3200", Ddr4, MicronEDie, 3200, Timings::new(16, 18, 18, 36), 1.35, 16, 36.0, 7),
    kit("Team T-Force Xtreem 4500", Ddr4, SamsungBDie, 4500, Timings::new(19, 19, 19, 39), 1.45, 16, 42.0, 10),
    kit("Kingston Fury Beast 3600", Ddr4, HynixDjr, 3600, Timings::new(18, 22, 22, 42), 1.35, 16, 37.0, 6),
    kit("Patriot Viper Steel 4400", Ddr4, SamsungBDie, 4400, Timings::new(19, 19, 19, 39), 1.45, 16, 41.0, 9),
    kit("Corsair Vengeance RGB Pro 3600", Ddr4, SamsungCDie, 3600, Timings::new(18, 22, 22, 42), 1.35, 16, 38.0, 7),
    kit("ADATA XPG Spectrix D60G 3600", Ddr4, HynixCjr, 3600, Timings::new(18, 20, 20, 40), 1.35, 16, 38.0, 6),
    kit("Thermaltake TOUGHRAM RGB 3200", Ddr4, SamsungCDie, 3200, Timings::new(16, 18, 18, 36), 1.35, 16, 36.0, 6),
    kit("Corsair Dominator Platinum 5200", Ddr5, MicronBDie, 5200, Timings::new(40, 40, 40, 76), 1.25, 32, 42.0, 8),
    kit("G.Skill Trident Z5 RGB 6000", Ddr5, SamsungEDie, 6000, Timings::new(30, 38, 38, 96), 1.35, 32, 45.0, 9),
    kit("Kingston Fury Beast 5600", Ddr5, MicronBDie, 5600, Timings::new(36, 36, 36, 76), 1.25, 32, 43.0, 7),
    kit("Corsair Vengeance DDR5 5600", Ddr5, HynixMfr, 5600, Timings::new(36, 36, 36, 76), 1.25, 32, 43.0, 7),
    kit("TeamGroup T-Force Delta RGB 6200", Ddr5, SamsungEDie, 6200, Timings::new(36, 36, 36, 76), 1.35, 32, 46.0, 8),
    kit("ADATA XPG Lancer RGB 6000", Ddr5, MicronBDie, 6000, Timings::new(32, 38, 38, 96), 1.35, 32, 45.0, 8),
    kit("Crucial DDR5 5200", Ddr5, MicronBDie, 5200, Timings::new(42, 42, 42, 84), 1.1, 32, 40.0, 6),
    kit("Patriot Viper Venom DDR5 6200", Ddr5, SamsungEDie, 6200, Timings::new(36, 36, 36, 76), 1.35, 32, 46.0, 9),
    kit("Thermaltake TOUGHRAM RC DDR5 5600", Ddr5, HynixMfr, 5600, Timings::new(36, 36, 36, 76), 1.25, 32, 43.0, 7),
    kit("G.Skill Trident Z5 Royal 6400", Ddr5, SamsungEDie, 6400, Timings::new(32, 39, 39, 102), 1.4, 32, 48.0, 10),
];

/// Every selectable memory controller.
pub static CONTROLLER_CATALOG: [ControllerSpec; 4] = [
    ControllerSpec {
        name: "Intel Z690/Z790 IMC",
        imc_quality: 7,
        max_safe_voltage: 1.5,
        supports_gear_down: true,
        supports_command_rate_1t: true,
        command_rate: CommandRate::TwoT,
        gear_mode: GearMode::Gear1,
        vccio_voltage: 1.1,
        vccsa_voltage: 1.25,
    },
    ControllerSpec {
        name: "AMD Zen 3 IMC",
        imc_quality: 6,
        max_safe_voltage: 1.45,
        supports_gear_down: false,
        supports_command_rate_1t: false,
        command_rate: CommandRate::OneT,
        gear_mode: GearMode::Gear1,
        vccio_voltage: 0.9,
        vccsa_voltage: 1.0,
    },
    ControllerSpec {
        name: "Intel Z490/Z590 IMC",
        imc_quality: 8,
        max_safe_voltage: 1.55,
        supports_gear_down: true,
        supports_command_rate_1t: true,
        command_rate: CommandRate::TwoT,
        gear_mode: GearMode::Gear1,
        vccio_voltage: 1.15,
        vccsa_voltage: 1.3,
    },
    ControllerSpec {
        name: "AMD Zen 4 IMC",
        imc_quality: 8,
        max_safe_voltage: 1.4,
        supports_gear_down: true,
        supports_command_rate_1t: true,
        command_rate: CommandRate::OneT,
        gear_mode: GearMode::Gear1,
        vccio_voltage: 0.95,
        vccsa_voltage: 1.05,
    },
];

/// Looks up a memory kit by 0-based catalog index.
pub fn module_spec(index: usize) -> Option<&'static ModuleSpec> {
    MODULE_CATALOG.get(index)
}

/// Looks up a memory controller by 0-based catalog index.
pub fn controller_spec(index: usize) -> Option<&'static ControllerSpec> {
    CONTROLLER_CATALOG.get(index)
}
