//! Memory modules, memory controllers and their catalogs.

pub mod catalog;
mod controller;
mod module;
pub mod ranges;
mod types;

pub use controller::{CommandRate, ControllerSpec, GearMode, MemoryController};
pub use module::{
    MAX_STABILITY, MIN_STABILITY, MemoryModule, ModuleMetrics, ModuleSpec, clamp_stability,
};
pub use ranges::{FrequencyRange, FrequencyWarning, TimingRange, TimingRanges};
pub use types::{MemoryClass, MemoryIc, TimingSlot, Timings};
