//! IC-specific frequency and timing ranges.
//!
//! Every lookup is an exhaustive match over [`MemoryIc`], so adding an IC
//! forces a decision about its ranges instead of inheriting a default.

use serde::Serialize;

use super::types::{MemoryClass, MemoryIc, TimingSlot, Timings};

/// Margin above the safe ceiling before a frequency counts as aggressive.
const AGGRESSIVE_MARGIN_MHZ: u32 = 200;

/// Inclusive frequency range in MHz (effective data rate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrequencyRange {
    pub min: u32,
    pub max: u32,
}

/// Inclusive range of typical values for a single timing slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingRange {
    pub min: u32,
    pub max: u32,
}

impl TimingRange {
    const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Stability delta contributed by one slot value.
    ///
    /// Tighter than `min` costs 5 points per cycle, looser than `max` earns 2.
    pub fn stability_delta(&self, value: u32) -> f64 {
        if value < self.min {
            -f64::from(self.min - value) * 5.0
        } else if value > self.max {
            f64::from(value - self.max) * 2.0
        } else {
            0.0
        }
    }
}

/// Typical ranges for all four primary timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingRanges([TimingRange; 4]);

impl TimingRanges {
    const fn new(cl: (u32, u32), trcd: (u32, u32), trp: (u32, u32), tras: (u32, u32)) -> Self {
        Self([
            TimingRange::new(cl.0, cl.1),
            TimingRange::new(trcd.0, trcd.1),
            TimingRange::new(trp.0, trp.1),
            TimingRange::new(tras.0, tras.1),
        ])
    }

    pub fn get(&self, slot: TimingSlot) -> TimingRange {
        self.0[slot.index()]
    }

    /// Signed sum of per-slot penalties and bonuses for a quadruple.
    pub fn stability_delta(&self, timings: &Timings) -> f64 {
        TimingSlot::ALL
            .iter()
            .map(|&slot| self.get(slot).stability_delta(timings.get(slot)))
            .sum()
    }
}

const GENERIC_TIMINGS: TimingRanges = TimingRanges::new((15, 20), (15, 22), (15, 22), (30, 44));

/// Typical frequency range for an IC on a given memory class.
pub fn frequency_range(ic: MemoryIc, class: MemoryClass) -> FrequencyRange {
    let (min, max) = match ic {
        MemoryIc::SamsungBDie => (3200, 4400),
        MemoryIc::SamsungCDie => (3000, 3800),
        MemoryIc::SamsungEDie => (2800, 3400),
        MemoryIc::HynixCjr => (3000, 3600),
        MemoryIc::HynixDjr => (3200, 3800),
        MemoryIc::HynixMfr => (2400, 3000),
        MemoryIc::MicronEDie => (3000, 3600),
        MemoryIc::MicronBDie => match class {
            MemoryClass::Ddr5 => (4800, 6000),
            MemoryClass::Ddr4 => (3400, 4000),
        },
    };
    FrequencyRange { min, max }
}

/// Typical primary timing ranges for an IC on a given memory class.
pub fn timing_ranges(ic: MemoryIc, class: MemoryClass) -> TimingRanges {
    match ic {
        MemoryIc::SamsungBDie => TimingRanges::new((14, 19), (14, 21), (14, 21), (28, 42)),
        MemoryIc::SamsungCDie => TimingRanges::new((16, 22), (16, 24), (16, 24), (32, 48)),
        MemoryIc::HynixCjr => TimingRanges::new((16, 20), (18, 22), (18, 22), (36, 44)),
        MemoryIc::MicronBDie => match class {
            MemoryClass::Ddr5 => TimingRanges::new((38, 46), (38, 48), (38, 48), (76, 96)),
            MemoryClass::Ddr4 => TimingRanges::new((15, 19), (17, 21), (17, 21), (34, 42)),
        },
        MemoryIc::SamsungEDie
        | MemoryIc::HynixDjr
        | MemoryIc::HynixMfr
        | MemoryIc::MicronEDie => GENERIC_TIMINGS,
    }
}

/// Advisory classification of a requested frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrequencyWarning {
    /// Requested frequency is below the module's JEDEC baseline.
    BelowJedec,
    /// Requested frequency is well above the IC's typical ceiling.
    AggressiveOverclock,
}

/// Classifies a frequency against the JEDEC floor and the IC ceiling.
pub fn classify_frequency(
    frequency: u32,
    jedec_frequency: u32,
    range: FrequencyRange,
) -> Option<FrequencyWarning> {
    if frequency < jedec_frequency {
        Some(FrequencyWarning::BelowJedec)
    } else if frequency > range.max + AGGRESSIVE_MARGIN_MHZ {
        Some(FrequencyWarning::AggressiveOverclock)
    } else {
        None
    }
}
