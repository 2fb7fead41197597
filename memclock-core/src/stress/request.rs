//! Stress test parameters: intensity levels, presets and custom requests.

use std::fmt;

use serde::Serialize;

/// Load level of a stress test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
pub enum Intensity {
    Light,
    Medium,
    Heavy,
    Extreme,
}

impl Intensity {
    /// Scales the failure chance derived from stability.
    pub fn multiplier(self) -> f64 {
        match self {
            Intensity::Light => 0.5,
            Intensity::Medium => 1.0,
            Intensity::Heavy => 1.5,
            Intensity::Extreme => 2.0,
        }
    }

    /// Degrees added to the module for the duration of the run.
    pub fn temperature_increase(self) -> f64 {
        match self {
            Intensity::Light => 5.0,
            Intensity::Medium => 10.0,
            Intensity::Heavy => 15.0,
            Intensity::Extreme => 20.0,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Intensity::Light => "light",
            Intensity::Medium => "medium",
            Intensity::Heavy => "heavy",
            Intensity::Extreme => "extreme",
        };
        f.write_str(label)
    }
}

/// A labelled stress test of a given length and intensity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StressTestRequest {
    pub label: String,
    /// Number of ticks, one per simulated second
    pub duration: u32,
    pub intensity: Intensity,
}

impl StressTestRequest {
    pub fn new(label: impl Into<String>, duration: u32, intensity: Intensity) -> Self {
        Self {
            label: label.into(),
            duration,
            intensity,
        }
    }

    /// User-defined test with duration clamped to `bounds`.
    ///
    /// An inverted pair resolves to the upper bound.
    pub fn custom(duration: u32, intensity: Intensity, bounds: (u32, u32)) -> Self {
        let (min, max) = bounds;
        Self::new("Custom Test", duration.max(min).min(max), intensity)
    }
}

/// Well-known stress test programs with fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum StressPreset {
    MemTest86,
    Prime95Blend,
    Aida64Memory,
    YCruncher,
}

impl StressPreset {
    pub const ALL: [StressPreset; 4] = [
        StressPreset::MemTest86,
        StressPreset::Prime95Blend,
        StressPreset::Aida64Memory,
        StressPreset::YCruncher,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StressPreset::MemTest86 => "MemTest86",
            StressPreset::Prime95Blend => "Prime95 Blend",
            StressPreset::Aida64Memory => "AIDA64 Memory",
            StressPreset::YCruncher => "Y-Cruncher",
        }
    }

    pub fn request(self) -> StressTestRequest {
        let (duration, intensity) = match self {
            StressPreset::MemTest86 => (10, Intensity::Light),
            StressPreset::Prime95Blend => (20, Intensity::Medium),
            StressPreset::Aida64Memory => (30, Intensity::Heavy),
            StressPreset::YCruncher => (60, Intensity::Extreme),
        };
        StressTestRequest::new(self.label(), duration, intensity)
    }
}
