//! Steady-state thermal model and the session's thermal environment.
//!
//! Tuning operations apply small incremental temperature deltas as they go.
//! [`recompute_temperature`] is the absolute form: it derives temperature
//! from ambient, frequency offset and voltage offset and overwrites whatever
//! the increments accumulated.

use std::fmt;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::hardware::MemoryModule;
use crate::tuning::IDLE_OFFSET_ABOVE_AMBIENT;

/// Degrees per MHz above JEDEC in the steady-state model.
const FREQUENCY_HEAT_PER_MHZ: f64 = 0.005;

/// Temperature above which stability is reported as thermally penalized.
const THROTTLE_THRESHOLD: f64 = 75.0;

/// Allowed range for a user-set ambient temperature.
pub const AMBIENT_RANGE: (f64, f64) = (15.0, 35.0);

/// Ambient can't be pushed below this by adding case fans.
const CASE_FAN_FLOOR: f64 = 18.0;

/// Ambient drop per added case fan.
const CASE_FAN_DROP: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThermalError {
    #[error("Ambient temperature {value} is not a finite number")]
    InvalidAmbient { value: f64 },
}

/// Recomputes and stores the module's steady-state temperature.
///
/// `ambient + 10 + (freq - jedec) * 0.005 + (voltage - class_default) * k_v`
pub fn recompute_temperature(module: &mut MemoryModule, ambient: f64) -> f64 {
    let class = module.class();
    let frequency_offset =
        f64::from(module.frequency()) - f64::from(module.spec().jedec_frequency);
    let voltage_offset = module.voltage() - class.default_voltage();

    let temperature = ambient
        + IDLE_OFFSET_ABOVE_AMBIENT
        + frequency_offset * FREQUENCY_HEAT_PER_MHZ
        + voltage_offset * class.thermal_voltage_coefficient();

    module.store_temperature(temperature);
    temperature
}

/// Qualitative temperature band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThermalStatus {
    Excellent,
    Good,
    Warm,
    Hot,
    Critical,
}

impl ThermalStatus {
    pub fn classify(temperature: f64) -> Self {
        if temperature < 45.0 {
            ThermalStatus::Excellent
        } else if temperature < 65.0 {
            ThermalStatus::Good
        } else if temperature < 75.0 {
            ThermalStatus::Warm
        } else if temperature < 85.0 {
            ThermalStatus::Hot
        } else {
            ThermalStatus::Critical
        }
    }
}

impl fmt::Display for ThermalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ThermalStatus::Excellent => "EXCELLENT",
            ThermalStatus::Good => "GOOD",
            ThermalStatus::Warm => "WARM",
            ThermalStatus::Hot => "HOT",
            ThermalStatus::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// Stability points a hot module would lose, for display only.
///
/// Never applied to the stability score.
pub fn thermal_stability_penalty(temperature: f64) -> f64 {
    if temperature > THROTTLE_THRESHOLD {
        (temperature - THROTTLE_THRESHOLD) * 2.0
    } else {
        0.0
    }
}

/// Snapshot of the thermal view after a recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermalReading {
    pub ambient: f64,
    pub temperature: f64,
    pub status: ThermalStatus,
    pub stability_penalty: f64,
}

impl ThermalReading {
    pub fn new(ambient: f64, temperature: f64) -> Self {
        Self {
            ambient,
            temperature,
            status: ThermalStatus::classify(temperature),
            stability_penalty: thermal_stability_penalty(temperature),
        }
    }
}

/// Sensor-style reading: the stored temperature plus jitter in [-1, 1).
pub fn sample_sensor<R: Rng + ?Sized>(module: &MemoryModule, rng: &mut R) -> f64 {
    module.temperature() + rng.random_range(-1.0..1.0)
}

/// Cooling hardware; each choice sets its own ambient baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum CoolingSolution {
    Stock,
    TowerAir,
    AllInOneLiquid,
    CustomLoop,
}

impl CoolingSolution {
    pub fn baseline_ambient(self) -> f64 {
        match self {
            CoolingSolution::Stock => 28.0,
            CoolingSolution::TowerAir => 25.0,
            CoolingSolution::AllInOneLiquid => 22.0,
            CoolingSolution::CustomLoop => 20.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CoolingSolution::Stock => "Stock Cooler",
            CoolingSolution::TowerAir => "Tower Air Cooler",
            CoolingSolution::AllInOneLiquid => "AIO Liquid Cooler",
            CoolingSolution::CustomLoop => "Custom Loop",
        }
    }
}

/// Process-wide thermal environment for a session. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Environment {
    ambient: f64,
    cooling: CoolingSolution,
    case_fans: u32,
}

impl Environment {
    /// Starting environment, with ambient clamped to [`AMBIENT_RANGE`].
    pub fn new(ambient: f64, cooling: CoolingSolution) -> Self {
        Self {
            ambient: ambient.clamp(AMBIENT_RANGE.0, AMBIENT_RANGE.1),
            cooling,
            case_fans: 0,
        }
    }

    /// Ambient temperature in °C.
    pub fn ambient(&self) -> f64 {
        self.ambient
    }

    pub fn cooling(&self) -> CoolingSolution {
        self.cooling
    }

    pub fn case_fans(&self) -> u32 {
        self.case_fans
    }

    /// Sets ambient, clamped to [`AMBIENT_RANGE`].
    ///
    /// # Errors
    /// - `ThermalError::InvalidAmbient` - Value is NaN or infinite
    pub fn set_ambient(&mut self, value: f64) -> Result<f64, ThermalError> {
        if !value.is_finite() {
            return Err(ThermalError::InvalidAmbient { value });
        }
        self.ambient = value.clamp(AMBIENT_RANGE.0, AMBIENT_RANGE.1);
        Ok(self.ambient)
    }

    /// Switches cooling and resets ambient to that solution's baseline.
    pub fn select_cooling(&mut self, cooling: CoolingSolution) {
        self.cooling = cooling;
        self.ambient = cooling.baseline_ambient();
    }

    /// Adds a case fan, lowering ambient by 2.5 °C down to a floor of 18 °C.
    pub fn add_case_fan(&mut self) -> f64 {
        self.case_fans += 1;
        self.ambient = (self.ambient - CASE_FAN_DROP).max(CASE_FAN_FLOOR);
        self.ambient
    }
}
