//! Invariant checks over module state.

use std::fmt;

use crate::hardware::{MAX_STABILITY, MIN_STABILITY, MemoryModule};

/// Violation of a module invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct InvariantViolation {
    /// Name of the violated invariant
    pub invariant: String,
    /// Detailed description of the violation
    pub description: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant '{}' violated: {}", self.invariant, self.description)
    }
}

/// Trait for checking module invariants.
pub trait Invariant: Send + Sync {
    /// Checks if invariant holds for current state.
    ///
    /// # Errors
    /// Returns `InvariantViolation` if the invariant condition is not met.
    fn check(&self, module: &MemoryModule) -> Result<(), InvariantViolation>;

    /// Returns name of this invariant.
    fn name(&self) -> &str;

    fn violation(&self, description: String) -> InvariantViolation {
        InvariantViolation {
            invariant: self.name().to_string(),
            description,
        }
    }
}

/// Stability stays within [10, 100].
pub struct StabilityRangeInvariant;

impl Invariant for StabilityRangeInvariant {
    fn check(&self, module: &MemoryModule) -> Result<(), InvariantViolation> {
        let stability = module.stability();
        if !(MIN_STABILITY..=MAX_STABILITY).contains(&stability) {
            return Err(self.violation(format!(
                "Stability {stability} outside [{MIN_STABILITY}, {MAX_STABILITY}]"
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "StabilityRange"
    }
}

/// Frequency, voltage and every timing are positive.
pub struct PositiveSettingsInvariant;

impl Invariant for PositiveSettingsInvariant {
    fn check(&self, module: &MemoryModule) -> Result<(), InvariantViolation> {
        if module.frequency() == 0 {
            return Err(self.violation("Frequency is zero".to_string()));
        }
        if module.voltage().is_nan() || module.voltage() <= 0.0 {
            return Err(self.violation(format!("Voltage {} is not positive", module.voltage())));
        }
        if module.timings().to_array().contains(&0) {
            return Err(self.violation(format!("Timings {} contain zero", module.timings())));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "PositiveSettings"
    }
}

/// Error count never drops below a previously observed value.
pub struct ErrorCountInvariant {
    floor: u64,
}

impl ErrorCountInvariant {
    /// Creates invariant requiring at least `floor` recorded errors.
    pub fn new(floor: u64) -> Self {
        Self { floor }
    }
}

impl Invariant for ErrorCountInvariant {
    fn check(&self, module: &MemoryModule) -> Result<(), InvariantViolation> {
        if module.error_count() < self.floor {
            return Err(self.violation(format!(
                "Error count dropped from {} to {}",
                self.floor,
                module.error_count()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ErrorCountMonotonic"
    }
}

/// Checks every module invariant, given the last observed error count.
pub fn check_module(module: &MemoryModule, error_floor: u64) -> Vec<InvariantViolation> {
    let invariants: [&dyn Invariant; 3] = [
        &StabilityRangeInvariant,
        &PositiveSettingsInvariant,
        &ErrorCountInvariant::new(error_floor),
    ];

    invariants
        .iter()
        .filter_map(|invariant| invariant.check(module).err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::catalog;

    #[test]
    fn test_fresh_module_satisfies_invariants() {
        let module = MemoryModule::from_spec(catalog::module_spec(4).unwrap());
        assert!(check_module(&module, 0).is_empty());
    }

    #[test]
    fn test_error_floor_violation() {
        let module = MemoryModule::from_spec(catalog::module_spec(4).unwrap());
        let violations = check_module(&module, 3);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].invariant, "ErrorCountMonotonic");
        assert!(violations[0].to_string().contains("dropped from 3 to 0"));
    }
}
