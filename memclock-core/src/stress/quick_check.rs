//! Short sanity check that grades stability without a full stress run.

use rand::Rng;
use serde::Serialize;

use super::clock::FaultRng;

/// Verdict of a quick stability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuickCheckVerdict {
    /// Stability above 80
    Stable,
    /// Stability above 60
    MinorErrors,
    Unstable,
}

impl QuickCheckVerdict {
    pub fn from_stability(stability: f64) -> Self {
        if stability > 80.0 {
            QuickCheckVerdict::Stable
        } else if stability > 60.0 {
            QuickCheckVerdict::MinorErrors
        } else {
            QuickCheckVerdict::Unstable
        }
    }

    /// Draws the number of errors this verdict adds to the module.
    pub fn draw_errors(self, rng: &mut FaultRng) -> u64 {
        match self {
            QuickCheckVerdict::Stable => 0,
            QuickCheckVerdict::MinorErrors => rng.random_range(1..=5),
            QuickCheckVerdict::Unstable => rng.random_range(5..=20),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuickCheckReport {
    pub verdict: QuickCheckVerdict,
    pub errors_added: u64,
    pub stability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(QuickCheckVerdict::from_stability(80.5), QuickCheckVerdict::Stable);
        assert_eq!(QuickCheckVerdict::from_stability(80.0), QuickCheckVerdict::MinorErrors);
        assert_eq!(QuickCheckVerdict::from_stability(60.0), QuickCheckVerdict::Unstable);
    }

    #[test]
    fn test_error_draws_stay_in_band() {
        let mut rng = FaultRng::from_seed(99);

        for _ in 0..200 {
            assert_eq!(QuickCheckVerdict::Stable.draw_errors(&mut rng), 0);
            assert!((1..=5).contains(&QuickCheckVerdict::MinorErrors.draw_errors(&mut rng)));
            assert!((5..=20).contains(&QuickCheckVerdict::Unstable.draw_errors(&mut rng)));
        }
    }
}
