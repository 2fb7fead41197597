//! Tick pacing and random number generation for stress tests.

use std::time::Duration;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of the fixed pause taken after every stress test tick.
///
/// Real runs sleep; tests inject [`DeterministicClock`] so a run takes no
/// wall-clock time.
pub trait TickClock {
    /// Suspends the caller for one tick interval.
    fn pause(&mut self, interval: Duration);

    /// Total time spent in pauses so far.
    fn elapsed(&self) -> Duration;
}

/// Clock that blocks the current thread for each pause.
#[derive(Debug, Clone, Default)]
pub struct WallClock {
    elapsed: Duration,
}

impl WallClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickClock for WallClock {
    fn pause(&mut self, interval: Duration) {
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
        self.elapsed += interval;
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Deterministic clock for simulation time control.
///
/// Pauses advance virtual time instantly, independent of wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct DeterministicClock {
    elapsed: Duration,
    pauses: u64,
}

impl DeterministicClock {
    /// Creates new deterministic clock starting at simulation time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pauses taken so far.
    pub fn pauses(&self) -> u64 {
        self.pauses
    }

    /// Resets clock to initial state.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.pauses = 0;
    }
}

impl TickClock for DeterministicClock {
    fn pause(&mut self, interval: Duration) {
        self.elapsed += interval;
        self.pauses += 1;
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Seeded random number generator driving fault injection.
///
/// Uses ChaCha8 so a given seed reproduces the same faults on every
/// platform.
#[derive(Debug, Clone)]
pub struct FaultRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl FaultRng {
    /// Creates deterministic RNG from seed value.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates RNG from a random seed, recording it for replay.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// Creates RNG from an optional configured seed.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }

    /// Returns the seed used for this RNG.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns true with the given probability.
    ///
    /// Probabilities at or above 1 always hit and at or below 0 never do.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.random::<f64>() < probability
    }
}

impl RngCore for FaultRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_clock_advancement() {
        let mut clock = DeterministicClock::new();

        clock.pause(Duration::from_millis(100));
        clock.pause(Duration::from_millis(100));
        assert_eq!(clock.elapsed(), Duration::from_millis(200));
        assert_eq!(clock.pauses(), 2);

        clock.reset();
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_wall_clock_skips_zero_interval() {
        let mut clock = WallClock::new();
        clock.pause(Duration::ZERO);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_fault_rng_reproducibility() {
        let mut rng1 = FaultRng::from_seed(12345);
        let mut rng2 = FaultRng::from_seed(12345);

        let values1: Vec<bool> = (0..50).map(|_| rng1.chance(0.3)).collect();
        let values2: Vec<bool> = (0..50).map(|_| rng2.chance(0.3)).collect();

        assert_eq!(values1, values2);
        assert_eq!(rng1.seed(), 12345);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = FaultRng::from_seed(1);

        assert!((0..100).all(|_| !rng.chance(0.0)));
        assert!((0..100).all(|_| rng.chance(1.0)));
        assert!((0..100).all(|_| rng.chance(1.8)));
    }
}
