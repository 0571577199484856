//! Key generator for random fills and deterministic simulation.
//!
//! Produces random but reproducible key sequences. A configurable fraction of
//! keys repeat an earlier key so the duplicate path gets exercised.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::btree::Key;

/// Configuration for key generation.
#[derive(Debug, Clone)]
pub struct KeyGenConfig {
    /// Smallest key produced (inclusive).
    pub min: Key,
    /// Largest key produced (inclusive).
    pub max: Key,
    /// Probability of repeating a previously produced key (0.0 - 1.0).
    pub duplicate_rate: f64,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            min: 0,
            max: 999,
            duplicate_rate: 0.0,
        }
    }
}

impl KeyGenConfig {
    /// Set the duplicate rate.
    #[must_use]
    pub const fn with_duplicate_rate(mut self, rate: f64) -> Self {
        self.duplicate_rate = rate;
        self
    }

    /// Set the key range.
    #[must_use]
    pub const fn with_range(mut self, min: Key, max: Key) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// Generator for key sequences.
pub struct KeyGenerator {
    rng: StdRng,
    config: KeyGenConfig,
    /// Every key produced so far, in order.
    emitted: Vec<Key>,
}

impl KeyGenerator {
    /// Create a generator with the default configuration.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, KeyGenConfig::default())
    }

    /// Create a generator with a custom configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: KeyGenConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
            emitted: Vec::new(),
        }
    }

    /// Produce the next key.
    pub fn next_key(&mut self) -> Key {
        let repeat =
            !self.emitted.is_empty() && self.rng.random::<f64>() < self.config.duplicate_rate;

        let key = if repeat {
            self.emitted[self.rng.random_range(0..self.emitted.len())]
        } else {
            let (lo, hi) = if self.config.min <= self.config.max {
                (self.config.min, self.config.max)
            } else {
                (self.config.max, self.config.min)
            };
            self.rng.random_range(lo..=hi)
        };

        self.emitted.push(key);
        key
    }

    /// Produce `count` keys.
    pub fn take(&mut self, count: usize) -> Vec<Key> {
        (0..count).map(|_| self.next_key()).collect()
    }

    /// Draw a value in `0.0..1.0` from the same stream.
    pub fn roll(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}
