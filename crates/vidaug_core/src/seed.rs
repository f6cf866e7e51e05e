//! Deterministic random number generation utilities.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A seed for deterministic random number generation.
///
/// Using the same seed will produce the same sequence of random numbers,
/// ensuring reproducibility across runs.
///
/// # Example
///
/// ```rust
/// use vidaug_core::Seed;
/// use rand::Rng;
///
/// let mut rng = Seed::new(42).to_rng();
/// let mut rng2 = Seed::new(42).to_rng();
///
/// let val1: f64 = rng.gen();
/// let val2: f64 = rng2.gen();
/// assert_eq!(val1, val2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(u64);

impl Seed {
    /// Create a new seed with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Create a seed from the current system time.
    ///
    /// This is useful for non-reproducible random behavior.
    #[must_use]
    pub fn from_entropy() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self(nanos)
    }

    /// Create a new random number generator from this seed.
    #[must_use]
    pub fn to_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }

    /// Derive a new seed from this seed using a key.
    ///
    /// Handy for giving each pipeline its own stream from one master seed.
    ///
    /// ```rust
    /// use vidaug_core::Seed;
    ///
    /// let master = Seed::new(42);
    /// assert_ne!(master.derive("train"), master.derive("valid"));
    /// ```
    #[must_use]
    pub fn derive(&self, key: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        key.hash(&mut hasher);
        Self(hasher.finish())
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}
