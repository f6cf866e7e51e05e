//! Shared random source used by every randomized transform.
//!
//! Transforms never own their randomness. They hold a [`RandomSource`] handle,
//! which by default points at one process-wide stream. Callers that need
//! reproducible augmentation seed that stream (see [`manual_seed`]) or inject
//! their own handle before applying any transform.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::seed::Seed;

/// A cloneable handle to a shared `ChaCha8Rng` stream.
///
/// Clones share the same underlying stream. [`RandomSource::with_rng`] holds
/// the stream's lock for the duration of the closure, so every draw made for
/// one clip forms a single uninterrupted sequence even if the handle is
/// shared between threads.
#[derive(Clone)]
pub struct RandomSource {
    inner: Arc<Mutex<ChaCha8Rng>>,
}

impl RandomSource {
    /// Create a new, private stream from a seed.
    #[must_use]
    pub fn new(seed: Seed) -> Self {
        Self {
            inner: Arc::new(Mutex::new(seed.to_rng())),
        }
    }

    /// Create a new, private stream seeded from the system clock.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(Seed::from_entropy())
    }

    /// The process-wide stream.
    ///
    /// Seeded from entropy on first use; call [`manual_seed`] to make it
    /// reproducible.
    pub fn global() -> &'static RandomSource {
        static GLOBAL: OnceLock<RandomSource> = OnceLock::new();
        GLOBAL.get_or_init(RandomSource::from_entropy)
    }

    /// Reset the stream (and every clone of this handle) to `seed`.
    pub fn reseed(&self, seed: Seed) {
        *self.inner.lock() = seed.to_rng();
    }

    /// Run `f` with exclusive access to the stream.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        let mut rng = self.inner.lock();
        f(&mut rng)
    }

    /// Check whether two handles draw from the same stream.
    #[must_use]
    pub fn shares_stream_with(&self, other: &RandomSource) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for RandomSource {
    /// A handle to the process-wide stream.
    fn default() -> Self {
        Self::global().clone()
    }
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource")
            .field("global", &self.shares_stream_with(Self::global()))
            .finish_non_exhaustive()
    }
}

/// Reseed the process-wide stream.
pub fn manual_seed(seed: impl Into<Seed>) {
    RandomSource::global().reseed(seed.into());
}

/// Draw a float uniformly from `[low, high)`.
///
/// Unlike `Rng::gen_range`, an empty range (`low == high`) is allowed and
/// returns `low`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + (high - low) * rng.gen::<f64>()
}

/// Draw an integer uniformly from `[0, high]`, both ends inclusive.
pub fn randint_inclusive<R: Rng + ?Sized>(rng: &mut R, high: usize) -> usize {
    rng.gen_range(0..=high)
}
