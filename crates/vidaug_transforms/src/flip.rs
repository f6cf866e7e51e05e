//! Random horizontal flip.

use burn::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use vidaug_core::{Clip, RandomSource, Result, Seed, Transform, VideoBatch};

use crate::sampling::check_probability;

/// Configuration for horizontal flip augmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizontalFlipConfig {
    /// Probability of flipping each clip.
    pub p: f64,
}

impl Default for HorizontalFlipConfig {
    fn default() -> Self {
        Self { p: 0.5 }
    }
}

/// Mirrors clips along the width axis.
///
/// Each clip draws its own coin: one uniform sample in `[0, 1)` per clip, and
/// the clip is flipped when the sample is below `p`. All frames of a clip are
/// flipped together.
///
/// # Example
///
/// ```rust,ignore
/// use vidaug_transforms::HorizontalFlip;
///
/// let flip = HorizontalFlip::new(0.5)?;
/// let batch = flip.apply(batch)?;
/// ```
#[derive(Debug, Clone)]
pub struct HorizontalFlip {
    config: HorizontalFlipConfig,
    rng: RandomSource,
}

impl HorizontalFlip {
    /// Create a new horizontal flip transform.
    ///
    /// # Errors
    ///
    /// Returns an error if `p` is outside `[0, 1]`.
    pub fn new(p: f64) -> Result<Self> {
        Self::from_config(HorizontalFlipConfig { p })
    }

    /// Create from config.
    pub fn from_config(config: HorizontalFlipConfig) -> Result<Self> {
        check_probability("flip", config.p)?;
        Ok(Self {
            config,
            rng: RandomSource::default(),
        })
    }

    /// Draw from `rng` instead of the process-wide stream.
    #[must_use]
    pub fn with_random_source(mut self, rng: RandomSource) -> Self {
        self.rng = rng;
        self
    }

    /// Draw from a private stream seeded with `seed`.
    #[must_use]
    pub fn with_seed(self, seed: Seed) -> Self {
        self.with_random_source(RandomSource::new(seed))
    }

    /// Probability of flipping a clip.
    #[must_use]
    pub fn p(&self) -> f64 {
        self.config.p
    }

    /// Get the config.
    #[must_use]
    pub fn config(&self) -> &HorizontalFlipConfig {
        &self.config
    }

    /// Flip one clip unconditionally.
    #[must_use]
    pub fn flip_clip<B: Backend, const D: usize>(clip: Clip<B, D>) -> Clip<B, D> {
        clip.flip_width()
    }
}

impl Default for HorizontalFlip {
    fn default() -> Self {
        Self {
            config: HorizontalFlipConfig::default(),
            rng: RandomSource::default(),
        }
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for HorizontalFlip {
    fn apply(&self, batch: VideoBatch<B, D>) -> Result<VideoBatch<B, D>> {
        batch.map_clips(|index, clip| {
            let draw: f64 = self.rng.with_rng(|rng| rng.gen());
            if draw < self.config.p {
                tracing::trace!(clip = index, "flipping clip");
                Ok(Self::flip_clip(clip))
            } else {
                Ok(clip)
            }
        })
    }

    fn name(&self) -> &str {
        "HorizontalFlip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidaug_core::backend::NdArray;

    type TestBackend = NdArray;

    /// Batch of `n` identical clips `[n, 2, 1, 2, 3]`, each frame `0..6`.
    fn ramp_batch(n: usize) -> VideoBatch<TestBackend, 5> {
        let frame: Vec<f32> = (0..6).map(|v| v as f32).collect();
        let values: Vec<f32> = frame.iter().copied().cycle().take(n * 12).collect();
        let tensor = Tensor::from_data(TensorData::new(values, [n, 2, 1, 2, 3]), &Default::default());
        VideoBatch::new(tensor).unwrap()
    }

    fn values<const D: usize>(tensor: Tensor<TestBackend, D>) -> Vec<f32> {
        tensor.into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_horizontal_flip_config() {
        let config = HorizontalFlipConfig::default();
        assert_eq!(config.p, 0.5);

        let flip = HorizontalFlip::default();
        assert_eq!(<HorizontalFlip as Transform<TestBackend, 5>>::name(&flip), "HorizontalFlip");
    }

    #[test]
    fn test_invalid_probability() {
        assert!(HorizontalFlip::new(-0.1).unwrap_err().is_invalid_argument());
        assert!(HorizontalFlip::new(1.1).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_always_flip() {
        let flip = HorizontalFlip::new(1.0).unwrap().with_seed(Seed::new(0));
        let out = flip.apply(ramp_batch(2)).unwrap();
        assert_eq!(out.shape().dims(), &[2, 2, 1, 2, 3]);

        let data = values(out.into_inner());
        for row in data.chunks(3).step_by(2) {
            assert_eq!(row, &[2.0, 1.0, 0.0]);
        }
        for row in data.chunks(3).skip(1).step_by(2) {
            assert_eq!(row, &[5.0, 4.0, 3.0]);
        }
    }

    #[test]
    fn test_never_flip() {
        let flip = HorizontalFlip::new(0.0).unwrap().with_seed(Seed::new(0));
        let input = ramp_batch(3);
        let expected = values(input.inner().clone());
        assert_eq!(values(flip.apply(input).unwrap().into_inner()), expected);
    }

    #[test]
    fn test_flip_clip_twice_is_identity() {
        let clip = ramp_batch(1).into_clips().remove(0);
        let original = values(clip.inner().clone());
        let twice = HorizontalFlip::flip_clip(HorizontalFlip::flip_clip(clip));
        assert_eq!(values(twice.into_inner()), original);
    }

    #[test]
    fn test_clips_flip_independently() {
        let flip = HorizontalFlip::new(0.5).unwrap().with_seed(Seed::new(1234));
        let out = flip.apply(ramp_batch(64)).unwrap();
        let data = values(out.into_inner());

        let flipped = data.chunks(12).filter(|clip| clip[0] == 2.0).count();
        let kept = data.chunks(12).filter(|clip| clip[0] == 0.0).count();
        assert_eq!(flipped + kept, 64);
        assert!(flipped > 0 && kept > 0);
    }

    #[test]
    fn test_same_seed_same_flips() {
        let a = HorizontalFlip::new(0.5).unwrap().with_seed(Seed::new(77));
        let b = HorizontalFlip::new(0.5).unwrap().with_seed(Seed::new(77));
        let out_a = values(a.apply(ramp_batch(16)).unwrap().into_inner());
        let out_b = values(b.apply(ramp_batch(16)).unwrap().into_inner());
        assert_eq!(out_a, out_b);
    }
}
