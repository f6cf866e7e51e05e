//! Fixed-size random crop with optional padding.

use burn::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use vidaug_core::{
    randint_inclusive, AugmentError, CropWindow, RandomSource, Result, Seed, Transform,
    VideoBatch,
};

use crate::size::{PaddingArg, PaddingSpec, SizeArg, SizeSpec};

/// Configuration for fixed-size random crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedCropConfig {
    /// Output frame size.
    pub size: SizeArg,
    /// Padding applied to the whole batch before cropping.
    pub padding: PaddingArg,
    /// Value written into the padded border.
    pub pad_value: f32,
}

impl Default for FixedCropConfig {
    fn default() -> Self {
        Self {
            size: SizeArg::default(),
            padding: PaddingArg::default(),
            pad_value: 0.0,
        }
    }
}

/// Pads the batch, then cuts a `size` window out of every clip at an offset
/// drawn independently per clip.
///
/// When the padded frame already has the output size the padded batch is
/// returned as it is and no random numbers are drawn.
///
/// # Shape
///
/// `[B, ..., H, W]` -> `[B, ..., size.height, size.width]`
#[derive(Debug, Clone)]
pub struct FixedCrop {
    size: SizeSpec,
    padding: PaddingSpec,
    pad_value: f32,
    rng: RandomSource,
}

impl FixedCrop {
    /// Create a new crop without padding.
    #[must_use]
    pub fn new(size: SizeSpec) -> Self {
        Self {
            size,
            padding: PaddingSpec::default(),
            pad_value: 0.0,
            rng: RandomSource::default(),
        }
    }

    /// Create from config.
    pub fn from_config(config: &FixedCropConfig) -> Result<Self> {
        let size = SizeSpec::try_from(&config.size)?;
        let padding = PaddingSpec::try_from(&config.padding)?;
        Ok(Self::new(size)
            .with_padding(padding)
            .with_pad_value(config.pad_value))
    }

    /// Set the padding.
    #[must_use]
    pub fn with_padding(mut self, padding: PaddingSpec) -> Self {
        self.padding = padding;
        self
    }

    /// Set the value written into the padded border.
    #[must_use]
    pub fn with_pad_value(mut self, pad_value: f32) -> Self {
        self.pad_value = pad_value;
        self
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

    /// Output frame size.
    #[must_use]
    pub fn size(&self) -> SizeSpec {
        self.size
    }

    /// Padding applied before cropping.
    #[must_use]
    pub fn padding(&self) -> PaddingSpec {
        self.padding
    }

    /// Sample the crop window for one clip of a padded `height x width`
    /// frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the output is larger than the frame, since the
    /// offset range is then empty.
    pub fn sample_window<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        height: usize,
        width: usize,
    ) -> Result<CropWindow> {
        let (out_h, out_w) = self.size.as_tuple();
        let (Some(max_top), Some(max_left)) =
            (height.checked_sub(out_h), width.checked_sub(out_w))
        else {
            return Err(AugmentError::invalid_argument(format!(
                "cannot draw a crop offset: offset range is [0, {}] x [0, {}] for crop size {} \
                 and input size {height}x{width}",
                height as i64 - out_h as i64,
                width as i64 - out_w as i64,
                self.size,
            )));
        };
        let top = randint_inclusive(rng, max_top);
        let left = randint_inclusive(rng, max_left);
        Ok(CropWindow::new(top, left, out_h, out_w))
    }

    fn pad<B: Backend, const D: usize>(&self, batch: VideoBatch<B, D>) -> Result<VideoBatch<B, D>> {
        if self.padding.is_zero() {
            return Ok(batch);
        }
        VideoBatch::new(batch.into_inner().pad(self.padding.as_tuple(), self.pad_value))
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for FixedCrop {
    fn apply(&self, batch: VideoBatch<B, D>) -> Result<VideoBatch<B, D>> {
        let padded = self.pad(batch)?;
        let (height, width) = padded.spatial();
        let (out_h, out_w) = self.size.as_tuple();

        if height + 1 < out_h || width + 1 < out_w {
            return Err(AugmentError::invalid_argument(format!(
                "required crop size {} is larger than input image size {height}x{width} \
                 (after padding {:?})",
                self.size,
                self.padding.as_tuple(),
            )));
        }

        if (height, width) == (out_h, out_w) {
            tracing::debug!(size = %self.size, "crop size equals input size, skipping crop");
            return Ok(padded);
        }

        padded.map_clips(|index, clip| {
            let window = self
                .rng
                .with_rng(|rng| self.sample_window(rng, height, width))?;
            tracing::trace!(clip = index, %window, "fixed crop window");
            clip.crop(window)
        })
    }

    fn name(&self) -> &str {
        "FixedCrop"
    }
}
