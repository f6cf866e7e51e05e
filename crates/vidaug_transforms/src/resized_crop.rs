//! Random resized crop.
//!
//! Every clip gets its own window: the area fraction is drawn from `scale`,
//! the aspect ratio log-uniformly from `ratio`, and the candidate is accepted
//! if it fits in the frame. After [`MAX_TRIALS`] rejected candidates the clip
//! falls back to a deterministic central crop clamped to the ratio bounds.
//! The window is then resampled to the output size, so every clip of the
//! output batch has the same frame size whichever path produced it.

use burn::prelude::*;
use burn::tensor::module::interpolate;
use burn::tensor::ops::{InterpolateMode, InterpolateOptions};
use rand::Rng;
use serde::{Deserialize, Serialize};

use vidaug_core::{
    randint_inclusive, AugmentError, Clip, CropWindow, RandomSource, Result, Seed, Transform,
    VideoBatch,
};

use crate::sampling::{check_scale, draw_area_aspect, log_ratio, round_half_even, MAX_TRIALS};
use crate::size::{SizeArg, SizeSpec};

/// Resampling filter used when resizing the cropped window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Nearest neighbour.
    Nearest,
    /// Bilinear.
    #[default]
    Bilinear,
    /// Bicubic.
    Bicubic,
}

impl From<Interpolation> for InterpolateMode {
    fn from(mode: Interpolation) -> Self {
        match mode {
            Interpolation::Nearest => InterpolateMode::Nearest,
            Interpolation::Bilinear => InterpolateMode::Bilinear,
            Interpolation::Bicubic => InterpolateMode::Bicubic,
        }
    }
}

/// Configuration for random resized crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizedCropConfig {
    /// Output frame size.
    pub size: SizeArg,
    /// Range of the crop area as a fraction of the frame area.
    pub scale: (f64, f64),
    /// Range of the crop aspect ratio (width / height).
    pub ratio: (f64, f64),
    /// Resampling filter.
    pub interpolation: Interpolation,
}

impl Default for ResizedCropConfig {
    fn default() -> Self {
        Self {
            size: SizeArg::default(),
            scale: (0.08, 1.0),
            ratio: (3.0 / 4.0, 4.0 / 3.0),
            interpolation: Interpolation::default(),
        }
    }
}

/// Crops a random area/aspect window from every clip and resizes it to a
/// fixed size.
///
/// # Shape
///
/// `[B, ..., H, W]` -> `[B, ..., size.height, size.width]`
#[derive(Debug, Clone)]
pub struct ResizedCrop {
    size: SizeSpec,
    scale: (f64, f64),
    ratio: (f64, f64),
    log_ratio: (f64, f64),
    interpolation: Interpolation,
    rng: RandomSource,
}

impl ResizedCrop {
    /// Create a new transform with the default scale and ratio ranges.
    #[must_use]
    pub fn new(size: SizeSpec) -> Self {
        let defaults = ResizedCropConfig::default();
        Self {
            size,
            scale: defaults.scale,
            ratio: defaults.ratio,
            log_ratio: (defaults.ratio.0.ln(), defaults.ratio.1.ln()),
            interpolation: defaults.interpolation,
            rng: RandomSource::default(),
        }
    }

    /// Create from config.
    pub fn from_config(config: &ResizedCropConfig) -> Result<Self> {
        Self::new(SizeSpec::try_from(&config.size)?)
            .with_scale(config.scale)?
            .with_ratio(config.ratio)
            .map(|crop| crop.with_interpolation(config.interpolation))
    }

    /// Set the area fraction range.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < low <= high <= 1`.
    pub fn with_scale(mut self, scale: (f64, f64)) -> Result<Self> {
        check_scale(scale)?;
        self.scale = scale;
        Ok(self)
    }

    /// Set the aspect ratio range.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < low <= high`.
    pub fn with_ratio(mut self, ratio: (f64, f64)) -> Result<Self> {
        self.log_ratio = log_ratio(ratio)?;
        self.ratio = ratio;
        Ok(self)
    }

    /// Set the resampling filter.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
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

    /// Area fraction range.
    #[must_use]
    pub fn scale(&self) -> (f64, f64) {
        self.scale
    }

    /// Aspect ratio range.
    #[must_use]
    pub fn ratio(&self) -> (f64, f64) {
        self.ratio
    }

    /// Resampling filter.
    #[must_use]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Sample the crop window for one `height x width` clip.
    pub fn sample_window<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        height: usize,
        width: usize,
    ) -> CropWindow {
        let area = (height * width) as f64;

        for _ in 0..MAX_TRIALS {
            let (target_area, aspect) = draw_area_aspect(rng, area, self.scale, self.log_ratio);
            let h = round_half_even((target_area / aspect).sqrt());
            let w = round_half_even((target_area * aspect).sqrt());

            if 0 < w && w <= width && 0 < h && h <= height {
                let top = randint_inclusive(rng, height - h);
                let left = randint_inclusive(rng, width - w);
                return CropWindow::new(top, left, h, w);
            }
        }

        let window = self.fallback_window(height, width);
        tracing::debug!(%window, "resized crop rejected every candidate, using central crop");
        window
    }

    /// The central crop used once every candidate has been rejected.
    ///
    /// A frame wider or taller than the ratio bounds allow is trimmed to the
    /// nearest bound; otherwise the whole frame is used.
    #[must_use]
    pub fn fallback_window(&self, height: usize, width: usize) -> CropWindow {
        let in_ratio = width as f64 / height as f64;
        let (min_ratio, max_ratio) = self.ratio;

        let (h, w) = if in_ratio < min_ratio {
            (round_half_even(width as f64 / min_ratio), width)
        } else if in_ratio > max_ratio {
            (height, round_half_even(height as f64 * max_ratio))
        } else {
            (height, width)
        };

        let top = height.saturating_sub(h) / 2;
        let left = width.saturating_sub(w) / 2;
        CropWindow::new(top, left, h, w)
    }

    fn resize<B: Backend, const D: usize>(&self, clip: Clip<B, D>) -> Result<Clip<B, D>> {
        let (height, width) = clip.spatial();
        let (out_h, out_w) = self.size.as_tuple();
        if (height, width) == (out_h, out_w) {
            return Ok(clip);
        }

        let mut out_dims = [0usize; D];
        out_dims.copy_from_slice(clip.shape().with_spatial(out_h, out_w).dims());
        let frames: usize = clip.shape().dims()[..D - 2].iter().product();

        // Every frame and channel is resampled as a separate plane.
        let planes = clip.into_inner().reshape([1, frames, height, width]);
        let resized = interpolate(
            planes,
            [out_h, out_w],
            InterpolateOptions::new(self.interpolation.into()),
        );
        Clip::new(resized.reshape(out_dims))
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for ResizedCrop {
    fn apply(&self, batch: VideoBatch<B, D>) -> Result<VideoBatch<B, D>> {
        batch.map_clips(|index, clip| {
            let (height, width) = clip.spatial();
            let window = self
                .rng
                .with_rng(|rng| self.sample_window(rng, height, width));
            tracing::trace!(clip = index, %window, "resized crop window");

            if window.is_empty() {
                return Err(AugmentError::invalid_argument(format!(
                    "crop window {window} of a {height}x{width} frame is empty and cannot be \
                     resized to {}",
                    self.size
                )));
            }
            self.resize(clip.crop(window)?)
        })
    }

    fn name(&self) -> &str {
        "ResizedCrop"
    }
}
