//! Random erasing.

use burn::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use vidaug_core::{
    randint_inclusive, Clip, CropWindow, RandomSource, Result, Seed, Transform, VideoBatch,
};

use crate::sampling::{
    check_probability, check_scale, draw_area_aspect, log_ratio, round_half_even, MAX_TRIALS,
};

/// Configuration for random erasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomErasingConfig {
    /// Probability of erasing a window in each clip.
    pub p: f64,
    /// Range of the erased area as a fraction of the frame area.
    pub scale: (f64, f64),
    /// Range of the erased window's aspect ratio.
    pub ratio: (f64, f64),
    /// Fill value.
    pub value: f32,
}

impl Default for RandomErasingConfig {
    fn default() -> Self {
        Self {
            p: 0.5,
            scale: (0.02, 0.33),
            ratio: (0.3, 3.3),
            value: 0.0,
        }
    }
}

/// Overwrites a random rectangle of every selected clip with a constant.
///
/// The rectangle spans every frame and channel of the clip. If no candidate
/// fits strictly inside the frame after [`MAX_TRIALS`] draws, the whole clip is
/// erased. Shapes never change.
#[derive(Debug, Clone)]
pub struct RandomErasing {
    config: RandomErasingConfig,
    log_ratio: (f64, f64),
    rng: RandomSource,
}

impl RandomErasing {
    /// Create with the given erase probability and default ranges.
    pub fn new(p: f64) -> Result<Self> {
        Self::from_config(RandomErasingConfig {
            p,
            ..Default::default()
        })
    }

    /// Create from config.
    ///
    /// # Errors
    ///
    /// Returns an error if `p` is outside `[0, 1]` or a range is malformed.
    pub fn from_config(config: RandomErasingConfig) -> Result<Self> {
        check_probability("erasing", config.p)?;
        check_scale(config.scale)?;
        let log_ratio = log_ratio(config.ratio)?;
        Ok(Self {
            config,
            log_ratio,
            rng: RandomSource::default(),
        })
    }

    /// Set the fill value.
    #[must_use]
    pub fn with_value(mut self, value: f32) -> Self {
        self.config.value = value;
        self
    }

    /// Set the area fraction range.
    pub fn with_scale(mut self, scale: (f64, f64)) -> Result<Self> {
        check_scale(scale)?;
        self.config.scale = scale;
        Ok(self)
    }

    /// Set the aspect ratio range.
    pub fn with_ratio(mut self, ratio: (f64, f64)) -> Result<Self> {
        self.log_ratio = log_ratio(ratio)?;
        self.config.ratio = ratio;
        Ok(self)
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

    /// Get the config.
    #[must_use]
    pub fn config(&self) -> &RandomErasingConfig {
        &self.config
    }

    /// Sample the erase window for one `height x width` clip.
    pub fn sample_window<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        height: usize,
        width: usize,
    ) -> CropWindow {
        let area = (height * width) as f64;

        for _ in 0..MAX_TRIALS {
            let (erase_area, aspect) =
                draw_area_aspect(rng, area, self.config.scale, self.log_ratio);
            let h = round_half_even((erase_area * aspect).sqrt());
            let w = round_half_even((erase_area / aspect).sqrt());

            if h < height && w < width {
                let top = randint_inclusive(rng, height - h);
                let left = randint_inclusive(rng, width - w);
                return CropWindow::new(top, left, h, w);
            }
        }

        tracing::debug!(height, width, "random erasing rejected every candidate, erasing whole clip");
        CropWindow::full(height, width)
    }

    /// Overwrite `window` of `clip` with `value`.
    pub fn erase_clip<B: Backend, const D: usize>(
        clip: Clip<B, D>,
        window: CropWindow,
        value: f32,
    ) -> Result<Clip<B, D>> {
        clip.fill(window, value)
    }
}

impl Default for RandomErasing {
    fn default() -> Self {
        let config = RandomErasingConfig::default();
        Self {
            log_ratio: (config.ratio.0.ln(), config.ratio.1.ln()),
            config,
            rng: RandomSource::default(),
        }
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for RandomErasing {
    fn apply(&self, batch: VideoBatch<B, D>) -> Result<VideoBatch<B, D>> {
        batch.map_clips(|index, clip| {
            let (height, width) = clip.spatial();
            let window = self.rng.with_rng(|rng| {
                let draw: f64 = rng.gen();
                (draw < self.config.p).then(|| self.sample_window(rng, height, width))
            });

            match window {
                Some(window) => {
                    tracing::trace!(clip = index, %window, "erasing window");
                    Self::erase_clip(clip, window, self.config.value)
                }
                None => Ok(clip),
            }
        })
    }

    fn name(&self) -> &str {
        "RandomErasing"
    }
}
