//! Per-channel normalization.

use burn::prelude::*;
use burn::tensor::ElementConversion;
use serde::{Deserialize, Serialize};

use vidaug_core::{AugmentError, Result, Transform, VideoBatch};

const IMAGENET_MEAN: [f64; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f64; 3] = [0.229, 0.224, 0.225];

const KINETICS_MEAN: [f64; 3] = [0.43216, 0.394666, 0.37645];
const KINETICS_STD: [f64; 3] = [0.22803, 0.22145, 0.216989];

/// Configuration for normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Per-channel mean.
    pub mean: Vec<f64>,
    /// Per-channel standard deviation.
    pub std: Vec<f64>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            mean: IMAGENET_MEAN.to_vec(),
            std: IMAGENET_STD.to_vec(),
        }
    }
}

/// Computes `(x - mean) / std` with one `(mean, std)` pair per channel.
///
/// The channel axis is the third from last (`C` in `[B, T, C, H, W]` and
/// `[B, C, H, W]`). Parameters are kept in `f64`; a `std` entry that becomes
/// zero once cast to the backend's float type is rejected when the transform
/// is applied.
#[derive(Debug, Clone)]
pub struct Normalize {
    config: NormalizeConfig,
}

impl Normalize {
    /// Create a new normalization.
    ///
    /// # Errors
    ///
    /// Returns an error if the lists are empty or differ in length.
    pub fn new(mean: &[f64], std: &[f64]) -> Result<Self> {
        Self::from_config(NormalizeConfig {
            mean: mean.to_vec(),
            std: std.to_vec(),
        })
    }

    /// Create from config.
    pub fn from_config(config: NormalizeConfig) -> Result<Self> {
        if config.mean.is_empty() || config.mean.len() != config.std.len() {
            return Err(AugmentError::invalid_argument(format!(
                "mean and std must be non-empty and of equal length, got {} and {}",
                config.mean.len(),
                config.std.len()
            )));
        }
        Ok(Self { config })
    }

    /// ImageNet RGB statistics.
    #[must_use]
    pub fn imagenet() -> Self {
        Self {
            config: NormalizeConfig::default(),
        }
    }

    /// Kinetics-400 RGB statistics.
    #[must_use]
    pub fn kinetics() -> Self {
        Self {
            config: NormalizeConfig {
                mean: KINETICS_MEAN.to_vec(),
                std: KINETICS_STD.to_vec(),
            },
        }
    }

    /// Per-channel mean.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.config.mean
    }

    /// Per-channel standard deviation.
    #[must_use]
    pub fn std(&self) -> &[f64] {
        &self.config.std
    }

    /// Get the config.
    #[must_use]
    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Parameters cast to the backend float type, laid out to broadcast
    /// along the channel axis.
    fn channel_tensor<B: Backend, const D: usize>(
        values: &[f64],
        device: &B::Device,
    ) -> Tensor<B, D> {
        let mut dims = [1usize; D];
        dims[D - 3] = values.len();
        let data: Vec<B::FloatElem> = values.iter().map(|v| v.elem()).collect();
        Tensor::from_data(TensorData::new(data, dims), device)
    }
}

impl Default for Normalize {
    fn default() -> Self {
        Self::imagenet()
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for Normalize {
    fn apply(&self, batch: VideoBatch<B, D>) -> Result<VideoBatch<B, D>> {
        let channels = batch.shape().channels();
        if channels != self.config.mean.len() {
            return Err(AugmentError::invalid_argument(format!(
                "normalize has {} channel parameters but the batch has {channels} channels \
                 (shape {})",
                self.config.mean.len(),
                batch.shape()
            )));
        }

        for (channel, &s) in self.config.std.iter().enumerate() {
            let cast: f64 = s.elem::<B::FloatElem>().elem();
            if cast == 0.0 {
                return Err(AugmentError::invalid_argument(format!(
                    "std evaluated to zero after conversion to {}, leading to division by zero \
                     (channel {channel}, std {s})",
                    std::any::type_name::<B::FloatElem>()
                )));
            }
        }

        let device = batch.device();
        let mean = Self::channel_tensor::<B, D>(&self.config.mean, &device);
        let std = Self::channel_tensor::<B, D>(&self.config.std, &device);
        VideoBatch::new((batch.into_inner() - mean) / std)
    }

    fn name(&self) -> &str {
        "Normalize"
    }
}
