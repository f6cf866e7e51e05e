//! Serializable pipeline description.
//!
//! A pipeline is an ordered list of transform configs, each tagged with its
//! `"type"`:
//!
//! ```json
//! {
//!   "seed": 42,
//!   "transforms": [
//!     { "type": "ResizedCrop", "size": 112 },
//!     { "type": "HorizontalFlip", "p": 0.5 },
//!     { "type": "Normalize" }
//!   ]
//! }
//! ```

use std::path::Path;

use burn::prelude::*;
use serde::{Deserialize, Serialize};

use vidaug_core::{AugmentError, Compose, RandomSource, Result, Seed};

use crate::crop::{FixedCrop, FixedCropConfig};
use crate::erasing::{RandomErasing, RandomErasingConfig};
use crate::flip::{HorizontalFlip, HorizontalFlipConfig};
use crate::normalize::{Normalize, NormalizeConfig};
use crate::resized_crop::{ResizedCrop, ResizedCropConfig};

/// Config of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransformConfig {
    /// [`HorizontalFlip`].
    HorizontalFlip(HorizontalFlipConfig),
    /// [`FixedCrop`].
    FixedCrop(FixedCropConfig),
    /// [`ResizedCrop`].
    ResizedCrop(ResizedCropConfig),
    /// [`RandomErasing`].
    RandomErasing(RandomErasingConfig),
    /// [`Normalize`].
    Normalize(NormalizeConfig),
}

impl TransformConfig {
    /// Name of the transform this config builds.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HorizontalFlip(_) => "HorizontalFlip",
            Self::FixedCrop(_) => "FixedCrop",
            Self::ResizedCrop(_) => "ResizedCrop",
            Self::RandomErasing(_) => "RandomErasing",
            Self::Normalize(_) => "Normalize",
        }
    }
}

/// An ordered list of transforms plus an optional seed for their shared
/// random stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Seed of a private random stream. The process-wide stream is used when
    /// unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Stages in application order.
    pub transforms: Vec<TransformConfig>,
}

impl Default for PipelineConfig {
    /// A typical training pipeline for 112x112 clips.
    fn default() -> Self {
        Self {
            seed: None,
            transforms: vec![
                TransformConfig::ResizedCrop(ResizedCropConfig::default()),
                TransformConfig::HorizontalFlip(HorizontalFlipConfig::default()),
                TransformConfig::Normalize(NormalizeConfig::default()),
                TransformConfig::RandomErasing(RandomErasingConfig::default()),
            ],
        }
    }
}

impl PipelineConfig {
    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AugmentError::Config(format!("invalid pipeline config: {e}")))
    }

    /// Read and parse a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded pipeline config");
        Self::from_json_str(&json)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AugmentError::Config(format!("cannot serialize pipeline config: {e}")))
    }

    /// The random stream the built transforms share.
    #[must_use]
    pub fn random_source(&self) -> RandomSource {
        match self.seed {
            Some(seed) => RandomSource::new(Seed::new(seed)),
            None => RandomSource::global().clone(),
        }
    }

    /// Validate every stage and build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first construction error, prefixed with the stage index.
    pub fn build<B: Backend, const D: usize>(&self) -> Result<Compose<B, D>> {
        let rng = self.random_source();
        let mut pipeline = Compose::new();

        for (index, stage) in self.transforms.iter().enumerate() {
            let context = |e: AugmentError| match e {
                AugmentError::InvalidArgument(msg) => AugmentError::InvalidArgument(format!(
                    "stage {index} ({}): {msg}",
                    stage.kind()
                )),
                other => other,
            };

            match stage {
                TransformConfig::HorizontalFlip(config) => pipeline.push(
                    HorizontalFlip::from_config(config.clone())
                        .map_err(context)?
                        .with_random_source(rng.clone()),
                ),
                TransformConfig::FixedCrop(config) => pipeline.push(
                    FixedCrop::from_config(config)
                        .map_err(context)?
                        .with_random_source(rng.clone()),
                ),
                TransformConfig::ResizedCrop(config) => pipeline.push(
                    ResizedCrop::from_config(config)
                        .map_err(context)?
                        .with_random_source(rng.clone()),
                ),
                TransformConfig::RandomErasing(config) => pipeline.push(
                    RandomErasing::from_config(config.clone())
                        .map_err(context)?
                        .with_random_source(rng.clone()),
                ),
                TransformConfig::Normalize(config) => {
                    pipeline.push(Normalize::from_config(config.clone()).map_err(context)?)
                }
            }
        }

        tracing::debug!(stages = pipeline.len(), seeded = self.seed.is_some(), "built pipeline");
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::SizeArg;
    use vidaug_core::backend::NdArray;
    use vidaug_core::{Transform, VideoBatch};

    type TestBackend = NdArray;

    #[test]
    fn test_parse_tagged_stages() {
        let config = PipelineConfig::from_json_str(
            r#"{
                "seed": 7,
                "transforms": [
                    {"type": "FixedCrop", "size": [4, 6], "padding": [2, 1, 4, 3]},
                    {"type": "HorizontalFlip", "p": 1.0},
                    {"type": "Normalize", "mean": [0.5], "std": [0.5]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.transforms.len(), 3);
        match &config.transforms[0] {
            TransformConfig::FixedCrop(crop) => assert_eq!(crop.size, SizeArg::Seq(vec![4, 6])),
            other => panic!("unexpected stage {other:?}"),
        }
        assert_eq!(config.transforms[1].kind(), "HorizontalFlip");
    }

    #[test]
    fn test_default_round_trips_through_json() {
        let config = PipelineConfig::default();
        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"type\": \"ResizedCrop\""));
        assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_unknown_stage_is_config_error() {
        let err = PipelineConfig::from_json_str(r#"{"transforms": [{"type": "Rotate"}]}"#)
            .unwrap_err();
        assert!(matches!(err, AugmentError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PipelineConfig::from_file("/nonexistent/vidaug/pipeline.json").unwrap_err();
        assert!(matches!(err, AugmentError::Io(_)));
    }

    #[test]
    fn test_build_names_stages_in_order() {
        let pipeline = PipelineConfig::default().build::<TestBackend, 5>().unwrap();
        let names: Vec<&str> = pipeline.names().collect();
        assert_eq!(names, ["ResizedCrop", "HorizontalFlip", "Normalize", "RandomErasing"]);
    }

    #[test]
    fn test_build_reports_invalid_stage() {
        let config = PipelineConfig {
            seed: None,
            transforms: vec![
                TransformConfig::HorizontalFlip(HorizontalFlipConfig::default()),
                TransformConfig::RandomErasing(RandomErasingConfig {
                    p: 3.0,
                    ..Default::default()
                }),
            ],
        };
        let err = config.build::<TestBackend, 5>().unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("stage 1 (RandomErasing)"), "{err}");
    }

    #[test]
    fn test_seeded_pipelines_agree() {
        let config = PipelineConfig {
            seed: Some(3),
            transforms: vec![
                TransformConfig::ResizedCrop(ResizedCropConfig {
                    size: SizeArg::Scalar(6),
                    ..Default::default()
                }),
                TransformConfig::RandomErasing(RandomErasingConfig {
                    p: 1.0,
                    ..Default::default()
                }),
            ],
        };

        let run = || {
            let values: Vec<f32> = (0..2 * 2 * 3 * 12 * 12).map(|v| (v % 23) as f32).collect();
            let batch = VideoBatch::<TestBackend, 5>::new(Tensor::from_data(
                TensorData::new(values, [2, 2, 3, 12, 12]),
                &Default::default(),
            ))
            .unwrap();
            let out = config.build::<TestBackend, 5>().unwrap().apply(batch).unwrap();
            assert_eq!(out.shape().dims(), &[2, 2, 3, 6, 6]);
            out.into_inner().into_data().to_vec::<f32>().unwrap()
        };
        assert_eq!(run(), run());
    }
}
