//! # vidaug_transforms
//!
//! Batch-level video augmentations with per-clip randomness.
//!
//! This crate provides:
//! - Geometric transforms ([`HorizontalFlip`], [`FixedCrop`], [`ResizedCrop`])
//! - Occlusion ([`RandomErasing`])
//! - Per-channel [`Normalize`]
//! - [`SizeSpec`] / [`PaddingSpec`] argument normalization
//! - [`PipelineConfig`], a JSON-loadable ordered list of transforms
//!
//! Every randomized transform splits the batch into clips, draws a fresh set
//! of parameters for each clip and stitches the results back together in
//! order.
//!
//! ## Example
//!
//! ```rust,ignore
//! use vidaug_core::{Compose, Seed, Transform};
//! use vidaug_transforms::{HorizontalFlip, Normalize, ResizedCrop, SizeSpec};
//!
//! let pipeline = Compose::new()
//!     .with(ResizedCrop::new(SizeSpec::square(112)?).with_seed(Seed::new(0)))
//!     .with(HorizontalFlip::new(0.5)?)
//!     .with(Normalize::imagenet());
//!
//! let batch = pipeline.apply(batch)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod crop;
pub mod erasing;
pub mod flip;
pub mod normalize;
pub mod pipeline;
pub mod resized_crop;
mod sampling;
pub mod size;

pub use crop::{FixedCrop, FixedCropConfig};
pub use erasing::{RandomErasing, RandomErasingConfig};
pub use flip::{HorizontalFlip, HorizontalFlipConfig};
pub use normalize::{Normalize, NormalizeConfig};
pub use pipeline::{PipelineConfig, TransformConfig};
pub use resized_crop::{Interpolation, ResizedCrop, ResizedCropConfig};
pub use sampling::MAX_TRIALS;
pub use size::{PaddingArg, PaddingSpec, SizeArg, SizeSpec};
