//! # vidaug
//!
//! Random augmentation of video batches in Rust, on top of Burn tensors.
//!
//! A batch is a tensor `[B, T, C, H, W]` (or `[B, C, H, W]` for stills).
//! Randomized transforms treat each clip of the batch on its own: the batch
//! is split along the first axis, every clip draws its own parameters, and the
//! results are joined back in order.
//!
//! - **Core**: [`VideoBatch`](core::VideoBatch), the [`Transform`](core::Transform)
//!   trait, [`Compose`](core::Compose), seeding
//! - **Transforms**: horizontal flip, fixed crop with padding, random resized
//!   crop, random erasing, normalization
//! - **Pipelines**: JSON configs built into a [`Compose`](core::Compose)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vidaug::prelude::*;
//!
//! manual_seed(42);
//! let pipeline = PipelineConfig::from_file("pipeline.json")?.build::<NdArray, 5>()?;
//!
//! let batch = VideoBatch::new(Tensor::<NdArray, 5>::ones([8, 16, 3, 128, 171], &device))?;
//! let augmented = pipeline.apply(batch)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `backend-ndarray` (default): CPU backend using ndarray

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub use vidaug_core as core;
pub use vidaug_transforms as transforms;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use vidaug::prelude::*;
/// ```
pub mod prelude {
    pub use vidaug_core::{
        manual_seed, AugmentError, Clip, Compose, CropWindow, Identity, RandomSource, Result,
        Seed, Transform, VideoBatch, VideoShape,
    };

    pub use vidaug_transforms::{
        FixedCrop, HorizontalFlip, Interpolation, Normalize, PaddingSpec, PipelineConfig,
        RandomErasing, ResizedCrop, SizeSpec, TransformConfig,
    };

    #[cfg(feature = "backend-ndarray")]
    pub use vidaug_core::backend::NdArray;
}
