//! # vidaug_core
//!
//! Core types and traits for vidaug video batch augmentation.
//!
//! This crate provides:
//! - [`VideoBatch`] and [`Clip`] wrappers for Burn tensors, with the
//!   split/rejoin discipline used for per-clip randomness
//! - [`VideoShape`] shape metadata and [`CropWindow`]
//! - [`RandomSource`], the shared random stream, and [`Seed`]
//! - [`Transform`] trait, [`Compose`] and [`Identity`]
//! - Error types
//!
//! ## Shape Convention
//!
//! Batches follow the convention `(B, ..., H, W)`:
//! - `B`: Batch size (number of clips)
//! - `...`: `(T, C)` for video, `(C)` for still images
//! - `H`, `W`: Frame height and width
//!
//! ## Example
//!
//! ```rust,ignore
//! use vidaug_core::{manual_seed, VideoBatch};
//!
//! manual_seed(42);
//! let batch = VideoBatch::new(Tensor::<NdArray, 5>::zeros([8, 16, 3, 112, 112], &device))?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod batch;
mod error;
mod random;
mod seed;
mod shape;
mod transform;
mod window;

pub use batch::{Clip, VideoBatch};
pub use error::{AugmentError, Result};
pub use random::{manual_seed, randint_inclusive, uniform, RandomSource};
pub use seed::Seed;
pub use shape::{VideoShape, MIN_RANK};
pub use transform::{Compose, Identity, Transform};
pub use window::CropWindow;

/// Backend type aliases for convenience
pub mod backend {
    #[cfg(feature = "backend-ndarray")]
    pub use burn_ndarray::NdArray;
}
