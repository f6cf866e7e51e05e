//! Video batch and clip tensor types.
//!
//! A [`VideoBatch`] is split into [`Clip`]s along axis 0, each clip is
//! transformed with its own random parameters, and the clips are joined back
//! into one batch in their original order.

use std::ops::Range;

use burn::prelude::*;

use crate::error::{AugmentError, Result};
use crate::shape::VideoShape;
use crate::window::CropWindow;

/// A batch of clips wrapping a rank-`D` Burn tensor `[B, ..., H, W]`.
///
/// # Type Parameters
///
/// * `B` - The Burn backend type
/// * `D` - Tensor rank, at least 4
///
/// # Example
///
/// ```rust,ignore
/// use vidaug_core::VideoBatch;
///
/// let tensor = Tensor::<NdArray, 5>::zeros([8, 16, 3, 112, 112], &device);
/// let batch = VideoBatch::new(tensor)?;
/// assert_eq!(batch.batch_size(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct VideoBatch<B: Backend, const D: usize> {
    inner: Tensor<B, D>,
    shape: VideoShape,
}

impl<B: Backend, const D: usize> VideoBatch<B, D> {
    /// Wrap a Burn tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if the tensor has fewer than four dimensions or an
    /// empty batch axis.
    pub fn new(tensor: Tensor<B, D>) -> Result<Self> {
        let shape = VideoShape::from_dims(&tensor.dims())?;
        if shape.batch() == 0 {
            return Err(AugmentError::InvalidShape {
                expected: "a batch with at least one clip".to_string(),
                got: shape.to_string(),
            });
        }
        Ok(Self {
            inner: tensor,
            shape,
        })
    }

    /// Get the shape metadata.
    #[must_use]
    pub fn shape(&self) -> &VideoShape {
        &self.shape
    }

    /// Get the number of clips.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.shape.batch()
    }

    /// `(height, width)` of every frame.
    #[must_use]
    pub fn spatial(&self) -> (usize, usize) {
        self.shape.spatial()
    }

    /// Get a reference to the underlying Burn tensor.
    #[must_use]
    pub fn inner(&self) -> &Tensor<B, D> {
        &self.inner
    }

    /// Consume self and return the underlying Burn tensor.
    #[must_use]
    pub fn into_inner(self) -> Tensor<B, D> {
        self.inner
    }

    /// Get the device the tensor is on.
    pub fn device(&self) -> B::Device {
        self.inner.device()
    }

    /// Split the batch into its clips, in order.
    #[must_use]
    pub fn into_clips(self) -> Vec<Clip<B, D>> {
        let clip_shape = self.shape.with_batch(1);
        self.inner
            .chunk(self.shape.batch(), 0)
            .into_iter()
            .map(|inner| Clip {
                inner,
                shape: clip_shape.clone(),
            })
            .collect()
    }

    /// Join clips back into a batch along axis 0, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns an error if `clips` is empty or the clips disagree on any
    /// non-batch axis.
    pub fn from_clips(clips: Vec<Clip<B, D>>) -> Result<Self> {
        let Some(first) = clips.first() else {
            return Err(AugmentError::InvalidShape {
                expected: "at least one clip".to_string(),
                got: "no clips".to_string(),
            });
        };
        let reference = first.shape.clone();
        for (i, clip) in clips.iter().enumerate() {
            if !clip.shape.is_compatible(&reference) {
                return Err(AugmentError::InvalidShape {
                    expected: reference.to_string(),
                    got: format!("{} for clip {i}", clip.shape),
                });
            }
        }

        let shape = reference.with_batch(clips.len());
        let inner = Tensor::cat(clips.into_iter().map(Clip::into_inner).collect(), 0);
        Ok(Self { inner, shape })
    }

    /// Decompose, apply `f` to each clip with its index, and recompose.
    ///
    /// The first error aborts the whole call; clips transformed before it are
    /// dropped.
    pub fn map_clips<F>(self, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, Clip<B, D>) -> Result<Clip<B, D>>,
    {
        let clips = self
            .into_clips()
            .into_iter()
            .enumerate()
            .map(|(i, clip)| f(i, clip))
            .collect::<Result<Vec<_>>>()?;
        Self::from_clips(clips)
    }
}

/// One clip of a batch, `[1, ..., H, W]`.
///
/// A clip keeps a unit batch axis so that it has the same static rank as the
/// batch it came from.
#[derive(Debug, Clone)]
pub struct Clip<B: Backend, const D: usize> {
    inner: Tensor<B, D>,
    shape: VideoShape,
}

impl<B: Backend, const D: usize> Clip<B, D> {
    /// Wrap a tensor whose leading axis has size 1.
    pub fn new(tensor: Tensor<B, D>) -> Result<Self> {
        let shape = VideoShape::from_dims(&tensor.dims())?;
        if shape.batch() != 1 {
            return Err(AugmentError::InvalidShape {
                expected: "a clip with a unit leading axis".to_string(),
                got: shape.to_string(),
            });
        }
        Ok(Self {
            inner: tensor,
            shape,
        })
    }

    /// Get the shape metadata.
    #[must_use]
    pub fn shape(&self) -> &VideoShape {
        &self.shape
    }

    /// `(height, width)` of every frame.
    #[must_use]
    pub fn spatial(&self) -> (usize, usize) {
        self.shape.spatial()
    }

    /// Get a reference to the underlying Burn tensor.
    #[must_use]
    pub fn inner(&self) -> &Tensor<B, D> {
        &self.inner
    }

    /// Consume self and return the underlying Burn tensor.
    #[must_use]
    pub fn into_inner(self) -> Tensor<B, D> {
        self.inner
    }

    /// Get the device the tensor is on.
    pub fn device(&self) -> B::Device {
        self.inner.device()
    }

    /// Mirror every frame along the width axis.
    #[must_use]
    pub fn flip_width(self) -> Self {
        let width = self.shape.width();
        let device = self.inner.device();
        let reversed: Vec<i64> = (0..width as i64).rev().collect();
        let indices = Tensor::<B, 1, Int>::from_ints(reversed.as_slice(), &device);
        Self {
            inner: self.inner.select(D - 1, indices),
            shape: self.shape,
        }
    }

    /// Extract `window` from every frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the window does not lie inside the frame.
    pub fn crop(self, window: CropWindow) -> Result<Self> {
        self.check_window(window)?;
        let ranges = self.window_ranges(window);
        Ok(Self {
            inner: self.inner.slice(ranges),
            shape: self.shape.with_spatial(window.height, window.width),
        })
    }

    /// Overwrite `window` with `value` on every frame and channel.
    ///
    /// Takes the clip by value and writes into its storage; an empty window
    /// leaves the clip as it is.
    ///
    /// # Errors
    ///
    /// Returns an error if the window does not lie inside the frame.
    pub fn fill(self, window: CropWindow, value: f32) -> Result<Self> {
        self.check_window(window)?;
        if window.is_empty() {
            return Ok(self);
        }

        let patch_shape = self.shape.with_spatial(window.height, window.width);
        let mut patch_dims = [0usize; D];
        patch_dims.copy_from_slice(patch_shape.dims());
        let patch = Tensor::<B, D>::full(patch_dims, value, &self.inner.device());

        let ranges = self.window_ranges(window);
        Ok(Self {
            inner: self.inner.slice_assign(ranges, patch),
            shape: self.shape,
        })
    }

    fn check_window(&self, window: CropWindow) -> Result<()> {
        let (height, width) = self.spatial();
        if window.fits(height, width) {
            Ok(())
        } else {
            Err(AugmentError::invalid_argument(format!(
                "window {window} does not fit in a {height}x{width} frame"
            )))
        }
    }

    fn window_ranges(&self, window: CropWindow) -> [Range<usize>; D] {
        let mut ranges = self.inner.dims().map(|d| 0..d);
        ranges[D - 2] = window.top..window.bottom();
        ranges[D - 1] = window.left..window.right();
        ranges
    }
}
