//! Video batch shape metadata.

use serde::{Deserialize, Serialize};

use crate::error::{AugmentError, Result};

/// Minimum rank of a batch: `[B, C, H, W]`.
pub const MIN_RANK: usize = 4;

/// Shape metadata for video batches.
///
/// Follows the convention `(B, ..., H, W)`:
/// - `B`: Batch size (number of clips), always axis 0
/// - `...`: Opaque axes, `(T, C)` for video and `(C)` for stills
/// - `H`, `W`: Spatial axes, always the last two
///
/// The channel axis is taken to be the third from last.
///
/// # Example
///
/// ```rust
/// use vidaug_core::VideoShape;
///
/// let shape = VideoShape::from_dims(&[8, 16, 3, 112, 112]).unwrap();
/// assert_eq!(shape.batch(), 8);
/// assert_eq!(shape.channels(), 3);
/// assert_eq!(shape.spatial(), (112, 112));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoShape {
    dims: Vec<usize>,
}

impl VideoShape {
    /// Create a VideoShape from a slice of dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice has fewer than four dimensions.
    pub fn from_dims(dims: &[usize]) -> Result<Self> {
        if dims.len() < MIN_RANK {
            return Err(AugmentError::DimensionError {
                expected: MIN_RANK,
                got: dims.len(),
            });
        }
        Ok(Self {
            dims: dims.to_vec(),
        })
    }

    /// All dimensions, batch axis first.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of axes.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Get the batch size.
    #[must_use]
    pub fn batch(&self) -> usize {
        self.dims[0]
    }

    /// Get the number of channels (third axis from the end).
    #[must_use]
    pub fn channels(&self) -> usize {
        self.dims[self.channel_axis()]
    }

    /// Index of the channel axis.
    #[must_use]
    pub fn channel_axis(&self) -> usize {
        self.rank() - 3
    }

    /// Get the frame height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.dims[self.rank() - 2]
    }

    /// Get the frame width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.dims[self.rank() - 1]
    }

    /// `(height, width)` of every frame.
    #[must_use]
    pub fn spatial(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// Check if this is an empty shape (any dimension is zero).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    /// Get the total number of elements.
    #[must_use]
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Create a new shape with a different batch size.
    #[must_use]
    pub fn with_batch(&self, batch: usize) -> Self {
        let mut dims = self.dims.clone();
        dims[0] = batch;
        Self { dims }
    }

    /// Create a new shape with a different frame size.
    #[must_use]
    pub fn with_spatial(&self, height: usize, width: usize) -> Self {
        let mut dims = self.dims.clone();
        let rank = dims.len();
        dims[rank - 2] = height;
        dims[rank - 1] = width;
        Self { dims }
    }

    /// Check whether two shapes agree on every axis except the batch axis.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.dims[1..] == other.dims[1..]
    }
}

impl std::fmt::Display for VideoShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.dims)
    }
}

impl<const D: usize> TryFrom<[usize; D]> for VideoShape {
    type Error = AugmentError;

    fn try_from(dims: [usize; D]) -> Result<Self> {
        Self::from_dims(&dims)
    }
}
