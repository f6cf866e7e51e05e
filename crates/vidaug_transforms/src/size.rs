//! Output size and padding arguments.
//!
//! Both accept the loose forms used in configuration files (a scalar or a
//! short list) and normalize them once, at construction, into a fixed tuple.

use serde::{Deserialize, Serialize};

use vidaug_core::{AugmentError, Result};

/// A size argument as written in a config: `112`, `[112]` or `[112, 160]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeArg {
    /// Same value for height and width.
    Scalar(usize),
    /// One value (broadcast) or `[height, width]`.
    Seq(Vec<usize>),
}

impl Default for SizeArg {
    fn default() -> Self {
        Self::Scalar(112)
    }
}

/// A `(height, width)` pair of positive integers.
///
/// # Example
///
/// ```rust
/// use vidaug_transforms::SizeSpec;
///
/// assert_eq!(SizeSpec::from_slice(&[4]).unwrap(), SizeSpec::new(4, 4).unwrap());
/// assert_eq!(SizeSpec::from_slice(&[4, 6]).unwrap().as_tuple(), (4, 6));
/// assert!(SizeSpec::from_slice(&[4, 6, 8]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeSpec {
    height: usize,
    width: usize,
}

impl SizeSpec {
    /// Create a size, rejecting zero extents.
    pub fn new(height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(AugmentError::invalid_argument(format!(
                "size must be positive, got ({height}, {width})"
            )));
        }
        Ok(Self { height, width })
    }

    /// A square size.
    pub fn square(size: usize) -> Result<Self> {
        Self::new(size, size)
    }

    /// Normalize a one- or two-element sequence.
    pub fn from_slice(values: &[usize]) -> Result<Self> {
        match *values {
            [size] => Self::square(size),
            [height, width] => Self::new(height, width),
            _ => Err(AugmentError::invalid_argument(format!(
                "size must be a scalar or a sequence of 1 or 2 values, got {values:?}"
            ))),
        }
    }

    /// Target height.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Target width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`.
    #[must_use]
    pub const fn as_tuple(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

impl TryFrom<usize> for SizeSpec {
    type Error = AugmentError;

    fn try_from(size: usize) -> Result<Self> {
        Self::square(size)
    }
}

impl TryFrom<&[usize]> for SizeSpec {
    type Error = AugmentError;

    fn try_from(values: &[usize]) -> Result<Self> {
        Self::from_slice(values)
    }
}

impl TryFrom<&SizeArg> for SizeSpec {
    type Error = AugmentError;

    fn try_from(arg: &SizeArg) -> Result<Self> {
        match arg {
            SizeArg::Scalar(size) => Self::square(*size),
            SizeArg::Seq(values) => Self::from_slice(values),
        }
    }
}

impl From<SizeSpec> for SizeArg {
    fn from(size: SizeSpec) -> Self {
        Self::Seq(vec![size.height, size.width])
    }
}

impl std::fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// A padding argument as written in a config: `2`, `[2]`, `[2, 1]` or
/// `[2, 1, 4, 3]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaddingArg {
    /// Same padding on every edge.
    Scalar(usize),
    /// One, two or four values.
    Seq(Vec<usize>),
}

impl Default for PaddingArg {
    fn default() -> Self {
        Self::Scalar(0)
    }
}

/// Padding of the two spatial axes, `(left, right, top, bottom)`.
///
/// - one value pads every edge by that amount
/// - two values `[a, b]` pad left/right by `a` and top/bottom by `b`
/// - four values are taken positionally, in the field order above, and
///   handed to the pad call as they are
///
/// # Example
///
/// ```rust
/// use vidaug_transforms::PaddingSpec;
///
/// let padding = PaddingSpec::from_slice(&[2, 1]).unwrap();
/// assert_eq!(padding.as_tuple(), (2, 2, 1, 1));
///
/// let padding = PaddingSpec::from_slice(&[2, 1, 4, 3]).unwrap();
/// assert_eq!((padding.left(), padding.top()), (2, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PaddingSpec {
    left: usize,
    right: usize,
    top: usize,
    bottom: usize,
}

impl PaddingSpec {
    /// Create a padding from its four edges.
    #[must_use]
    pub const fn new(left: usize, right: usize, top: usize, bottom: usize) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The same padding on every edge.
    #[must_use]
    pub const fn uniform(pad: usize) -> Self {
        Self::new(pad, pad, pad, pad)
    }

    /// Normalize a one-, two- or four-element sequence.
    pub fn from_slice(values: &[usize]) -> Result<Self> {
        match *values {
            [pad] => Ok(Self::uniform(pad)),
            [horizontal, vertical] => Ok(Self::new(horizontal, horizontal, vertical, vertical)),
            [a, b, c, d] => Ok(Self::new(a, b, c, d)),
            _ => Err(AugmentError::invalid_argument(format!(
                "padding must be a scalar or a sequence of 1, 2 or 4 values, got {values:?}"
            ))),
        }
    }

    /// Columns added before the first column.
    #[must_use]
    pub const fn left(&self) -> usize {
        self.left
    }

    /// Columns added after the last column.
    #[must_use]
    pub const fn right(&self) -> usize {
        self.right
    }

    /// Rows added above the first row.
    #[must_use]
    pub const fn top(&self) -> usize {
        self.top
    }

    /// Rows added below the last row.
    #[must_use]
    pub const fn bottom(&self) -> usize {
        self.bottom
    }

    /// `(left, right, top, bottom)`, the argument order of `Tensor::pad`.
    #[must_use]
    pub const fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (self.left, self.right, self.top, self.bottom)
    }

    /// True when no edge is padded.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.left == 0 && self.right == 0 && self.top == 0 && self.bottom == 0
    }

    /// Frame size after padding a `height x width` frame.
    #[must_use]
    pub const fn padded(&self, height: usize, width: usize) -> (usize, usize) {
        (
            height + self.top + self.bottom,
            width + self.left + self.right,
        )
    }
}

impl TryFrom<&[usize]> for PaddingSpec {
    type Error = AugmentError;

    fn try_from(values: &[usize]) -> Result<Self> {
        Self::from_slice(values)
    }
}

impl TryFrom<&PaddingArg> for PaddingSpec {
    type Error = AugmentError;

    fn try_from(arg: &PaddingArg) -> Result<Self> {
        match arg {
            PaddingArg::Scalar(pad) => Ok(Self::uniform(*pad)),
            PaddingArg::Seq(values) => Self::from_slice(values),
        }
    }
}

impl From<usize> for PaddingSpec {
    fn from(pad: usize) -> Self {
        Self::uniform(pad)
    }
}

impl From<PaddingSpec> for PaddingArg {
    fn from(padding: PaddingSpec) -> Self {
        Self::Seq(vec![padding.left, padding.right, padding.top, padding.bottom])
    }
}
