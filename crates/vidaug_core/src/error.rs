//! Error types for vidaug_core.

use thiserror::Error;

/// Result type alias using [`AugmentError`].
pub type Result<T> = std::result::Result<T, AugmentError>;

/// Errors raised while configuring or applying an augmentation.
///
/// Every failure is deterministic given the configuration and the input shape,
/// so none of these are worth retrying unchanged.
#[derive(Error, Debug)]
pub enum AugmentError {
    /// Malformed configuration, or a request that is geometrically
    /// incompatible with the input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid tensor shape provided.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        got: String,
    },

    /// Dimension error.
    #[error("Dimension error: expected at least {expected} dimensions, got {got}")]
    DimensionError {
        /// Minimum number of dimensions.
        expected: usize,
        /// Actual number of dimensions.
        got: usize,
    },

    /// Pipeline configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AugmentError {
    /// Shorthand for [`AugmentError::InvalidArgument`].
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Check if this is an [`AugmentError::InvalidArgument`].
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
