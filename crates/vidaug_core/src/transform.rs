//! Transform trait for batch augmentation.

use burn::prelude::*;

use crate::batch::VideoBatch;
use crate::error::Result;

/// A transform that can be applied to video batches.
///
/// Transforms are stateless with respect to their parameters: every call
/// samples fresh parameters for every clip from the transform's
/// [`RandomSource`](crate::RandomSource). Composition order is the caller's
/// choice.
///
/// # Implementation Notes
///
/// - Per-clip randomness goes through [`VideoBatch::map_clips`]
/// - Transforms should return `Result` instead of panicking
/// - Transforms should document their effect on tensor shapes
///
/// # Example
///
/// ```rust,ignore
/// use vidaug_core::{Result, Transform, VideoBatch};
/// use burn::prelude::*;
///
/// struct Scale(f32);
///
/// impl<B: Backend, const D: usize> Transform<B, D> for Scale {
///     fn apply(&self, batch: VideoBatch<B, D>) -> Result<VideoBatch<B, D>> {
///         VideoBatch::new(batch.into_inner().mul_scalar(self.0))
///     }
/// }
/// ```
pub trait Transform<B: Backend, const D: usize>: Send + Sync {
    /// Apply the transform to a batch.
    fn apply(&self, batch: VideoBatch<B, D>) -> Result<VideoBatch<B, D>>;

    /// Get the name of this transform for logging/debugging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Identity transform that passes data through unchanged.
#[derive(Debug, Clone, Default)]
pub struct Identity;

impl<B: Backend, const D: usize> Transform<B, D> for Identity {
    fn apply(&self, batch: VideoBatch<B, D>) -> Result<VideoBatch<B, D>> {
        Ok(batch)
    }

    fn name(&self) -> &str {
        "Identity"
    }
}

/// A composed transform that applies multiple transforms in sequence.
pub struct Compose<B: Backend, const D: usize> {
    transforms: Vec<Box<dyn Transform<B, D>>>,
}

impl<B: Backend, const D: usize> Compose<B, D> {
    /// Create a new empty composition.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Add a transform to the composition.
    pub fn push<T: Transform<B, D> + 'static>(&mut self, transform: T) {
        self.transforms.push(Box::new(transform));
    }

    /// Builder form of [`Compose::push`].
    #[must_use]
    pub fn with<T: Transform<B, D> + 'static>(mut self, transform: T) -> Self {
        self.push(transform);
        self
    }

    /// Create a composition from a vector of transforms.
    #[must_use]
    pub fn from_vec(transforms: Vec<Box<dyn Transform<B, D>>>) -> Self {
        Self { transforms }
    }

    /// Number of transforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// True when there are no transforms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Names of the transforms, in application order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transforms.iter().map(|t| t.name())
    }
}

impl<B: Backend, const D: usize> std::fmt::Debug for Compose<B, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compose")
            .field("transforms", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl<B: Backend, const D: usize> Default for Compose<B, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for Compose<B, D> {
    fn apply(&self, mut batch: VideoBatch<B, D>) -> Result<VideoBatch<B, D>> {
        for transform in &self.transforms {
            batch = transform.apply(batch)?;
            tracing::trace!(
                transform = transform.name(),
                shape = %batch.shape(),
                "applied transform"
            );
        }
        Ok(batch)
    }

    fn name(&self) -> &str {
        "Compose"
    }
}
