//! Spatial crop windows.

/// A `(top, left, height, width)` window over the last two axes of a clip.
///
/// Windows are sampled fresh for every clip on every call and are never kept
/// by a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropWindow {
    /// First row of the window.
    pub top: usize,
    /// First column of the window.
    pub left: usize,
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl CropWindow {
    /// Create a new window.
    #[must_use]
    pub const fn new(top: usize, left: usize, height: usize, width: usize) -> Self {
        Self {
            top,
            left,
            height,
            width,
        }
    }

    /// The window covering a whole `height x width` frame.
    #[must_use]
    pub const fn full(height: usize, width: usize) -> Self {
        Self::new(0, 0, height, width)
    }

    /// One past the last row.
    #[must_use]
    pub const fn bottom(&self) -> usize {
        self.top + self.height
    }

    /// One past the last column.
    #[must_use]
    pub const fn right(&self) -> usize {
        self.left + self.width
    }

    /// True when the window covers no pixel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// True when the window lies inside a `height x width` frame.
    #[must_use]
    pub const fn fits(&self, height: usize, width: usize) -> bool {
        self.bottom() <= height && self.right() <= width
    }
}

impl std::fmt::Display for CropWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(top={}, left={}, h={}, w={})",
            self.top, self.left, self.height, self.width
        )
    }
}
