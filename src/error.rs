//! Error types for grid construction.
//!
//! Only building a [`Grid`](crate::grid::Grid) can fail; every other
//! operation clamps or ignores bad input.

/// Errors raised when the requested grid geometry cannot hold a single cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A cell edge of zero pixels would divide by zero.
    #[error("cell size must be at least one pixel")]
    ZeroCellSize,

    /// The window is smaller than one cell along at least one axis.
    #[error("a {width}x{height} px area holds no {cell_size} px cells")]
    DegenerateDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Requested cell edge in pixels.
        cell_size: u32,
    },
}
