use crate::grid::GridSize;

/// Alias for `Result<T, GridError>`.
pub type GridResult<T> = Result<T, GridError>;

/// Errors raised by grid construction, cell access, and stepping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A grid needs at least one interior cell inside its wall border.
    #[error("grid must be at least 3x3, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// The two buffers handed to a step (or a copy) differ in size.
    #[error("grid sizes differ: {expected:?} vs {actual:?}")]
    DimensionMismatch {
        expected: GridSize,
        actual: GridSize,
    },

    /// Border cells are walls for the lifetime of the grid.
    #[error("cell ({x}, {y}) is part of the wall border")]
    ImmutableWall { x: u32, y: u32 },

    /// Walls cannot be placed inside the grid.
    #[error("cannot turn interior cell ({x}, {y}) into a wall")]
    WallState { x: u32, y: u32 },
}
