//! Error type shared by the engine.

use thiserror::Error;

/// Errors reported by the stepped progress engine.
#[derive(Debug, Error)]
pub enum SteppedProgressError {
    /// The topology needs at least two nodes to space them along the line.
    #[error("a stepped progress bar needs at least 2 points, got {requested}")]
    TooFewPoints {
        /// The rejected point count.
        requested: usize,
    },
    /// An index setter was called with a value outside `0..number_of_points`.
    #[error("index {index} is out of range for {number_of_points} points")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// The number of points at the time of the call.
        number_of_points: usize,
    },
    /// Tessellating a scene path failed.
    #[error("tessellation error: {0}")]
    Tessellation(#[from] lyon_tessellation::TessellationError),
    /// A backend was asked to present a scene without any layer.
    #[error("scene contains no renderable layers")]
    EmptyScene,
}

/// Result alias used across the crate.
pub type Result<T, E = SteppedProgressError> = std::result::Result<T, E>;
