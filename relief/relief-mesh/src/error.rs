//! Error types for mesh construction.

use thiserror::Error;

/// Result type for mesh construction operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur while building a mesh from a depth map.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Not enough grid points to form a triangle.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints {
        /// Minimum number of points required.
        required: usize,
        /// Actual number of points provided.
        actual: usize,
    },

    /// The triangulation produced no faces or rejected the input points.
    #[error("triangulation failed: {reason}")]
    TriangulationFailed {
        /// Description of why triangulation failed.
        reason: String,
    },
}
