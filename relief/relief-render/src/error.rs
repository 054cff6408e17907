//! Error types for mesh visualization.

use thiserror::Error;

/// Result type for visualization operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering or plotting a mesh.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Mesh has no vertices or no faces to draw.
    #[error("mesh is empty, nothing to draw")]
    EmptyMesh,

    /// Mesh bounds are not finite, so no view can be fitted to it.
    #[error("mesh geometry is not finite, cannot fit a view")]
    NonFiniteGeometry,

    /// Parameter validation failure.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of the invalid parameter.
        reason: String,
    },
}
