//! Error types for pipeline orchestration.

use std::path::PathBuf;

use thiserror::Error;

use relief_depth::DepthError;
use relief_image::ImageError;
use relief_mesh::MeshError;
use relief_render::RenderError;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors from a pipeline run, one variant per stage.
///
/// A failing stage aborts the whole run. Files written by earlier stages
/// stay on disk; nothing rolls back.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading or decoding the input photograph failed.
    #[error("failed to load input image")]
    ImageLoad {
        /// Underlying image error.
        #[source]
        source: ImageError,
    },

    /// Cutting the subject out of its backdrop failed.
    #[error("background removal failed")]
    BackgroundRemoval {
        /// Underlying image error.
        #[source]
        source: ImageError,
    },

    /// Rendering the text prompt as an image failed.
    #[error("text-to-image synthesis failed")]
    Synthesis {
        /// Underlying image error.
        #[source]
        source: ImageError,
    },

    /// The depth heuristic failed.
    #[error("depth computation failed")]
    DepthComputation {
        /// Underlying depth error.
        #[source]
        source: DepthError,
    },

    /// Triangulating the depth grid failed.
    #[error("mesh construction failed")]
    MeshConstruction {
        /// Underlying mesh error.
        #[source]
        source: MeshError,
    },

    /// The requested mesh format is not recognized.
    #[error("unsupported export format: {format}")]
    UnsupportedFormat {
        /// Format name as requested.
        format: String,
    },

    /// Writing an output artifact to disk failed.
    ///
    /// Covers the mesh file, the preview images, and the output directory
    /// itself, so the source is the failing writer's own error type.
    #[error("failed to write {}", path.display())]
    Export {
        /// Destination of the failed write.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Drawing the render or the plot failed.
    #[error("visualization failed")]
    Visualization {
        /// Underlying render error.
        #[source]
        source: RenderError,
    },
}
