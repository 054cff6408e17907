//! Error types for depth computation.

use thiserror::Error;

/// Result type for depth operations.
pub type DepthResult<T> = Result<T, DepthError>;

/// Errors that can occur while computing a depth map.
#[derive(Debug, Error)]
pub enum DepthError {
    /// Input image has zero width or height.
    #[error("input image is empty ({width}x{height})")]
    EmptyImage {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// Blur kernel size is invalid.
    #[error("invalid blur kernel size {size} (must be odd and >= 1)")]
    InvalidKernel {
        /// The rejected kernel size.
        size: u32,
    },

    /// Blur sigma is invalid.
    #[error("invalid blur sigma {sigma} (must be finite and > 0)")]
    InvalidSigma {
        /// The rejected sigma value.
        sigma: f64,
    },
}
