//! Error types for image acquisition operations.

use std::fmt;
use std::path::PathBuf;

/// Result type for image acquisition operations.
pub type ImageResult<T> = Result<T, ImageError>;

/// Errors that can occur while acquiring or writing images.
#[derive(Debug)]
pub enum ImageError {
    /// Input file does not exist.
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file exists but its content could not be decoded as an image.
    DecodeFailed {
        /// Path of the file that failed to decode.
        path: PathBuf,
        /// Underlying decoder error.
        source: image::ImageError,
    },

    /// Encoding or writing an image to disk failed.
    SaveFailed {
        /// Destination path of the failed write.
        path: PathBuf,
        /// Underlying encoder error.
        source: image::ImageError,
    },

    /// Image has zero pixels.
    EmptyImage {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// I/O error during file operations.
    IoError(std::io::Error),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => {
                write!(f, "image file not found: {}", path.display())
            }
            Self::DecodeFailed { path, source } => {
                write!(f, "failed to decode {}: {source}", path.display())
            }
            Self::SaveFailed { path, source } => {
                write!(f, "failed to save {}: {source}", path.display())
            }
            Self::EmptyImage { width, height } => {
                write!(f, "image is empty ({width}x{height})")
            }
            Self::InvalidParameter { reason } => write!(f, "invalid parameter: {reason}"),
            Self::IoError(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DecodeFailed { source, .. } | Self::SaveFailed { source, .. } => Some(source),
            Self::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImageError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error() {
        let err = ImageError::FileNotFound {
            path: PathBuf::from("missing.png"),
        };
        assert_eq!(format!("{err}"), "image file not found: missing.png");
    }

    #[test]
    fn test_empty_image_error() {
        let err = ImageError::EmptyImage {
            width: 0,
            height: 4,
        };
        assert_eq!(format!("{err}"), "image is empty (0x4)");
    }

    #[test]
    fn test_invalid_parameter_error() {
        let err = ImageError::InvalidParameter {
            reason: "tolerance must be non-negative".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "invalid parameter: tolerance must be non-negative"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let img_err: ImageError = io_err.into();
        assert!(matches!(img_err, ImageError::IoError(_)));
    }

    #[test]
    fn test_decode_failed_has_source() {
        let inner = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated",
        ));
        let err = ImageError::DecodeFailed {
            path: PathBuf::from("bad.png"),
            source: inner,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
