//! Image file loading and preview output.
//!
//! # Example
//!
//! ```no_run
//! use relief_image::{load_image, save_png};
//!
//! let image = load_image("photo.jpg").unwrap();
//! let rgba = image::DynamicImage::ImageRgb8(image).to_rgba8();
//! save_png(&rgba, "copy.png").unwrap();
//! ```

use std::path::Path;

use image::imageops::FilterType;
use image::{ImageFormat, RgbImage, RgbaImage};
use tracing::debug;

use crate::error::{ImageError, ImageResult};

/// Loads an image file and converts it to 8-bit RGB.
///
/// A missing file and an unreadable file are reported as distinct errors.
///
/// # Errors
///
/// Returns [`ImageError::FileNotFound`] if `path` does not exist, and
/// [`ImageError::DecodeFailed`] if the content cannot be decoded.
///
/// # Example
///
/// ```no_run
/// use relief_image::load_image;
///
/// let image = load_image("photo.jpg").unwrap();
/// println!("{}x{}", image.width(), image.height());
/// ```
pub fn load_image<P: AsRef<Path>>(path: P) -> ImageResult<RgbImage> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ImageError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let image = image::open(path).map_err(|source| ImageError::DecodeFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image.to_rgb8();

    debug!(
        width = image.width(),
        height = image.height(),
        "loaded image from {}",
        path.display()
    );
    Ok(image)
}

/// Writes an RGBA image as a PNG file.
///
/// The PNG encoder is forced regardless of the extension so that preview
/// artifacts are always alpha-capable.
///
/// # Errors
///
/// Returns [`ImageError::SaveFailed`] if encoding or writing fails.
pub fn save_png<P: AsRef<Path>>(image: &RgbaImage, path: P) -> ImageResult<()> {
    let path = path.as_ref();
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ImageError::SaveFailed {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("saved PNG to {}", path.display());
    Ok(())
}

/// Downscales an image so that neither dimension exceeds `max_size`,
/// preserving aspect ratio. Images that already fit are returned unchanged.
///
/// Uses bilinear filtering.
#[must_use]
pub fn downscale_to_fit(image: &RgbImage, max_size: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let largest = width.max(height);
    if largest <= max_size || largest == 0 {
        return image.clone();
    }

    let scale = f64::from(max_size) / f64::from(largest);
    let new_width = ((f64::from(width) * scale).round() as u32).max(1);
    let new_height = ((f64::from(height) * scale).round() as u32).max(1);

    debug!(
        from_width = width,
        from_height = height,
        to_width = new_width,
        to_height = new_height,
        "downscaled image"
    );
    image::imageops::resize(image, new_width, new_height, FilterType::Triangle)
}
