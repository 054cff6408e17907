//! Background removal.
//!
//! Separates a photographed subject from its backdrop by flood-filling
//! background-colored pixels inward from the image border. The result is an
//! RGBA image whose background pixels have alpha 0; subject pixels keep their
//! original color with alpha 255.
//!
//! The fill only spreads through connected runs of background-colored pixels,
//! so subject regions that happen to match the backdrop color are preserved
//! as long as the subject outline seals them off from the border.
//!
//! # Example
//!
//! ```
//! use image::{Rgb, RgbImage};
//! use relief_image::{Segmenter, SegmenterParams};
//!
//! // White backdrop with a dark 2x2 subject in the middle.
//! let mut photo = RgbImage::from_pixel(6, 6, Rgb([250, 250, 250]));
//! for y in 2..4 {
//!     for x in 2..4 {
//!         photo.put_pixel(x, y, Rgb([40, 20, 10]));
//!     }
//! }
//!
//! let segmenter = Segmenter::new(SegmenterParams::default()).unwrap();
//! let cutout = segmenter.remove_background(&photo).unwrap();
//! assert_eq!(cutout.get_pixel(0, 0).0[3], 0);
//! assert_eq!(cutout.get_pixel(2, 2).0[3], 255);
//! ```

use std::collections::VecDeque;

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tracing::debug;

use crate::error::{ImageError, ImageResult};

/// Parameters for background removal.
#[derive(Debug, Clone, Copy)]
pub struct SegmenterParams {
    /// Maximum Euclidean RGB distance from the sampled backdrop color for a
    /// pixel to count as background (default: 30.0).
    pub color_tolerance: f64,

    /// Thickness in pixels of the border ring sampled to estimate the
    /// backdrop color (default: 2).
    pub border_margin: u32,
}

impl Default for SegmenterParams {
    fn default() -> Self {
        Self {
            color_tolerance: 30.0,
            border_margin: 2,
        }
    }
}

impl SegmenterParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the color tolerance.
    #[must_use]
    pub const fn with_color_tolerance(mut self, tolerance: f64) -> Self {
        self.color_tolerance = tolerance;
        self
    }

    /// Sets the border sampling margin.
    #[must_use]
    pub const fn with_border_margin(mut self, margin: u32) -> Self {
        self.border_margin = margin;
        self
    }

    fn validate(&self) -> ImageResult<()> {
        if !self.color_tolerance.is_finite() || self.color_tolerance < 0.0 {
            return Err(ImageError::InvalidParameter {
                reason: format!(
                    "color tolerance must be finite and non-negative, got {}",
                    self.color_tolerance
                ),
            });
        }
        if self.border_margin == 0 {
            return Err(ImageError::InvalidParameter {
                reason: "border margin must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Background removal session.
///
/// Create once with [`Segmenter::new`] and reuse across images; construction
/// validates the parameters so each call site only handles image errors.
#[derive(Debug, Clone)]
pub struct Segmenter {
    params: SegmenterParams,
}

impl Segmenter {
    /// Creates a segmenter session.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidParameter`] if the tolerance is negative
    /// or not finite, or the border margin is zero.
    pub fn new(params: SegmenterParams) -> ImageResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Removes the background from an image.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::EmptyImage`] if the image has zero pixels.
    pub fn remove_background(&self, image: &RgbImage) -> ImageResult<RgbaImage> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyImage { width, height });
        }

        let backdrop = self.sample_backdrop(image);
        let background = self.flood_background(image, backdrop);

        let mut out = RgbaImage::new(width, height);
        let mut cleared = 0usize;
        for y in 0..height {
            for x in 0..width {
                let Rgb([r, g, b]) = *image.get_pixel(x, y);
                let alpha = if background[pixel_index(x, y, width)] {
                    cleared += 1;
                    0
                } else {
                    255
                };
                out.put_pixel(x, y, Rgba([r, g, b, alpha]));
            }
        }

        let fraction = cleared as f64 / (f64::from(width) * f64::from(height));
        debug!(
            width,
            height,
            background_fraction = format!("{fraction:.3}"),
            "removed background"
        );
        Ok(out)
    }

    /// Mean color of the border ring, the backdrop estimate.
    fn sample_backdrop(&self, image: &RgbImage) -> [f64; 3] {
        let (width, height) = image.dimensions();
        let margin = self.params.border_margin.min(width).min(height);

        let mut sum = [0u64; 3];
        let mut count = 0u64;
        for y in 0..height {
            for x in 0..width {
                let on_ring = x < margin
                    || y < margin
                    || x >= width - margin
                    || y >= height - margin;
                if on_ring {
                    let Rgb([r, g, b]) = *image.get_pixel(x, y);
                    sum[0] += u64::from(r);
                    sum[1] += u64::from(g);
                    sum[2] += u64::from(b);
                    count += 1;
                }
            }
        }

        [
            sum[0] as f64 / count as f64,
            sum[1] as f64 / count as f64,
            sum[2] as f64 / count as f64,
        ]
    }

    /// Flood fill from the border: marks every pixel reachable from a border
    /// pixel through backdrop-colored neighbors.
    fn flood_background(&self, image: &RgbImage, backdrop: [f64; 3]) -> Vec<bool> {
        let (width, height) = image.dimensions();
        let tolerance = self.params.color_tolerance;

        let is_backdrop = |x: u32, y: u32| -> bool {
            let Rgb([r, g, b]) = *image.get_pixel(x, y);
            let dr = f64::from(r) - backdrop[0];
            let dg = f64::from(g) - backdrop[1];
            let db = f64::from(b) - backdrop[2];
            (dr * dr + dg * dg + db * db).sqrt() <= tolerance
        };

        let mut visited = vec![false; (width as usize) * (height as usize)];
        let mut queue = VecDeque::new();

        let seed = |x: u32, y: u32, visited: &mut Vec<bool>, queue: &mut VecDeque<(u32, u32)>| {
            let idx = pixel_index(x, y, width);
            if !visited[idx] && is_backdrop(x, y) {
                visited[idx] = true;
                queue.push_back((x, y));
            }
        };

        for x in 0..width {
            seed(x, 0, &mut visited, &mut queue);
            seed(x, height - 1, &mut visited, &mut queue);
        }
        for y in 0..height {
            seed(0, y, &mut visited, &mut queue);
            seed(width - 1, y, &mut visited, &mut queue);
        }

        while let Some((x, y)) = queue.pop_front() {
            let neighbors = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbors {
                if nx < width && ny < height {
                    let idx = pixel_index(nx, ny, width);
                    if !visited[idx] && is_backdrop(nx, ny) {
                        visited[idx] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }

        visited
    }
}

const fn pixel_index(x: u32, y: u32, width: u32) -> usize {
    (y as usize) * (width as usize) + (x as usize)
}
