//! Depth-map heuristic for the relief pipeline.
//!
//! This crate turns an RGBA image into a [`DepthMap`](relief_types::DepthMap)
//! by measuring local intensity variation:
//!
//! 1. Grayscale via standard luma weighting, premultiplied by alpha
//! 2. Separable Gaussian blur (5×5 by default)
//! 3. Discrete 4-neighbor Laplacian, kept signed
//! 4. Min/max normalization into `[0, 1]`
//!
//! The result is **not** metric depth. The two sides of a strong edge swing
//! toward the extremes of the range while flat regions settle in between.
//! Downstream stages lift the values onto a pixel grid as Z.
//!
//! # Quick Start
//!
//! ```
//! use image::RgbaImage;
//! use relief_depth::{compute_depth, DepthParams};
//!
//! let image = RgbaImage::from_pixel(8, 8, image::Rgba([120, 40, 200, 255]));
//! let depth = compute_depth(&image, &DepthParams::default())?;
//!
//! // A constant image has no edges: the policy maps it to all zeros.
//! assert_eq!(depth.dimensions(), (8, 8));
//! assert!(depth.as_slice().iter().all(|&v| v == 0.0));
//! # Ok::<(), relief_depth::DepthError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod heuristic;

pub use error::{DepthError, DepthResult};
pub use heuristic::{compute_depth, compute_depth_gray, DepthParams};
