//! Image acquisition for the relief pipeline.
//!
//! This crate turns pipeline inputs into images ready for depth estimation:
//!
//! - **Loading** - Decode photo files into 8-bit RGB
//! - **Background removal** - Cut a photographed subject out of its backdrop
//! - **Prompt synthesis** - Render a text prompt as a deterministic image
//! - **Preview output** - Write RGBA previews as PNG
//!
//! # Quick Start
//!
//! ## Photo input
//!
//! ```no_run
//! use relief_image::{load_image, save_png, Segmenter, SegmenterParams};
//!
//! let photo = load_image("photo.jpg").unwrap();
//!
//! let segmenter = Segmenter::new(SegmenterParams::default()).unwrap();
//! let cutout = segmenter.remove_background(&photo).unwrap();
//!
//! save_png(&cutout, "processed_image.png").unwrap();
//! ```
//!
//! ## Text input
//!
//! ```
//! use relief_image::{Synthesizer, SynthesizerParams};
//!
//! let synthesizer = Synthesizer::new(SynthesizerParams::default()).unwrap();
//! let image = synthesizer.synthesize("a weathered statue").unwrap();
//! assert_eq!(image.dimensions(), (256, 256));
//! ```
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`load`] | File loading, PNG output, downscaling |
//! | [`segment`] | Flood-fill background removal |
//! | [`synth`] | Deterministic prompt-to-image synthesis |
//! | [`error`] | Error types |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
// Allow certain pedantic lints that are too strict for pixel-level code
#![allow(clippy::cast_possible_truncation)] // Pixel coordinates fit usize on supported targets
#![allow(clippy::cast_sign_loss)] // Interpolated levels are non-negative by construction
#![allow(clippy::cast_precision_loss)] // Expected when converting pixel counts to f64

pub mod error;
pub mod load;
pub mod segment;
pub mod synth;

pub use error::{ImageError, ImageResult};
pub use load::{downscale_to_fit, load_image, save_png};
pub use segment::{Segmenter, SegmenterParams};
pub use synth::{Synthesizer, SynthesizerParams};
