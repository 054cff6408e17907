//! Preview images for the relief pipeline.
//!
//! This crate draws a finished mesh two ways:
//!
//! - **Render** - An offscreen z-buffer render with flat Lambert shading
//!   under a single directional light, the camera fitted so the whole mesh
//!   is in frame
//! - **Plot** - A diagnostic figure in the style of a plotting library:
//!   translucent gray faces, blue vertex markers, a bounding box and a
//!   title
//!
//! Both run entirely on the CPU and return an [`image::RgbImage`] for the
//! caller to encode or save.
//!
//! # Quick Start
//!
//! ```
//! use relief_render::{plot_mesh, render_mesh, PlotParams, RenderParams};
//! use relief_types::unit_cube;
//!
//! let mesh = unit_cube();
//! let render = render_mesh(&mesh, &RenderParams::default())?;
//! let plot = plot_mesh(&mesh, &PlotParams::default())?;
//!
//! assert_eq!(render.dimensions(), (800, 600));
//! assert_eq!(plot.dimensions(), (1000, 1000));
//! # Ok::<(), relief_render::RenderError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
// Allow certain pedantic lints that are too strict for pixel-level code
#![allow(clippy::cast_possible_truncation)] // Screen coordinates are clamped to the frame before casting
#![allow(clippy::cast_sign_loss)] // Coordinates are clamped non-negative before casting
#![allow(clippy::cast_precision_loss)] // Expected when converting pixel counts to f64

mod context;
mod error;
mod font;
mod plot;
mod render;

pub use error::{RenderError, RenderResult};
pub use plot::{plot_mesh, PlotParams};
pub use render::{render_mesh, RenderParams};
