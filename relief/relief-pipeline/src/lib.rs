//! End-to-end pipeline from a photo or a text prompt to a 3D mesh.
//!
//! One call chains every stage of the workspace:
//!
//! 1. **Acquisition** - Load a photo and cut out its background, or
//!    synthesize an image from a prompt
//! 2. **Depth** - The blur-Laplacian depth heuristic
//! 3. **Mesh** - Grid triangulation plus cleanup
//! 4. **Export** - `model.obj` or `model.stl`
//! 5. **Previews** - `render.png` and `plot.png`
//!
//! All artifacts land in one output directory, created on demand. A
//! failing stage aborts the run with that stage's error; already-written
//! files stay on disk.
//!
//! # Quick Start
//!
//! ```no_run
//! use relief_pipeline::{run_pipeline, PipelineMode, PipelineParams};
//!
//! let params = PipelineParams::new("photo.jpg", PipelineMode::Image);
//! let summary = run_pipeline(&params)?;
//! println!("{summary}");
//! # Ok::<(), relief_pipeline::PipelineError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod run;

pub use error::{PipelineError, PipelineResult};
pub use run::{run_pipeline, PipelineMode, PipelineParams, PipelineSummary};
