//! Complete toolkit for turning a photo or a text prompt into a 3D relief
//! mesh.
//!
//! This umbrella crate re-exports all relief-* crates, providing a unified
//! API for the whole pipeline as well as each individual stage. Every crate
//! is plain CPU Rust with no GPU or model-runtime dependencies, so the
//! toolkit works in CLI tools, servers, or batch jobs.
//!
//! # Quick Start
//!
//! ```no_run
//! use relief::prelude::*;
//!
//! // One call for the whole pipeline
//! let params = PipelineParams::new("photo.jpg", PipelineMode::Image);
//! let summary = run_pipeline(&params).unwrap();
//! println!("{summary}");
//! ```
//!
//! Stages can also be driven individually:
//!
//! ```no_run
//! use relief::prelude::*;
//! use relief::depth::{compute_depth, DepthParams};
//! use relief::image::{load_image, Segmenter, SegmenterParams};
//! use relief::mesh::{triangulate_depth, TriangulateParams};
//!
//! let photo = load_image("photo.jpg").unwrap();
//! let cutout = Segmenter::new(SegmenterParams::default())
//!     .unwrap()
//!     .remove_background(&photo)
//!     .unwrap();
//!
//! let depth = compute_depth(&cutout, &DepthParams::default()).unwrap();
//! let mesh = triangulate_depth(&depth, &TriangulateParams::default()).unwrap();
//! save_mesh(&mesh, "model.obj").unwrap();
//! ```
//!
//! # Module Organization
//!
//! ## Foundation
//! - [`types`] - Core data structures: `IndexedMesh`, `DepthMap`, `Vertex`,
//!   `Triangle`, `Aabb`
//! - [`io`] - Mesh export and import in OBJ and STL formats
//!
//! ## Stages
//! - [`image`] - Photo loading, background removal, prompt synthesis
//! - [`depth`] - The blur-Laplacian depth heuristic
//! - [`mesh`] - Depth-grid triangulation and cleanup passes
//! - [`render`] - Offscreen render and scatter/surface plot previews
//!
//! ## Orchestration
//! - [`pipeline`] - The end-to-end run, input to artifacts

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![doc(html_root_url = "https://docs.rs/relief/0.1.0")]

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `IndexedMesh`, `DepthMap`, `Vertex`, `Triangle`,
/// `Aabb`.
pub use relief_types as types;

/// Photo loading, background removal, prompt synthesis.
pub use relief_image as image;

/// The blur-Laplacian depth heuristic.
pub use relief_depth as depth;

/// Depth-grid triangulation and cleanup passes.
pub use relief_mesh as mesh;

/// Mesh export and import in OBJ and STL formats.
pub use relief_io as io;

/// Offscreen render and scatter/surface plot previews.
pub use relief_render as render;

/// The end-to-end run, input to artifacts.
pub use relief_pipeline as pipeline;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for the relief toolkit.
///
/// This module re-exports the most commonly used types and functions.
///
/// # Usage
///
/// ```
/// use relief::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use relief_types::{
        unit_cube, Aabb, DepthMap, IndexedMesh, MeshBounds, MeshTopology, Triangle, Vertex,
    };

    // I/O
    pub use relief_io::{load_mesh, save_mesh, MeshFormat};

    // Pipeline (main use case)
    pub use relief_pipeline::{
        run_pipeline, PipelineError, PipelineMode, PipelineParams, PipelineSummary,
    };
}

// =============================================================================
// Tests
// =============================================================================
