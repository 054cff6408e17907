//! Mesh construction from depth maps.
//!
//! This crate turns a depth map into a cleaned triangle mesh:
//!
//! - **Triangulation** - Lift the pixel grid to 3D and Delaunay-triangulate
//!   its XY projection
//! - **Cleanup** - Remove non-finite values, degenerate faces, duplicate
//!   faces, and unreferenced vertices
//!
//! # Quick Start
//!
//! ```
//! use relief_mesh::{cleanup_mesh, triangulate_depth, CleanupParams, TriangulateParams};
//! use relief_types::DepthMap;
//!
//! let mut depth = DepthMap::new(4, 4);
//! depth.set(1, 1, 0.8);
//! depth.set(2, 2, 0.5);
//!
//! let mut mesh = triangulate_depth(&depth, &TriangulateParams::default()).unwrap();
//! let summary = cleanup_mesh(&mut mesh, &CleanupParams::default());
//!
//! assert_eq!(mesh.vertices.len(), 16);
//! assert!(!summary.had_changes());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cleanup;
mod error;
mod triangulate;

pub use cleanup::{
    cleanup_mesh, remove_degenerate_faces, remove_duplicate_faces, remove_nonfinite_values,
    remove_unreferenced_vertices, CleanupParams, CleanupSummary,
};
pub use error::{MeshError, MeshResult};
pub use triangulate::{triangulate_depth, TriangulateParams};
