//! Core data types for the relief pipeline.
//!
//! This crate provides the foundational types shared by every stage of the
//! image-to-mesh pipeline:
//!
//! - [`DepthMap`] - A per-pixel scalar field in `[0, 1]`, row-major
//! - [`Vertex`] - A point in 3D space with optional attributes
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with resolved vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Coordinate System
//!
//! Meshes produced from images live in **pixel space**: X grows right,
//! Y grows down (matching the row-major image origin at top-left), and Z
//! carries the normalized depth value. All coordinates are `f64`.
//!
//! Face winding is counter-clockwise when viewed from the +Z side.
//!
//! # Example
//!
//! ```
//! use relief_types::{DepthMap, IndexedMesh, MeshTopology, Point3, Vertex};
//!
//! let mut depth = DepthMap::new(2, 2);
//! depth.set(1, 1, 0.5);
//! assert_eq!(depth.value(1, 1), 0.5);
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod depth;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use depth::DepthMap;
pub use mesh::{unit_cube, IndexedMesh};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::{Vertex, VertexAttributes, VertexColor};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
