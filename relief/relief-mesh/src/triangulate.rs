//! Depth-grid triangulation.
//!
//! Lifts a depth map into 3D: every pixel becomes a vertex at
//! `(x, y, depth)` and the XY grid is Delaunay-triangulated to produce the
//! face connectivity. Depth never affects connectivity, only the Z
//! coordinate, so the resulting surface is a height field over the image
//! plane.

use relief_types::{DepthMap, IndexedMesh, Vertex};
use spade::{DelaunayTriangulation, HasPosition, Point2, Triangulation};
use tracing::debug;

use crate::error::{MeshError, MeshResult};

/// Parameters for depth-grid triangulation.
#[derive(Debug, Clone, Copy)]
pub struct TriangulateParams {
    /// Multiplier applied to depth values when lifting them to Z
    /// (default: 1.0).
    pub z_scale: f64,
}

impl Default for TriangulateParams {
    fn default() -> Self {
        Self { z_scale: 1.0 }
    }
}

impl TriangulateParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the depth-to-Z multiplier.
    #[must_use]
    pub const fn with_z_scale(mut self, z_scale: f64) -> Self {
        self.z_scale = z_scale;
        self
    }
}

/// Grid point fed to the triangulation.
///
/// Carries the row-major vertex index so faces can refer back to the
/// original grid order; the triangulation itself is free to reorder its
/// internal vertex storage.
#[derive(Debug, Clone, Copy)]
struct GridPoint {
    position: Point2<f64>,
    index: u32,
}

impl HasPosition for GridPoint {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Builds an indexed mesh from a depth map.
///
/// The output has exactly `width * height` vertices in row-major order:
/// vertex `y * width + x` sits at `(x, y, depth(x, y) * z_scale)`. Faces are
/// the inner faces of a Delaunay triangulation of the XY grid and cover its
/// convex hull.
///
/// # Errors
///
/// Returns [`MeshError::InsufficientPoints`] for fewer than 3 grid points
/// and [`MeshError::TriangulationFailed`] when no triangle can be formed
/// (all points collinear, e.g. a 1-pixel-wide map).
///
/// # Example
///
/// ```
/// use relief_mesh::{triangulate_depth, TriangulateParams};
/// use relief_types::DepthMap;
///
/// let depth = DepthMap::new(4, 4);
/// let mesh = triangulate_depth(&depth, &TriangulateParams::default()).unwrap();
/// assert_eq!(mesh.vertices.len(), 16);
/// assert_eq!(mesh.faces.len(), 18);
/// ```
pub fn triangulate_depth(depth: &DepthMap, params: &TriangulateParams) -> MeshResult<IndexedMesh> {
    let (width, height) = depth.dimensions();
    let point_count = depth.len();
    if point_count < 3 {
        return Err(MeshError::InsufficientPoints {
            required: 3,
            actual: point_count,
        });
    }

    let mut vertices = Vec::with_capacity(point_count);
    let mut points = Vec::with_capacity(point_count);
    for y in 0..height {
        for x in 0..width {
            let z = depth.value(x, y) * params.z_scale;
            vertices.push(Vertex::from_coords(f64::from(x), f64::from(y), z));
            points.push(GridPoint {
                position: Point2::new(f64::from(x), f64::from(y)),
                index: y * width + x,
            });
        }
    }

    let delaunay = DelaunayTriangulation::<GridPoint>::bulk_load(points).map_err(|e| {
        MeshError::TriangulationFailed {
            reason: e.to_string(),
        }
    })?;

    if delaunay.num_inner_faces() == 0 {
        return Err(MeshError::TriangulationFailed {
            reason: "all grid points are collinear".to_string(),
        });
    }

    let mut faces = Vec::with_capacity(delaunay.num_inner_faces());
    for face in delaunay.inner_faces() {
        let [a, b, c] = face.vertices();
        faces.push([a.data().index, b.data().index, c.data().index]);
    }

    debug!(
        vertex_count = vertices.len(),
        face_count = faces.len(),
        "triangulated depth grid"
    );
    Ok(IndexedMesh::from_parts(vertices, faces))
}
