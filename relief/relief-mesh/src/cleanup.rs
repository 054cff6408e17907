//! Mesh cleanup passes.
//!
//! The triangulated height field is structurally sound by construction, but
//! downstream exporters assume more: no non-finite coordinates, no
//! zero-area faces, no duplicated faces, no orphaned vertices. The passes
//! here establish those guarantees and report what they removed.

use hashbrown::HashSet;
use relief_types::{IndexedMesh, Triangle};
use tracing::debug;

/// Configuration parameters for mesh cleanup.
///
/// # Example
///
/// ```
/// use relief_mesh::CleanupParams;
///
/// let params = CleanupParams::default().with_area_threshold(1e-6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CleanupParams {
    /// Minimum triangle area. Faces below this are removed as degenerate.
    /// Default: `1e-9`
    pub area_threshold: f64,

    /// Whether to remove unreferenced vertices after the face passes.
    /// Default: `true`
    pub remove_unreferenced: bool,
}

impl Default for CleanupParams {
    fn default() -> Self {
        Self {
            area_threshold: 1e-9,
            remove_unreferenced: true,
        }
    }
}

impl CleanupParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum triangle area threshold.
    #[must_use]
    pub const fn with_area_threshold(mut self, threshold: f64) -> Self {
        self.area_threshold = threshold;
        self
    }

    /// Sets whether unreferenced vertices are removed.
    #[must_use]
    pub const fn with_remove_unreferenced(mut self, remove: bool) -> Self {
        self.remove_unreferenced = remove;
        self
    }
}

/// Remove vertices with non-finite coordinates, along with every face that
/// references one.
///
/// Returns the number of vertices removed.
pub fn remove_nonfinite_values(mesh: &mut IndexedMesh) -> usize {
    let finite: Vec<bool> = mesh
        .vertices
        .iter()
        .map(|v| v.position.coords.iter().all(|c| c.is_finite()))
        .collect();
    if finite.iter().all(|&ok| ok) {
        return 0;
    }

    mesh.faces
        .retain(|face| face.iter().all(|&i| finite[i as usize]));
    compact_vertices(mesh, &finite)
}

/// Remove faces with repeated indices or area below `area_threshold`.
///
/// Returns the number of faces removed.
///
/// # Example
///
/// ```
/// use relief_mesh::remove_degenerate_faces;
/// use relief_types::{IndexedMesh, Vertex};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(5.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(10.0, 0.0, 0.0)); // Collinear
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(remove_degenerate_faces(&mut mesh, 1e-9), 1);
/// ```
pub fn remove_degenerate_faces(mesh: &mut IndexedMesh, area_threshold: f64) -> usize {
    let original_count = mesh.faces.len();

    mesh.faces.retain(|face| {
        let [a, b, c] = *face;
        if a == b || b == c || a == c {
            return false;
        }
        let triangle = Triangle::new(
            mesh.vertices[a as usize].position,
            mesh.vertices[b as usize].position,
            mesh.vertices[c as usize].position,
        );
        triangle.area() >= area_threshold
    });

    original_count - mesh.faces.len()
}

/// Remove duplicate faces, keeping the first occurrence.
///
/// Faces are compared as unordered vertex sets: rotations and reversed
/// windings of the same three indices count as duplicates.
///
/// Returns the number of faces removed.
pub fn remove_duplicate_faces(mesh: &mut IndexedMesh) -> usize {
    let original_count = mesh.faces.len();

    let mut seen: HashSet<[u32; 3]> = HashSet::with_capacity(original_count);
    mesh.faces.retain(|&face| seen.insert(canonical_face(face)));

    original_count - mesh.faces.len()
}

/// Remove vertices no face references and compact the vertex array.
///
/// Returns the number of vertices removed.
pub fn remove_unreferenced_vertices(mesh: &mut IndexedMesh) -> usize {
    let mut referenced = vec![false; mesh.vertices.len()];
    for face in &mesh.faces {
        for &i in face {
            referenced[i as usize] = true;
        }
    }
    if referenced.iter().all(|&used| used) {
        return 0;
    }

    compact_vertices(mesh, &referenced)
}

/// Run all cleanup passes on a mesh.
///
/// Pass order: non-finite values, degenerate faces, duplicate faces,
/// unreferenced vertices. Afterwards every face references three distinct
/// valid indices and no two faces share the same vertex set.
///
/// # Example
///
/// ```
/// use relief_mesh::{cleanup_mesh, CleanupParams};
/// use relief_types::{IndexedMesh, Vertex};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(10.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 10.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
/// mesh.faces.push([2, 0, 1]); // Rotated duplicate
///
/// let summary = cleanup_mesh(&mut mesh, &CleanupParams::default());
/// assert_eq!(summary.duplicates_removed, 1);
/// assert_eq!(mesh.faces.len(), 1);
/// ```
pub fn cleanup_mesh(mesh: &mut IndexedMesh, params: &CleanupParams) -> CleanupSummary {
    let initial_vertices = mesh.vertices.len();
    let initial_faces = mesh.faces.len();

    let nonfinite_removed = remove_nonfinite_values(mesh);
    let degenerates_removed = remove_degenerate_faces(mesh, params.area_threshold);
    let duplicates_removed = remove_duplicate_faces(mesh);
    let unreferenced_removed = if params.remove_unreferenced {
        remove_unreferenced_vertices(mesh)
    } else {
        0
    };

    let summary = CleanupSummary {
        initial_vertices,
        initial_faces,
        final_vertices: mesh.vertices.len(),
        final_faces: mesh.faces.len(),
        nonfinite_removed,
        degenerates_removed,
        duplicates_removed,
        unreferenced_removed,
    };
    if summary.had_changes() {
        debug!("{summary}");
    }
    summary
}

/// Result of a cleanup run.
#[derive(Debug, Clone, Default)]
pub struct CleanupSummary {
    /// Number of vertices before cleanup.
    pub initial_vertices: usize,
    /// Number of faces before cleanup.
    pub initial_faces: usize,
    /// Number of vertices after cleanup.
    pub final_vertices: usize,
    /// Number of faces after cleanup.
    pub final_faces: usize,
    /// Number of non-finite vertices removed.
    pub nonfinite_removed: usize,
    /// Number of degenerate faces removed.
    pub degenerates_removed: usize,
    /// Number of duplicate faces removed.
    pub duplicates_removed: usize,
    /// Number of unreferenced vertices removed.
    pub unreferenced_removed: usize,
}

impl CleanupSummary {
    /// Check if any pass removed something.
    #[must_use]
    pub fn had_changes(&self) -> bool {
        self.nonfinite_removed > 0
            || self.degenerates_removed > 0
            || self.duplicates_removed > 0
            || self.unreferenced_removed > 0
    }
}

impl std::fmt::Display for CleanupSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cleanup: {} verts ({} non-finite, {} unreferenced), {} faces ({} degenerate, {} duplicate)",
            self.final_vertices,
            self.nonfinite_removed,
            self.unreferenced_removed,
            self.final_faces,
            self.degenerates_removed,
            self.duplicates_removed
        )
    }
}

/// Rotation- and winding-invariant face key: smallest index first, then the
/// lexicographically smaller of the two windings.
fn canonical_face(face: [u32; 3]) -> [u32; 3] {
    let forward = rotate_min_first(face);
    let reversed = rotate_min_first([face[0], face[2], face[1]]);
    forward.min(reversed)
}

/// Rotate a face so the smallest vertex index comes first.
fn rotate_min_first(face: [u32; 3]) -> [u32; 3] {
    let start = if face[0] <= face[1] && face[0] <= face[2] {
        0
    } else if face[1] <= face[2] {
        1
    } else {
        2
    };

    [
        face[start],
        face[(start + 1) % 3],
        face[(start + 2) % 3],
    ]
}

/// Drop vertices whose `keep` flag is false and remap face indices.
///
/// Faces referencing dropped vertices must have been removed before this is
/// called.
fn compact_vertices(mesh: &mut IndexedMesh, keep: &[bool]) -> usize {
    let original_count = mesh.vertices.len();

    let mut remap = vec![0u32; original_count];
    let mut next = 0u32;
    for (index, kept) in keep.iter().enumerate() {
        remap[index] = next;
        if *kept {
            next += 1;
        }
    }

    let mut index = 0;
    mesh.vertices.retain(|_| {
        let kept = keep[index];
        index += 1;
        kept
    });
    for face in &mut mesh.faces {
        for slot in face {
            *slot = remap[*slot as usize];
        }
    }

    original_count - mesh.vertices.len()
}
