//! Round-trip tests across the supported mesh formats.
//!
//! The pipeline promises that exporting a mesh and re-importing it yields
//! the same vertex count, face count, and vertex positions. OBJ stores
//! coordinates with shortest round-trip precision and keeps vertex order,
//! so positions come back exactly and in place. STL narrows to f32 and the
//! loader renumbers vertices in first-seen face order, so STL positions are
//! compared as sorted sets, within 1e-5.
//!
//! To run: cargo test -p relief-io --test roundtrip

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::cast_possible_truncation
)]

use approx::assert_relative_eq;
use relief_io::{load_mesh, save_mesh, save_stl};
use relief_types::{unit_cube, IndexedMesh, MeshTopology, Vertex};
use tempfile::tempdir;

/// Build the kind of mesh the pipeline exports: a W x H grid surface with
/// two triangles per cell and a smooth height field.
fn create_grid_surface(width: usize, height: usize) -> IndexedMesh {
    let mut mesh = IndexedMesh::with_capacity(width * height, 2 * (width - 1) * (height - 1));

    for y in 0..height {
        for x in 0..width {
            let fx = x as f64;
            let fy = y as f64;
            let z = (fx * 0.4).sin() * (fy * 0.4).cos() * 2.0;
            mesh.vertices.push(Vertex::from_coords(fx, fy, z));
        }
    }

    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let i = (y * width + x) as u32;
            let w = width as u32;
            mesh.faces.push([i, i + 1, i + w + 1]);
            mesh.faces.push([i, i + w + 1, i + w]);
        }
    }

    mesh
}

/// Compare vertex positions in storage order. Only valid for formats that
/// keep vertex order (OBJ).
fn assert_positions_close(loaded: &IndexedMesh, original: &IndexedMesh, epsilon: f64) {
    assert_eq!(loaded.vertex_count(), original.vertex_count());
    for (loaded_v, original_v) in loaded.vertices.iter().zip(&original.vertices) {
        assert_relative_eq!(
            loaded_v.position.x,
            original_v.position.x,
            epsilon = epsilon
        );
        assert_relative_eq!(
            loaded_v.position.y,
            original_v.position.y,
            epsilon = epsilon
        );
        assert_relative_eq!(
            loaded_v.position.z,
            original_v.position.z,
            epsilon = epsilon
        );
    }
}

/// Vertex positions sorted by (x, y, z), for comparing meshes whose vertex
/// order differs (STL welding numbers vertices as faces introduce them).
fn sorted_positions(mesh: &IndexedMesh) -> Vec<[f64; 3]> {
    let mut positions: Vec<[f64; 3]> = mesh
        .vertices
        .iter()
        .map(|v| [v.position.x, v.position.y, v.position.z])
        .collect();
    positions.sort_by(|a, b| {
        a[0].total_cmp(&b[0])
            .then(a[1].total_cmp(&b[1]))
            .then(a[2].total_cmp(&b[2]))
    });
    positions
}

fn assert_position_sets_close(loaded: &IndexedMesh, original: &IndexedMesh, epsilon: f64) {
    let loaded_sorted = sorted_positions(loaded);
    let original_sorted = sorted_positions(original);
    assert_eq!(loaded_sorted.len(), original_sorted.len());
    for (l, o) in loaded_sorted.iter().zip(&original_sorted) {
        assert_relative_eq!(l[0], o[0], epsilon = epsilon);
        assert_relative_eq!(l[1], o[1], epsilon = epsilon);
        assert_relative_eq!(l[2], o[2], epsilon = epsilon);
    }
}

// =============================================================================
// OBJ
// =============================================================================

#[test]
fn test_obj_roundtrip_is_exact() {
    let original = create_grid_surface(12, 9);

    let dir = tempdir().unwrap();
    let path = dir.path().join("surface.obj");
    save_mesh(&original, &path).unwrap();

    let loaded = load_mesh(&path).unwrap();
    assert_eq!(loaded.face_count(), original.face_count());
    assert_eq!(loaded.faces, original.faces);
    assert_positions_close(&loaded, &original, 0.0);
}

#[test]
fn test_obj_roundtrip_cube() {
    let original = unit_cube();

    let dir = tempdir().unwrap();
    let path = dir.path().join("cube.obj");
    save_mesh(&original, &path).unwrap();

    let loaded = load_mesh(&path).unwrap();
    assert_eq!(loaded.faces, original.faces);
    assert_positions_close(&loaded, &original, 0.0);
}

// =============================================================================
// STL
// =============================================================================

#[test]
fn test_stl_binary_roundtrip_within_tolerance() {
    let original = create_grid_surface(12, 9);

    let dir = tempdir().unwrap();
    let path = dir.path().join("surface.stl");
    save_mesh(&original, &path).unwrap();

    let loaded = load_mesh(&path).unwrap();
    assert_eq!(loaded.face_count(), original.face_count());
    assert_position_sets_close(&loaded, &original, 1e-5);
}

#[test]
fn test_stl_ascii_roundtrip_within_tolerance() {
    let original = create_grid_surface(8, 8);

    let dir = tempdir().unwrap();
    let path = dir.path().join("surface_ascii.stl");
    save_stl(&original, &path, false).unwrap();

    let loaded = load_mesh(&path).unwrap();
    assert_eq!(loaded.face_count(), original.face_count());
    assert_position_sets_close(&loaded, &original, 1e-5);
}

#[test]
fn test_stl_roundtrip_cube() {
    let original = unit_cube();

    let dir = tempdir().unwrap();
    let path = dir.path().join("cube.stl");
    save_mesh(&original, &path).unwrap();

    let loaded = load_mesh(&path).unwrap();
    // All 8 corners are shared by multiple faces; welding restores them
    assert_eq!(loaded.vertex_count(), 8);
    assert_eq!(loaded.face_count(), 12);
}

// =============================================================================
// Cross-format
// =============================================================================

#[test]
fn test_obj_to_stl_chain_preserves_counts() {
    let original = create_grid_surface(6, 6);

    let dir = tempdir().unwrap();
    let obj_path = dir.path().join("chain.obj");
    let stl_path = dir.path().join("chain.stl");

    save_mesh(&original, &obj_path).unwrap();
    let from_obj = load_mesh(&obj_path).unwrap();

    save_mesh(&from_obj, &stl_path).unwrap();
    let from_stl = load_mesh(&stl_path).unwrap();

    assert_eq!(from_stl.vertex_count(), original.vertex_count());
    assert_eq!(from_stl.face_count(), original.face_count());
    assert_position_sets_close(&from_stl, &original, 1e-5);
}

#[test]
fn test_empty_mesh_roundtrips() {
    let empty = IndexedMesh::new();

    let dir = tempdir().unwrap();
    for name in ["empty.obj", "empty.stl"] {
        let path = dir.path().join(name);
        save_mesh(&empty, &path).unwrap();

        let loaded = load_mesh(&path).unwrap();
        assert_eq!(loaded.vertex_count(), 0);
        assert_eq!(loaded.face_count(), 0);
    }
}
