//! OBJ (Wavefront) file format support.
//!
//! ASCII format listing vertex positions and face index triples:
//!
//! ```text
//! # comment
//! v x y z
//! v x y z
//! ...
//! f 1 2 3
//! f 1 3 4
//! ...
//! ```
//!
//! Face indices are 1-based. The parser accepts `v/vt/vn` style index
//! references (texture and normal components are ignored), negative indices
//! counting back from the last vertex, and polygon faces with more than
//! three corners, which are fan-triangulated. Normals, texture coordinates,
//! groups and material statements are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use relief_types::{IndexedMesh, Vertex};

use crate::error::{IoError, IoResult};

/// Save a mesh to an OBJ file.
///
/// Coordinates are written with shortest round-trip precision, so re-importing
/// the file reproduces the vertex positions exactly.
///
/// # Arguments
///
/// * `mesh` - The mesh to save
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_obj<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# Wavefront OBJ generated by relief-io")?;
    writeln!(
        writer,
        "# {} vertices, {} faces",
        mesh.vertices.len(),
        mesh.faces.len()
    )?;

    for vertex in &mesh.vertices {
        let p = &vertex.position;
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    // OBJ face indices are 1-based
    for &[i0, i1, i2] in &mesh.faces {
        writeln!(writer, "f {} {} {}", i0 + 1, i1 + 1, i2 + 1)?;
    }

    Ok(())
}

/// Load a mesh from an OBJ file.
///
/// # Arguments
///
/// * `path` - Path to the OBJ file
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - A vertex or face line is malformed
/// - A face references a vertex that is not defined
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;

    parse_obj(BufReader::new(file))
}

/// Parse OBJ content from a buffered reader.
fn parse_obj<R: BufRead>(reader: R) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "v" => {
                if parts.len() < 4 {
                    return Err(IoError::invalid_content(format!(
                        "vertex line has {} coordinates, need 3",
                        parts.len() - 1
                    )));
                }
                let x: f64 = parts[1].parse()?;
                let y: f64 = parts[2].parse()?;
                let z: f64 = parts[3].parse()?;
                mesh.vertices.push(Vertex::from_coords(x, y, z));
            }
            "f" => {
                let corners = parse_face_indices(&parts[1..], mesh.vertices.len())?;
                // Fan-triangulate polygons with more than three corners
                for i in 1..corners.len() - 1 {
                    mesh.faces.push([corners[0], corners[i], corners[i + 1]]);
                }
            }
            _ => {
                // Ignore normals, texture coordinates, groups, materials
            }
        }
    }

    Ok(mesh)
}

/// Resolve the index references of one `f` line to zero-based vertex indices.
///
/// Each reference may carry `/texture/normal` components, which are ignored.
/// Negative indices count back from the most recently defined vertex.
fn parse_face_indices(refs: &[&str], vertex_count: usize) -> IoResult<Vec<u32>> {
    if refs.len() < 3 {
        return Err(IoError::invalid_content(format!(
            "face has {} vertices, need at least 3",
            refs.len()
        )));
    }

    #[allow(clippy::cast_possible_wrap)]
    // Vertex counts are bounded by u32 mesh indices, far below i64::MAX
    let count = vertex_count as i64;

    let mut corners = Vec::with_capacity(refs.len());
    for r in refs {
        let index_part = r.split('/').next().unwrap_or(r);
        let index: i64 = index_part.parse()?;

        let resolved = if index > 0 {
            index - 1
        } else if index < 0 {
            count + index
        } else {
            return Err(IoError::invalid_content("face index 0 is not valid in OBJ"));
        };

        if resolved < 0 || resolved >= count {
            return Err(IoError::invalid_content(format!(
                "face references vertex {index}, but only {vertex_count} vertices are defined"
            )));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        // Range checked against the vertex count just above
        corners.push(resolved as u32);
    }

    Ok(corners)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn create_test_mesh() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.25));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.5));
        mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 0.75));
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([1, 3, 2]);
        mesh
    }

    #[test]
    fn roundtrip_preserves_geometry() {
        let original = create_test_mesh();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.obj");
        save_obj(&original, &path).unwrap();

        let loaded = load_obj(&path).unwrap();
        assert_eq!(loaded.vertices.len(), original.vertices.len());
        assert_eq!(loaded.faces, original.faces);
        for (loaded_v, original_v) in loaded.vertices.iter().zip(&original.vertices) {
            assert_eq!(loaded_v.position, original_v.position);
        }
    }

    #[test]
    fn roundtrip_preserves_fractional_coordinates() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.1, 0.2, 0.3));
        mesh.vertices.push(Vertex::from_coords(1.0 / 3.0, 2.0 / 7.0, 1e-9));
        mesh.vertices.push(Vertex::from_coords(-5.5, 1234.567, 0.0));
        mesh.faces.push([0, 1, 2]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fractional.obj");
        save_obj(&mesh, &path).unwrap();

        let loaded = load_obj(&path).unwrap();
        for (loaded_v, original_v) in loaded.vertices.iter().zip(&mesh.vertices) {
            assert_eq!(loaded_v.position, original_v.position);
        }
    }

    #[test]
    fn parses_basic_content() {
        let content = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse_obj(BufReader::new(&content[..])).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn quad_faces_are_fan_triangulated() {
        let content = b"v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = parse_obj(BufReader::new(&content[..])).unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn slash_references_use_position_index() {
        let content = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/1 3/3/1\n";
        let mesh = parse_obj(BufReader::new(&content[..])).unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn negative_indices_count_from_end() {
        let content = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = parse_obj(BufReader::new(&content[..])).unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn unknown_statements_are_ignored() {
        let content = b"# header\no model\nv 0 0 0\nvn 0 0 1\nvt 0.5 0.5\nv 1 0 0\ns off\nusemtl gray\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse_obj(BufReader::new(&content[..])).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.faces.len(), 1);
    }

    #[test]
    fn face_index_out_of_range_is_rejected() {
        let content = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n";
        let result = parse_obj(BufReader::new(&content[..]));
        assert!(matches!(result, Err(IoError::InvalidContent { .. })));
    }

    #[test]
    fn face_index_zero_is_rejected() {
        let content = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        let result = parse_obj(BufReader::new(&content[..]));
        assert!(matches!(result, Err(IoError::InvalidContent { .. })));
    }

    #[test]
    fn face_with_two_corners_is_rejected() {
        let content = b"v 0 0 0\nv 1 0 0\nf 1 2\n";
        let result = parse_obj(BufReader::new(&content[..]));
        assert!(matches!(result, Err(IoError::InvalidContent { .. })));
    }

    #[test]
    fn short_vertex_line_is_rejected() {
        let content = b"v 0 0\n";
        let result = parse_obj(BufReader::new(&content[..]));
        assert!(matches!(result, Err(IoError::InvalidContent { .. })));
    }

    #[test]
    fn malformed_coordinate_is_rejected() {
        let content = b"v 0 zero 0\n";
        let result = parse_obj(BufReader::new(&content[..]));
        assert!(matches!(result, Err(IoError::ParseFloat(_))));
    }

    #[test]
    fn load_nonexistent_file() {
        let result = load_obj("nonexistent_file_12345.obj");
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }
}
