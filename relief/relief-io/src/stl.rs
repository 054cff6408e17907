//! STL (Stereolithography) file format support.
//!
//! Supports both ASCII and binary STL formats.
//!
//! # Format Detection
//!
//! The loader automatically detects whether a file is ASCII or binary:
//! - ASCII files start with "solid" (after optional whitespace)
//! - Binary files have an 80-byte header followed by face count
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored, often contains file info)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (usually 0)
//! end
//! ```
//!
//! # ASCII Format
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//!   ...
//! endsolid name
//! ```
//!
//! STL repeats shared corners in every triangle that touches them. The
//! loaders weld exact duplicate positions back together, so a mesh keeps
//! its vertex count across an export/import cycle.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use hashbrown::HashMap;

use relief_types::{IndexedMesh, Triangle, Vector3, Vertex};

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Map from exact vertex coordinates to the index assigned on first sight.
type WeldMap = HashMap<[u64; 3], u32>;

/// Load a mesh from an STL file.
///
/// Automatically detects ASCII vs binary format. Triangle corners with
/// bit-identical positions are welded into shared indexed vertices;
/// coordinates that differ in the last ulp stay separate.
///
/// # Arguments
///
/// * `path` - Path to the STL file
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file content is not valid STL
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
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

    let mut reader = BufReader::new(file);

    // Read enough to determine format. Plain read can return short at
    // buffer boundaries, so fill until EOF or the prefix is complete.
    let mut header = [0u8; HEADER_SIZE + 4];
    let mut bytes_read = 0;
    while bytes_read < header.len() {
        let n = reader.read(&mut header[bytes_read..])?;
        if n == 0 {
            break;
        }
        bytes_read += n;
    }

    if bytes_read < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    // Check if ASCII (starts with "solid")
    let header_str = String::from_utf8_lossy(&header[..bytes_read.min(HEADER_SIZE)]);
    let trimmed = header_str.trim_start();

    if trimmed.starts_with("solid") && !is_binary_stl_header(&header[..bytes_read]) {
        // ASCII format - need to re-read from start
        drop(reader);
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        load_stl_ascii(reader)
    } else {
        // Binary format - continue reading
        load_stl_binary_from_header(&header[..bytes_read], reader)
    }
}

/// Check if the header suggests binary STL despite starting with "solid".
///
/// Some binary STLs happen to have "solid" in the header. Binary headers
/// are padded and often contain null bytes; ASCII files never do.
fn is_binary_stl_header(header: &[u8]) -> bool {
    if header.len() < HEADER_SIZE + 4 {
        return false;
    }

    header[..HEADER_SIZE].contains(&0)
}

/// Intern a vertex, reusing the index of a previously seen identical position.
fn intern_vertex(mesh: &mut IndexedMesh, weld: &mut WeldMap, vertex: Vertex) -> u32 {
    let p = &vertex.position;
    let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
    if let Some(&index) = weld.get(&key) {
        return index;
    }

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
    let index = mesh.vertices.len() as u32;
    mesh.vertices.push(vertex);
    weld.insert(key, index);
    index
}

/// Load a binary STL given the already-read header.
fn load_stl_binary_from_header<R: Read>(header: &[u8], mut reader: R) -> IoResult<IndexedMesh> {
    if header.len() < HEADER_SIZE + 4 {
        return Err(IoError::InvalidHeader {
            expected: HEADER_SIZE + 4,
            got: header.len(),
        });
    }

    // Face count is stored after the 80-byte header
    let face_count = u32::from_le_bytes([
        header[HEADER_SIZE],
        header[HEADER_SIZE + 1],
        header[HEADER_SIZE + 2],
        header[HEADER_SIZE + 3],
    ]);

    let mut mesh = IndexedMesh::with_capacity(face_count as usize, face_count as usize);
    let mut weld = WeldMap::with_capacity(face_count as usize);

    // Read triangles
    let mut triangle_buf = [0u8; TRIANGLE_SIZE];
    for i in 0..face_count {
        if let Err(e) = reader.read_exact(&mut triangle_buf) {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                return Err(IoError::InvalidFaceCount {
                    expected: face_count,
                    got: i,
                });
            }
            return Err(IoError::Io(e));
        }

        // Skip normal (12 bytes), read 3 vertices (36 bytes total)
        let v0 = read_vertex(&triangle_buf[12..24]);
        let v1 = read_vertex(&triangle_buf[24..36]);
        let v2 = read_vertex(&triangle_buf[36..48]);

        let i0 = intern_vertex(&mut mesh, &mut weld, v0);
        let i1 = intern_vertex(&mut mesh, &mut weld, v1);
        let i2 = intern_vertex(&mut mesh, &mut weld, v2);
        mesh.faces.push([i0, i1, i2]);
    }

    Ok(mesh)
}

/// Read a vertex from 12 bytes (3 f32s).
fn read_vertex(buf: &[u8]) -> Vertex {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Vertex::from_coords(f64::from(x), f64::from(y), f64::from(z))
}

/// Load an ASCII STL file.
fn load_stl_ascii<R: BufRead>(reader: R) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut weld = WeldMap::new();
    let mut in_facet = false;
    let mut in_loop = false;
    let mut corners: Vec<Vertex> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0].to_lowercase().as_str() {
            "facet" => {
                in_facet = true;
                // Normal follows but we ignore it (recomputed on save)
            }
            "outer" => {
                if parts.len() >= 2 && parts[1].eq_ignore_ascii_case("loop") {
                    in_loop = true;
                    corners.clear();
                }
            }
            "vertex" => {
                if in_loop && parts.len() >= 4 {
                    let x: f64 = parts[1].parse()?;
                    let y: f64 = parts[2].parse()?;
                    let z: f64 = parts[3].parse()?;
                    corners.push(Vertex::from_coords(x, y, z));
                }
            }
            "endloop" => {
                in_loop = false;
            }
            "endfacet" => {
                if in_facet && corners.len() == 3 {
                    let mut face = [0u32; 3];
                    for (slot, vertex) in face.iter_mut().zip(corners.drain(..)) {
                        *slot = intern_vertex(&mut mesh, &mut weld, vertex);
                    }
                    mesh.faces.push(face);
                }
                in_facet = false;
            }
            "endsolid" => {
                break;
            }
            _ => {
                // Ignore unknown lines
            }
        }
    }

    Ok(mesh)
}

/// Save a mesh to an STL file.
///
/// Face normals are recomputed from the vertex positions; degenerate faces
/// get a zero normal.
///
/// # Arguments
///
/// * `mesh` - The mesh to save
/// * `path` - Output file path
/// * `binary` - If true, save as binary STL; if false, save as ASCII
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, binary: bool) -> IoResult<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    if binary {
        save_stl_binary(mesh, writer)
    } else {
        save_stl_ascii(mesh, writer)
    }
}

/// Unit normal of one face, or zeros when the face is degenerate.
fn face_normal(mesh: &IndexedMesh, face: [u32; 3]) -> Vector3<f64> {
    let v0 = mesh.vertices[face[0] as usize].position;
    let v1 = mesh.vertices[face[1] as usize].position;
    let v2 = mesh.vertices[face[2] as usize].position;
    Triangle::new(v0, v1, v2)
        .normal()
        .unwrap_or_else(Vector3::zeros)
}

/// Save mesh as binary STL.
fn save_stl_binary<W: Write>(mesh: &IndexedMesh, mut writer: W) -> IoResult<()> {
    // Write 80-byte header (padded with spaces)
    let mut header = [b' '; HEADER_SIZE];
    let text = b"Binary STL generated by relief-io";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    // Write face count
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: face indices are u32, so the face count fits
    let face_count = mesh.faces.len() as u32;
    writer.write_all(&face_count.to_le_bytes())?;

    for &face in &mesh.faces {
        let normal = face_normal(mesh, face);
        write_f32_triple(&mut writer, normal.x, normal.y, normal.z)?;

        for index in face {
            let p = mesh.vertices[index as usize].position;
            write_f32_triple(&mut writer, p.x, p.y, p.z)?;
        }

        // Attribute byte count (0)
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Write three coordinates as f32 little-endian.
fn write_f32_triple<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> IoResult<()> {
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: f64 to f32 narrowing is inherent to the STL format
    {
        writer.write_all(&(x as f32).to_le_bytes())?;
        writer.write_all(&(y as f32).to_le_bytes())?;
        writer.write_all(&(z as f32).to_le_bytes())?;
    }
    Ok(())
}

/// Save mesh as ASCII STL.
fn save_stl_ascii<W: Write>(mesh: &IndexedMesh, mut writer: W) -> IoResult<()> {
    writeln!(writer, "solid relief")?;

    for &face in &mesh.faces {
        let n = face_normal(mesh, face);
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for index in face {
            let p = mesh.vertices[index as usize].position;
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid relief")?;

    Ok(())
}
