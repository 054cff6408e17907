//! Mesh file I/O for relief.
//!
//! This crate writes and reads the triangle meshes produced by the pipeline:
//!
//! - **OBJ** (Wavefront) - ASCII vertex/face listing, the pipeline default
//! - **STL** (Stereolithography) - Binary and ASCII
//!
//! Both formats round-trip: exporting a mesh and re-importing it yields the
//! same vertex count, face count, and vertex positions (exactly for OBJ,
//! within f32 precision for STL).
//!
//! # Example
//!
//! ```no_run
//! use relief_io::{load_obj, save_obj};
//!
//! let mesh = load_obj("model.obj").unwrap();
//! save_obj(&mesh, "copy.obj").unwrap();
//! ```
//!
//! # Format Detection
//!
//! The crate detects the file format from the extension:
//!
//! ```no_run
//! use relief_io::{load_mesh, save_mesh};
//!
//! // Format detected from .stl extension
//! let mesh = load_mesh("model.stl").unwrap();
//!
//! // Save to a different format
//! save_mesh(&mesh, "model.obj").unwrap();
//! ```
//!
//! An unrecognized extension fails with [`IoError::UnsupportedFormat`]
//! before any output file is created.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod obj;
mod stl;

pub use error::{IoError, IoResult};
pub use obj::{load_obj, save_obj};
pub use stl::{load_stl, save_stl};

use std::path::Path;

use tracing::debug;

use relief_types::IndexedMesh;

/// Supported mesh file formats.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// OBJ (Wavefront) format.
    /// ASCII only, lists vertex positions and face index triples.
    #[default]
    Obj,
    /// STL (Stereolithography) format.
    /// Supports binary and ASCII variants.
    Stl,
}

impl MeshFormat {
    /// Detect format from file extension.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to check for extension
    ///
    /// # Returns
    ///
    /// The detected format, or `None` if the extension is not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        Self::from_name(&ext)
    }

    /// Look up a format by name, as given on a command line.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    ///
    /// # Returns
    ///
    /// The named format, or `None` if the name is not recognized.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "obj" => Some(Self::Obj),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Obj => "obj",
            Self::Stl => "stl",
        }
    }
}

/// Load a mesh from a file, detecting format from extension.
///
/// # Arguments
///
/// * `path` - Path to the mesh file
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file cannot be read
/// - The file content is invalid for the detected format
///
/// # Example
///
/// ```no_run
/// use relief_io::load_mesh;
///
/// let mesh = load_mesh("model.stl").unwrap();
/// ```
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path).ok_or_else(|| IoError::UnsupportedFormat {
        format: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    let mesh = match format {
        MeshFormat::Obj => load_obj(path),
        MeshFormat::Stl => load_stl(path),
    }?;

    debug!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "loaded mesh from {}",
        path.display()
    );
    Ok(mesh)
}

/// Save a mesh to a file, detecting format from extension.
///
/// The format check runs before the file is created, so an unsupported
/// extension never leaves a partial file behind.
///
/// # Arguments
///
/// * `mesh` - The mesh to save
/// * `path` - Path for the output file
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file cannot be written
///
/// # Example
///
/// ```no_run
/// use relief_io::{load_mesh, save_mesh};
///
/// let mesh = load_mesh("input.stl").unwrap();
/// save_mesh(&mesh, "output.obj").unwrap();
/// ```
pub fn save_mesh<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path).ok_or_else(|| IoError::UnsupportedFormat {
        format: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        MeshFormat::Obj => save_obj(mesh, path),
        MeshFormat::Stl => save_stl(mesh, path, true), // Default to binary STL
    }?;

    debug!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        format = format.extension(),
        "saved mesh to {}",
        path.display()
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use relief_types::{unit_cube, MeshTopology};

    #[test]
    fn format_from_path_obj() {
        assert_eq!(MeshFormat::from_path("model.obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path("model.OBJ"), Some(MeshFormat::Obj));
        assert_eq!(
            MeshFormat::from_path("/path/to/model.obj"),
            Some(MeshFormat::Obj)
        );
    }

    #[test]
    fn format_from_path_stl() {
        assert_eq!(MeshFormat::from_path("model.stl"), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_path("model.STL"), Some(MeshFormat::Stl));
    }

    #[test]
    fn format_from_path_unknown() {
        assert_eq!(MeshFormat::from_path("model.ply"), None);
        assert_eq!(MeshFormat::from_path("model"), None);
        assert_eq!(MeshFormat::from_path(""), None);
    }

    #[test]
    fn format_from_name() {
        assert_eq!(MeshFormat::from_name("obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_name("STL"), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_name(" stl "), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_name("ply"), None);
        assert_eq!(MeshFormat::from_name(""), None);
    }

    #[test]
    fn format_extension() {
        assert_eq!(MeshFormat::Obj.extension(), "obj");
        assert_eq!(MeshFormat::Stl.extension(), "stl");
    }

    #[test]
    fn format_default_is_obj() {
        assert_eq!(MeshFormat::default(), MeshFormat::Obj);
    }

    #[test]
    fn save_unsupported_format_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.ply");

        let result = save_mesh(&unit_cube(), &path);
        assert!(
            matches!(result, Err(IoError::UnsupportedFormat { format }) if format == "ply")
        );
        assert!(!path.exists());
    }

    #[test]
    fn save_without_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model");

        let result = save_mesh(&unit_cube(), &path);
        assert!(
            matches!(result, Err(IoError::UnsupportedFormat { format }) if format == "(none)")
        );
        assert!(!path.exists());
    }

    #[test]
    fn load_unknown_extension_is_rejected() {
        // Format check comes before the existence check
        let result = load_mesh("never_created.xyz");
        assert!(matches!(result, Err(IoError::UnsupportedFormat { .. })));
    }

    #[test]
    fn save_and_load_obj_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.obj");

        let cube = unit_cube();
        save_mesh(&cube, &path).unwrap();
        let loaded = load_mesh(&path).unwrap();

        assert_eq!(loaded.vertex_count(), cube.vertex_count());
        assert_eq!(loaded.face_count(), cube.face_count());
    }

    #[test]
    fn save_and_load_stl_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.stl");

        let cube = unit_cube();
        save_mesh(&cube, &path).unwrap();
        let loaded = load_mesh(&path).unwrap();

        // Corners are welded back together on load
        assert_eq!(loaded.vertex_count(), cube.vertex_count());
        assert_eq!(loaded.face_count(), cube.face_count());
    }
}
