#![warn(missing_docs)]

//! File formats for bezmesh.
//!
//! - `.bez` patch files ([`read_bez`], [`parse_bez`])
//! - Wavefront OBJ meshes ([`read_obj`], [`write_obj`])

pub mod bez;
pub mod error;
pub mod obj;

pub use bez::{parse_bez, read_bez};
pub use error::{ParseError, Result};
pub use obj::{parse_obj, read_obj, write_obj, write_obj_to, ObjMesh};

use std::path::Path;

/// Kind of input file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Bezier patch file (`.bez`).
    Bez,
    /// Polygon mesh (`.obj`).
    Obj,
}

impl InputFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("bez") => Ok(Self::Bez),
            Some("obj") => Ok(Self::Obj),
            _ => Err(ParseError::UnsupportedFormat(path.display().to_string())),
        }
    }
}
