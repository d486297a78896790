#![warn(missing_docs)]

//! Bicubic Bezier patch evaluation and tessellation.
//!
//! This crate ties the bezmesh crates together: evaluate a patch with
//! [`evaluate`], triangulate it with [`tessellate_uniform`] or
//! [`tessellate_adaptive`], and use [`PatchSet`] to load a `.bez` file and
//! tessellate every patch in one call.
//!
//! # Example
//!
//! ```
//! use bezmesh::{PatchSet, Subdivision, SubdivisionMethod};
//!
//! let text = "1
//! 0 0 0 1 0 0 2 0 0 3 0 0
//! 0 1 0 1 1 0 2 1 0 3 1 0
//! 0 2 0 1 2 0 2 2 0 3 2 0
//! 0 3 0 1 3 0 2 3 0 3 3 0
//! ";
//! let set = PatchSet::parse(text).unwrap();
//! let meshes = set.tessellate(&Subdivision::new(SubdivisionMethod::Uniform, 0.5)).unwrap();
//! assert_eq!(meshes.num_triangles(), 8);
//! ```

use std::path::Path;

pub use bezmesh_io;
pub use bezmesh_math;
pub use bezmesh_patch;
pub use bezmesh_tessellate;

pub use bezmesh_io::{InputFormat, ObjMesh, ParseError};
pub use bezmesh_math::{Point2, Point3, Vec3};
pub use bezmesh_patch::{evaluate, BezierCurve, BezierPatch, SurfaceSample};
pub use bezmesh_tessellate::{
    aggregate_triangles, tessellate_adaptive, tessellate_uniform, AdaptiveSettings, Mesh,
    MeshBounds, Subdivision, SubdivisionMethod, TessellateError, Triangle, TriangleMesh,
    UniformSettings,
};

use log::info;
use thiserror::Error;

/// Errors from loading or tessellating patches.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Tessellation settings were rejected.
    #[error(transparent)]
    Tessellate(#[from] TessellateError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An ordered collection of patches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchSet {
    patches: Vec<BezierPatch>,
}

impl PatchSet {
    /// Wrap a list of patches.
    pub fn new(patches: Vec<BezierPatch>) -> Self {
        Self { patches }
    }

    /// Load patches from a `.bez` file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(bezmesh_io::read_bez(path)?))
    }

    /// Parse patches from `.bez` text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self::new(bezmesh_io::parse_bez(text)?))
    }

    /// The patches in file order.
    pub fn patches(&self) -> &[BezierPatch] {
        &self.patches
    }

    /// Number of patches.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// `true` when there are no patches.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Tessellate every patch, in parallel.
    pub fn tessellate(&self, subdivision: &Subdivision) -> Result<TessellatedSet> {
        let meshes = bezmesh_tessellate::tessellate_patches(&self.patches, subdivision)?;
        let set = TessellatedSet { meshes };
        info!(
            "tessellated {} patches ({}): {} triangles",
            self.len(),
            subdivision.method(),
            set.num_triangles()
        );
        Ok(set)
    }
}

/// Per-patch meshes produced by [`PatchSet::tessellate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TessellatedSet {
    /// One mesh per patch, in patch order.
    pub meshes: Vec<Mesh>,
}

impl TessellatedSet {
    /// Total triangle count.
    pub fn num_triangles(&self) -> usize {
        self.meshes.iter().map(Mesh::num_triangles).sum()
    }

    /// Total sample count.
    pub fn num_samples(&self) -> usize {
        self.meshes.iter().map(Mesh::num_samples).sum()
    }

    /// Total number of samples without a defined normal.
    pub fn degenerate_sample_count(&self) -> usize {
        self.meshes.iter().map(Mesh::degenerate_sample_count).sum()
    }

    /// Every triangle, in patch order.
    pub fn triangles(&self) -> Vec<Triangle> {
        aggregate_triangles(&self.meshes)
    }

    /// Bounds over every sample.
    pub fn bounds(&self) -> Option<MeshBounds> {
        MeshBounds::from_meshes(&self.meshes)
    }

    /// Shared-vertex mesh for rendering.
    pub fn to_triangle_mesh(&self) -> TriangleMesh {
        TriangleMesh::from_meshes(&self.meshes)
    }

    /// Write every triangle to an OBJ file.
    pub fn write_obj(&self, path: impl AsRef<Path>) -> Result<()> {
        bezmesh_io::write_obj(path, &self.triangles())?;
        Ok(())
    }
}
