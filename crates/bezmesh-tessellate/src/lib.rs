#![warn(missing_docs)]

//! Triangulation of bicubic Bezier patches.
//!
//! Two tessellators turn a [`BezierPatch`] into a [`Mesh`]:
//!
//! - [`tessellate_uniform`] samples a regular grid in parameter space
//! - [`tessellate_adaptive`] refines two seed triangles wherever an edge
//!   deviates from the surface by more than a threshold
//!
//! [`tessellate_patches`] runs either one over many patches in parallel.
//!
//! # Example
//!
//! ```
//! use bezmesh_math::Point3;
//! use bezmesh_patch::BezierPatch;
//! use bezmesh_tessellate::{tessellate_uniform, tessellate_adaptive};
//!
//! let patch = BezierPatch::from_fn(|row, col| Point3::new(col as f64, row as f64, 0.0));
//! assert_eq!(tessellate_uniform(&patch, 0.5).unwrap().num_triangles(), 8);
//! assert_eq!(tessellate_adaptive(&patch, 0.01).unwrap().num_triangles(), 2);
//! ```

pub mod adaptive;
pub mod error;
pub mod mesh;
pub mod settings;
pub mod uniform;

pub use adaptive::{tessellate_adaptive, tessellate_adaptive_with};
pub use error::{Result, TessellateError};
pub use mesh::{aggregate_triangles, Mesh, MeshBounds, Triangle, TriangleMesh};
pub use settings::{
    AdaptiveSettings, Subdivision, SubdivisionMethod, UniformSettings, MAX_SUBDIVISION_LEVEL,
    MAX_UNIFORM_STEPS, UNIFORM_EPSILON,
};
pub use uniform::{tessellate_uniform, tessellate_uniform_with};

use bezmesh_patch::BezierPatch;
use log::{debug, warn};
use rayon::prelude::*;

/// Tessellate one patch with the given subdivision.
pub fn tessellate_patch(patch: &BezierPatch, subdivision: &Subdivision) -> Result<Mesh> {
    match subdivision {
        Subdivision::Uniform(settings) => tessellate_uniform_with(patch, settings),
        Subdivision::Adaptive(settings) => tessellate_adaptive_with(patch, settings),
    }
}

/// Tessellate every patch in parallel, one mesh per patch in input order.
///
/// Settings are validated once up front. The result is identical to
/// calling [`tessellate_patch`] on each patch in turn.
pub fn tessellate_patches(patches: &[BezierPatch], subdivision: &Subdivision) -> Result<Vec<Mesh>> {
    subdivision.validate()?;

    let meshes = patches
        .par_iter()
        .enumerate()
        .map(|(idx, patch)| {
            let mesh = tessellate_patch(patch, subdivision)?;
            debug!(
                "patch {}: {} triangles, {} samples",
                idx,
                mesh.num_triangles(),
                mesh.num_samples()
            );
            let degenerate = mesh.degenerate_sample_count();
            if degenerate > 0 {
                warn!("patch {}: {} samples have no defined normal", idx, degenerate);
            }
            Ok(mesh)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(meshes)
}
