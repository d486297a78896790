//! Uniform tessellation on a regular parameter grid.

use bezmesh_patch::BezierPatch;

use crate::error::Result;
use crate::mesh::{Mesh, Triangle};
use crate::settings::UniformSettings;

/// Tessellate a patch by sampling a regular `(n + 1) × (n + 1)` grid.
///
/// `n = floor((1 + ε) / step)`. Sample `(i, j)` is evaluated at
/// `(i·step, j·step)` and stored at index `i·(n + 1) + j`. Each cell emits
/// two triangles sharing the diagonal from `(i + 1, j)` to `(i, j + 1)`,
/// giving exactly `2n²` triangles.
pub fn tessellate_uniform(patch: &BezierPatch, step: f64) -> Result<Mesh> {
    tessellate_uniform_with(patch, &UniformSettings::new(step))
}

/// Uniform tessellation with explicit settings.
pub fn tessellate_uniform_with(patch: &BezierPatch, settings: &UniformSettings) -> Result<Mesh> {
    settings.validate()?;

    let n = settings.steps();
    let step = settings.step;
    let stride = n + 1;

    let mut mesh = Mesh {
        samples: Vec::with_capacity(stride * stride),
        triangles: Vec::with_capacity(2 * n * n),
    };

    for i in 0..=n {
        let u = i as f64 * step;
        for j in 0..=n {
            let v = j as f64 * step;
            mesh.samples.push(patch.evaluate(u, v));
        }
    }

    let grid = &mesh.samples;
    for i in 0..n {
        for j in 0..n {
            let top_left = i * stride + j;
            let bottom_left = top_left + 1;
            let top_right = top_left + stride;
            let bottom_right = top_right + 1;

            mesh.triangles.push(Triangle::new(
                grid[top_right],
                grid[top_left],
                grid[bottom_left],
            ));
            mesh.triangles.push(Triangle::new(
                grid[top_right],
                grid[bottom_left],
                grid[bottom_right],
            ));
        }
    }

    Ok(mesh)
}
