#![warn(missing_docs)]

//! Bicubic Bezier evaluation for bezmesh.
//!
//! Provides cubic Bezier curves and 4×4 tensor-product patches, evaluated
//! with de Casteljau's algorithm. Patch evaluation yields a
//! [`SurfaceSample`]: position, unit normal and the `(u, v)` that
//! produced it.
//!
//! # Key types
//!
//! - [`BezierCurve`]: cubic Bezier curve with 4 control points
//! - [`BezierPatch`]: bicubic patch, a 4×4 control grid stored as 4 row curves
//! - [`SurfaceSample`]: an evaluated point on a patch
//!
//! # Example
//!
//! ```
//! use bezmesh_math::Point3;
//! use bezmesh_patch::BezierPatch;
//!
//! let patch = BezierPatch::from_fn(|row, col| Point3::new(col as f64, row as f64, 0.0));
//! let sample = patch.evaluate(0.0, 0.0);
//! assert_eq!(sample.position, Point3::new(0.0, 0.0, 0.0));
//! ```

pub mod curve;
pub mod patch;

pub use curve::{BezierCurve, CurveGeometry};
pub use patch::{evaluate, BezierPatch, SurfaceSample, DEGENERATE_NORMAL_EPSILON};
