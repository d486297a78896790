#![warn(missing_docs)]

//! Math types for bezmesh.
//!
//! Thin wrappers around nalgebra providing the point and vector types
//! used by patch evaluation and tessellation, plus the interpolation
//! helpers shared by those crates.

use nalgebra::Vector3;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point in 2D parameter space.
pub type Point2 = nalgebra::Point2<f64>;

/// Linear interpolation between two points.
///
/// Written as `a * (1 - t) + b * t` so that `t = 0` and `t = 1` reproduce
/// the endpoints exactly. Any `t` is accepted; values outside `[0, 1]`
/// extrapolate along the line through `a` and `b`.
#[inline]
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    Point3::from(a.coords * (1.0 - t) + b.coords * t)
}

/// Midpoint of two 3D points.
#[inline]
pub fn midpoint3(a: &Point3, b: &Point3) -> Point3 {
    Point3::from((a.coords + b.coords) * 0.5)
}

/// Midpoint of two points in parameter space.
///
/// For parameters that are dyadic fractions this is exact, which keeps
/// midpoints computed from either end of a shared edge bit-identical.
#[inline]
pub fn midpoint2(a: &Point2, b: &Point2) -> Point2 {
    Point2::from((a.coords + b.coords) * 0.5)
}
