//! Bicubic tensor-product Bezier patches.

use bezmesh_math::{Point2, Point3, Vec3};

use crate::curve::BezierCurve;

/// Below this cross-product length the partial derivatives are treated as
/// parallel and the sample normal is reported as the zero vector.
pub const DEGENERATE_NORMAL_EPSILON: f64 = 1e-12;

/// A single evaluated point on a patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Position in world coordinates.
    pub position: Point3,
    /// Unit normal, or the zero vector when the parametrization is
    /// singular or non-finite at this point (see [`SurfaceSample::is_degenerate`]).
    pub normal: Vec3,
    /// Parameter pair that produced this sample.
    pub uv: Point2,
}

impl SurfaceSample {
    /// Create a sample from its parts.
    pub fn new(position: Point3, normal: Vec3, uv: Point2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// `true` when no normal could be computed: the partial derivatives
    /// were parallel, or the normal is not finite.
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::zeros() || !self.normal.iter().all(|c| c.is_finite())
    }
}

/// A bicubic Bezier patch: a 4×4 control grid indexed `[row][col]`.
///
/// Each row is a cubic curve in `u`; the rows themselves are blended in
/// `v`. The grid size is fixed by the type, so every patch has exactly 16
/// control points and degree 3 in both directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierPatch {
    rows: [BezierCurve; 4],
}

impl BezierPatch {
    /// Create a patch from its four row curves.
    pub fn new(rows: [BezierCurve; 4]) -> Self {
        Self { rows }
    }

    /// Create a patch from a `[row][col]` grid of control points.
    pub fn from_grid(grid: [[Point3; 4]; 4]) -> Self {
        Self::new(grid.map(BezierCurve::new))
    }

    /// Create a patch by computing each control point from its `(row, col)`.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> Point3) -> Self {
        Self::new(std::array::from_fn(|row| {
            BezierCurve::new(std::array::from_fn(|col| f(row, col)))
        }))
    }

    /// The four row curves.
    pub fn rows(&self) -> &[BezierCurve; 4] {
        &self.rows
    }

    /// The curve formed by column `col` across the four rows.
    pub fn column(&self, col: usize) -> BezierCurve {
        BezierCurve::new(std::array::from_fn(|row| self.rows[row].points[col]))
    }

    /// Control point at `(row, col)`.
    pub fn control_point(&self, row: usize, col: usize) -> Point3 {
        self.rows[row].points[col]
    }

    /// Iterate over all 16 control points in row-major order.
    pub fn control_points(&self) -> impl Iterator<Item = &Point3> + '_ {
        self.rows.iter().flat_map(|row| row.points.iter())
    }

    /// Evaluate position and normal at `(u, v)`.
    ///
    /// Rows are evaluated at `u` to build a curve in `v`, and columns are
    /// evaluated at `v` to build a curve in `u`. The curve in `v` gives the
    /// position and `∂/∂v`, the curve in `u` gives `∂/∂u`, and the normal is
    /// `normalize(∂u × ∂v)`.
    pub fn evaluate(&self, u: f64, v: f64) -> SurfaceSample {
        let v_curve = BezierCurve::new(std::array::from_fn(|row| self.rows[row].point_at(u)));
        let u_curve = BezierCurve::new(std::array::from_fn(|col| self.column(col).point_at(v)));

        let along_v = v_curve.evaluate(v);
        let along_u = u_curve.evaluate(u);

        let normal = along_u
            .derivative
            .cross(&along_v.derivative)
            .try_normalize(DEGENERATE_NORMAL_EPSILON)
            .filter(|n| n.iter().all(|c| c.is_finite()))
            .unwrap_or_else(Vec3::zeros);

        SurfaceSample::new(along_v.point, normal, Point2::new(u, v))
    }
}

/// Evaluate `patch` at `(u, v)`.
pub fn evaluate(patch: &BezierPatch, u: f64, v: f64) -> SurfaceSample {
    patch.evaluate(u, v)
}
