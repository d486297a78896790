//! Cubic Bezier curves.

use bezmesh_math::{lerp, Point3, Vec3};

/// Position and first derivative of a curve at one parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveGeometry {
    /// Point on the curve.
    pub point: Point3,
    /// Derivative with respect to the curve parameter.
    pub derivative: Vec3,
}

/// A cubic Bezier curve defined by exactly four control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierCurve {
    /// Control points `P0..P3`.
    pub points: [Point3; 4],
}

impl BezierCurve {
    /// Create a curve from its four control points.
    pub fn new(points: [Point3; 4]) -> Self {
        Self { points }
    }

    /// Evaluate the curve at `t` with de Casteljau's algorithm.
    ///
    /// The point comes from three levels of linear interpolation and the
    /// derivative is `3 (E - D)` from the second level. `t` is not clamped.
    pub fn evaluate(&self, t: f64) -> CurveGeometry {
        let [p0, p1, p2, p3] = &self.points;

        let a = lerp(p0, p1, t);
        let b = lerp(p1, p2, t);
        let c = lerp(p2, p3, t);

        let d = lerp(&a, &b, t);
        let e = lerp(&b, &c, t);

        CurveGeometry {
            point: lerp(&d, &e, t),
            derivative: (e - d) * 3.0,
        }
    }

    /// Point on the curve at `t`.
    pub fn point_at(&self, t: f64) -> Point3 {
        self.evaluate(t).point
    }
}

impl From<[Point3; 4]> for BezierCurve {
    fn from(points: [Point3; 4]) -> Self {
        Self::new(points)
    }
}
