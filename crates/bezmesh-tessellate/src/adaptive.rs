//! Adaptive, error-driven tessellation.
//!
//! Starts from two seed triangles spanning the unit parameter square and
//! refines them through a FIFO worklist. Each edge of a popped triangle is
//! tested on its own: the surface is evaluated at the parameter midpoint
//! and compared with the straight-line midpoint of the edge's endpoints.
//! Edges whose error reaches the threshold are split, and the children go
//! back on the worklist to be tested again.
//!
//! The split decision depends only on the two endpoint samples, so two
//! triangles sharing an edge always agree on it and the output has no
//! T-junctions.

use bezmesh_math::{midpoint2, midpoint3};
use bezmesh_patch::{BezierPatch, SurfaceSample};
use log::warn;

use crate::error::Result;
use crate::mesh::{Mesh, Triangle};
use crate::settings::AdaptiveSettings;

/// Tessellate a patch adaptively with the default depth bound.
pub fn tessellate_adaptive(patch: &BezierPatch, error_threshold: f64) -> Result<Mesh> {
    tessellate_adaptive_with(patch, &AdaptiveSettings::new(error_threshold))
}

/// Adaptive tessellation with explicit settings.
///
/// Every sample stays on the `2^-max_depth` parameter lattice: an edge
/// whose midpoint would fall off it is never split, whatever its error.
/// The lattice is finite and each split halves a triangle's area, so
/// refinement always stops, with at most `2 · 4^max_depth` triangles. The
/// bound is a property of the edge alone, so it keeps the output
/// crack-free.
pub fn tessellate_adaptive_with(patch: &BezierPatch, settings: &AdaptiveSettings) -> Result<Mesh> {
    settings.validate()?;

    let mut refiner = Refiner {
        patch,
        threshold: settings.error_threshold,
        lattice_scale: settings.lattice_scale(),
        capped: 0,
        mesh: Mesh::new(),
        worklist: Worklist::default(),
    };

    refiner.seed();
    refiner.run();
    if refiner.capped > 0 {
        warn!(
            "adaptive tessellation hit max depth {} on {} edge test(s); threshold {} not met everywhere",
            settings.max_depth, refiner.capped, settings.error_threshold
        );
    }

    Ok(refiner.mesh)
}

/// FIFO queue stored in a `Vec` and drained through a read cursor.
#[derive(Debug, Default)]
struct Worklist {
    items: Vec<Triangle>,
    head: usize,
}

impl Worklist {
    /// Drop consumed entries once they dominate the buffer.
    const COMPACT_AFTER: usize = 1024;

    fn push(&mut self, triangle: Triangle) {
        self.items.push(triangle);
    }

    fn pop(&mut self) -> Option<Triangle> {
        let item = *self.items.get(self.head)?;
        self.head += 1;
        if self.head >= Self::COMPACT_AFTER && self.head * 2 >= self.items.len() {
            self.items.drain(..self.head);
            self.head = 0;
        }
        Some(item)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.items.len() - self.head
    }
}

struct Refiner<'a> {
    patch: &'a BezierPatch,
    threshold: f64,
    lattice_scale: f64,
    /// Edge tests that wanted a split whose midpoint was off the lattice.
    capped: usize,
    mesh: Mesh,
    worklist: Worklist,
}

impl Refiner<'_> {
    /// Evaluate the corners and queue the two seed triangles.
    fn seed(&mut self) {
        let c00 = self.patch.evaluate(0.0, 0.0);
        let c01 = self.patch.evaluate(0.0, 1.0);
        let c10 = self.patch.evaluate(1.0, 0.0);
        let c11 = self.patch.evaluate(1.0, 1.0);
        self.mesh.samples.extend_from_slice(&[c00, c01, c10, c11]);

        self.worklist.push(Triangle::new(c01, c10, c00));
        self.worklist.push(Triangle::new(c10, c01, c11));
    }

    fn run(&mut self) {
        while let Some(triangle) = self.worklist.pop() {
            self.refine(triangle);
        }
    }

    /// Returns the surface sample at the edge's parameter midpoint when the
    /// edge needs splitting.
    fn split(&mut self, a: &SurfaceSample, b: &SurfaceSample) -> Option<SurfaceSample> {
        let uv = midpoint2(&a.uv, &b.uv);
        let interpolated = self.patch.evaluate(uv.x, uv.y);
        let approximated = midpoint3(&a.position, &b.position);
        let error = (interpolated.position - approximated).norm();
        // A NaN error never splits.
        if error.is_nan() || error < self.threshold {
            return None;
        }

        let on_lattice = |x: f64| (x * self.lattice_scale).fract() == 0.0;
        if !(on_lattice(uv.x) && on_lattice(uv.y)) {
            self.capped += 1;
            return None;
        }
        Some(interpolated)
    }

    fn refine(&mut self, triangle: Triangle) {
        let [a, b, c] = triangle.vertices;
        let ab = self.split(&a, &b);
        let bc = self.split(&b, &c);
        let ac = self.split(&a, &c);

        self.mesh
            .samples
            .extend([ab, bc, ac].into_iter().flatten());

        match children(triangle.vertices, ab, bc, ac) {
            None => self.mesh.triangles.push(triangle),
            Some(tris) => {
                for [p, q, r] in tris {
                    self.worklist.push(Triangle::new(p, q, r));
                }
            }
        }
    }
}

/// Children of the triangle `[a, b, c]` given the midpoints of the edges
/// that split, or `None` when no edge splits. Every child keeps the
/// parent's winding.
fn children<T: Copy>(
    [a, b, c]: [T; 3],
    ab: Option<T>,
    bc: Option<T>,
    ac: Option<T>,
) -> Option<Vec<[T; 3]>> {
    let tris = match (ab, bc, ac) {
        (None, None, None) => return None,
        (None, None, Some(m_ac)) => vec![[a, b, m_ac], [m_ac, b, c]],
        (Some(m_ab), None, None) => vec![[a, m_ab, c], [m_ab, b, c]],
        (None, Some(m_bc), None) => vec![[a, b, m_bc], [a, m_bc, c]],
        // Two splits: the corner at the shared vertex comes first.
        (Some(m_ab), None, Some(m_ac)) => vec![[a, m_ab, m_ac], [m_ac, m_ab, c], [m_ab, b, c]],
        (Some(m_ab), Some(m_bc), None) => vec![[m_ab, b, m_bc], [a, m_ab, m_bc], [a, m_bc, c]],
        (None, Some(m_bc), Some(m_ac)) => vec![[m_ac, m_bc, c], [a, b, m_ac], [m_ac, b, m_bc]],
        (Some(m_ab), Some(m_bc), Some(m_ac)) => vec![
            [a, m_ab, m_ac],
            [m_ab, b, m_bc],
            [m_ac, m_bc, c],
            [m_ac, m_ab, m_bc],
        ],
    };
    Some(tris)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TessellateError;
    use bezmesh_math::{Point2, Point3, Vec3};
    use std::collections::HashMap;

    fn flat_patch() -> BezierPatch {
        BezierPatch::from_fn(|row, col| Point3::new(col as f64, row as f64, 0.0))
    }

    fn dome_patch() -> BezierPatch {
        BezierPatch::from_fn(|row, col| {
            let interior = (1..=2).contains(&row) && (1..=2).contains(&col);
            Point3::new(col as f64, row as f64, if interior { 2.0 } else { 0.0 })
        })
    }

    /// Curved along u only: every row is the same arch.
    fn ridge_patch() -> BezierPatch {
        BezierPatch::from_fn(|row, col| {
            let z = if col == 1 || col == 2 { 3.0 } else { 0.0 };
            Point3::new(col as f64, row as f64, z)
        })
    }

    fn uv_key(p: &Point2) -> (u64, u64) {
        (p.x.to_bits(), p.y.to_bits())
    }

    fn on_boundary(a: &Point2, b: &Point2) -> bool {
        (a.x == b.x && (a.x == 0.0 || a.x == 1.0)) || (a.y == b.y && (a.y == 0.0 || a.y == 1.0))
    }

    #[test]
    fn test_flat_patch_keeps_seed_triangles() {
        for threshold in [1e-9, 0.01, 0.5, 10.0] {
            let mesh = tessellate_adaptive(&flat_patch(), threshold).unwrap();
            assert_eq!(mesh.num_triangles(), 2, "threshold {threshold}");
            assert_eq!(mesh.num_samples(), 4);
        }
    }

    #[test]
    fn test_seed_winding_order() {
        let mesh = tessellate_adaptive(&flat_patch(), 0.01).unwrap();
        let uvs = |t: &Triangle| t.vertices.map(|s| s.uv);
        assert_eq!(
            uvs(&mesh.triangles[0]),
            [Point2::new(0.0, 1.0), Point2::new(1.0, 0.0), Point2::new(0.0, 0.0)]
        );
        assert_eq!(
            uvs(&mesh.triangles[1]),
            [Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), Point2::new(1.0, 1.0)]
        );
        for sample in &mesh.samples {
            assert!((sample.normal - Vec3::z()).norm() < 1e-9);
        }
    }

    #[test]
    fn test_curved_patch_refines() {
        let coarse = tessellate_adaptive(&dome_patch(), 0.5).unwrap();
        let fine = tessellate_adaptive(&dome_patch(), 0.01).unwrap();
        assert!(coarse.num_triangles() > 2);
        assert!(fine.num_triangles() > coarse.num_triangles());
        assert!(fine.num_samples() > 4);
    }

    #[test]
    fn test_deterministic() {
        let first = tessellate_adaptive(&dome_patch(), 0.02).unwrap();
        let second = tessellate_adaptive(&dome_patch(), 0.02).unwrap();
        assert_eq!(first.num_triangles(), second.num_triangles());
        assert_eq!(first, second);
    }

    /// Every interior uv edge is shared by exactly two triangles, every
    /// boundary edge by one.
    fn assert_conforming(mesh: &Mesh) {
        let mut edges: HashMap<((u64, u64), (u64, u64)), (usize, bool)> = HashMap::new();
        for tri in &mesh.triangles {
            let uv = tri.vertices.map(|s| s.uv);
            for (p, q) in [(uv[0], uv[1]), (uv[1], uv[2]), (uv[2], uv[0])] {
                let (ka, kb) = (uv_key(&p), uv_key(&q));
                let key = if ka < kb { (ka, kb) } else { (kb, ka) };
                let entry = edges.entry(key).or_insert((0, on_boundary(&p, &q)));
                entry.0 += 1;
            }
        }
        for (edge, (count, boundary)) in edges {
            let expected = if boundary { 1 } else { 2 };
            assert_eq!(count, expected, "edge {edge:?}");
        }
    }

    #[test]
    fn test_no_t_junctions() {
        for patch in [dome_patch(), ridge_patch()] {
            let mesh = tessellate_adaptive(&patch, 0.03).unwrap();
            assert_conforming(&mesh);
        }
    }

    #[test]
    fn test_children_keep_parent_winding() {
        let mesh = tessellate_adaptive(&dome_patch(), 0.01).unwrap();
        for tri in &mesh.triangles {
            assert!(tri.face_normal().dot(&tri.sample_normal_sum()) < 0.0);
        }
    }

    #[test]
    fn test_error_bound_met_on_output_edges() {
        let patch = dome_patch();
        let threshold = 0.05;
        let mesh = tessellate_adaptive(&patch, threshold).unwrap();
        for tri in &mesh.triangles {
            let [a, b, c] = tri.vertices;
            for (p, q) in [(a, b), (b, c), (a, c)] {
                let uv = midpoint2(&p.uv, &q.uv);
                let error = (patch.evaluate(uv.x, uv.y).position
                    - midpoint3(&p.position, &q.position))
                .norm();
                assert!(error < threshold);
            }
        }
    }

    #[test]
    fn test_straight_edges_never_split() {
        // The ridge is straight along v, so the u = 0 and u = 1 borders
        // keep only their corner samples.
        let mesh = tessellate_adaptive(&ridge_patch(), 0.05).unwrap();
        assert!(mesh.num_triangles() > 2);
        for s in &mesh.samples {
            if s.uv.x == 0.0 || s.uv.x == 1.0 {
                assert!(s.uv.y == 0.0 || s.uv.y == 1.0, "unexpected border sample {:?}", s.uv);
            }
        }
    }

    fn assert_on_lattice(mesh: &Mesh, scale: f64) {
        for s in &mesh.samples {
            assert_eq!((s.uv.x * scale).fract(), 0.0, "{:?}", s.uv);
            assert_eq!((s.uv.y * scale).fract(), 0.0, "{:?}", s.uv);
        }
    }

    #[test]
    fn test_depth_bound_terminates() {
        let patch = dome_patch();

        let shallow = AdaptiveSettings::new(1e-9).with_max_depth(2);
        let mesh = tessellate_adaptive_with(&patch, &shallow).unwrap();
        assert!(mesh.num_triangles() > 2);
        assert!(mesh.num_triangles() <= 2 * 4usize.pow(2));
        assert_on_lattice(&mesh, 4.0);

        let deep = AdaptiveSettings::new(1e-9);
        let mesh = tessellate_adaptive_with(&patch, &deep).unwrap();
        assert!(mesh.num_triangles() <= 2 * 4usize.pow(deep.max_depth));
        assert_on_lattice(&mesh, deep.lattice_scale());

        let unrefined = tessellate_adaptive_with(&patch, &shallow.with_max_depth(0)).unwrap();
        assert_eq!(unrefined.num_triangles(), 2);
    }

    #[test]
    fn test_capped_output_stays_conforming() {
        let settings = AdaptiveSettings::new(1e-6).with_max_depth(3);
        let mesh = tessellate_adaptive_with(&ridge_patch(), &settings).unwrap();
        assert_on_lattice(&mesh, 8.0);
        assert_conforming(&mesh);
    }

    #[test]
    fn test_non_finite_patch_is_not_refined() {
        let patch = BezierPatch::from_fn(|row, col| {
            let z = if (row, col) == (1, 1) { f64::NAN } else { 0.0 };
            Point3::new(col as f64, row as f64, z)
        });
        for threshold in [1e-6, 10.0] {
            let mesh = tessellate_adaptive(&patch, threshold).unwrap();
            assert_eq!(mesh.num_triangles(), 2);
            assert_eq!(mesh.degenerate_sample_count(), mesh.num_samples());
        }
    }

    #[test]
    fn test_midpoint_samples_follow_edge_order() {
        // Every border is curved, so the first seed splits all three edges.
        let bowl = BezierPatch::from_fn(|row, col| {
            let z = (col * col + row * row) as f64;
            Point3::new(col as f64, row as f64, z)
        });
        let mesh = tessellate_adaptive(&bowl, 0.1).unwrap();
        let uvs: Vec<Point2> = mesh.samples[4..7].iter().map(|s| s.uv).collect();
        assert_eq!(
            uvs,
            [Point2::new(0.5, 0.5), Point2::new(0.5, 0.0), Point2::new(0.0, 0.5)]
        );
    }

    #[test]
    fn test_children_vertex_order() {
        let parent = ["A", "B", "C"];
        let split = |ab: bool, bc: bool, ac: bool| {
            children(parent, ab.then_some("ab"), bc.then_some("bc"), ac.then_some("ac"))
        };

        assert_eq!(split(false, false, false), None);
        assert_eq!(split(false, false, true), Some(vec![["A", "B", "ac"], ["ac", "B", "C"]]));
        assert_eq!(split(true, false, false), Some(vec![["A", "ab", "C"], ["ab", "B", "C"]]));
        assert_eq!(split(false, true, false), Some(vec![["A", "B", "bc"], ["A", "bc", "C"]]));
        assert_eq!(
            split(true, false, true),
            Some(vec![["A", "ab", "ac"], ["ac", "ab", "C"], ["ab", "B", "C"]])
        );
        assert_eq!(
            split(true, true, false),
            Some(vec![["ab", "B", "bc"], ["A", "ab", "bc"], ["A", "bc", "C"]])
        );
        assert_eq!(
            split(false, true, true),
            Some(vec![["ac", "bc", "C"], ["A", "B", "ac"], ["ac", "B", "bc"]])
        );
        assert_eq!(
            split(true, true, true),
            Some(vec![
                ["A", "ab", "ac"],
                ["ab", "B", "bc"],
                ["ac", "bc", "C"],
                ["ac", "ab", "bc"],
            ])
        );
    }

    #[test]
    fn test_rejects_bad_threshold() {
        assert!(matches!(
            tessellate_adaptive(&dome_patch(), 0.0),
            Err(TessellateError::InvalidSettings(_))
        ));
        assert!(tessellate_adaptive(&dome_patch(), f64::NAN).is_err());
    }

    #[test]
    fn test_worklist_is_fifo_across_compaction() {
        let sample = bezmesh_patch::SurfaceSample::new(
            Point3::origin(),
            Vec3::zeros(),
            Point2::origin(),
        );
        let tagged = |i: usize| {
            let mut s = sample;
            s.uv.x = i as f64;
            Triangle::new(s, sample, sample)
        };
        let mut list = Worklist::default();
        for i in 0..3000 {
            list.push(tagged(i));
        }
        for expected in 0..2000 {
            assert_eq!(list.pop(), Some(tagged(expected)));
        }
        list.push(tagged(3000));
        assert_eq!(list.len(), 1001);
        for expected in 2000..=3000 {
            assert_eq!(list.pop(), Some(tagged(expected)));
        }
        assert!(list.pop().is_none());
    }
}
