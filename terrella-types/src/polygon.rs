use std::f64::consts::PI;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{edge, reference_point, Loop, PointLocation, SpherePoint, ValidationError};

/// A region of the sphere bounded by a set of non-crossing loops.
///
/// Loops are stored in pre-order of the nesting tree: every hole directly follows its shell (or one of its shell's
/// other holes). The depth of each loop is the number of loops containing it, so even-depth loops are shells and
/// odd-depth loops are holes. The region of the polygon is always on the left side of every loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    loops: Vec<Loop>,
    origin_inside: bool,
}

impl Polygon {
    /// Polygon with no loops covering nothing.
    pub fn empty() -> Self {
        Self {
            loops: vec![],
            origin_inside: false,
        }
    }

    /// Polygon with no loops covering the whole sphere.
    pub fn full() -> Self {
        Self {
            loops: vec![],
            origin_inside: true,
        }
    }

    /// Builds a polygon from loops given in any order and orientation.
    ///
    /// Every loop is normalized to enclose at most a hemisphere, then the nesting of the loops determines which of
    /// them are holes. Holes are inverted so that the region of the polygon is on the left side of every loop.
    pub fn init_nested(loops: Vec<Loop>) -> Self {
        let mut loops = loops;
        for l in &mut loops {
            l.normalize();
        }

        let depths = nesting_depths(&loops);
        let origin = reference_point();
        let origin_inside = deepest_containing(&loops, &depths, &origin)
            .map_or(false, |i| depths[i] % 2 == 0);

        let mut ordered = vec![];
        for index in preorder(&loops, &depths) {
            let mut l = loops[index].clone();
            l.set_depth(depths[index]);
            if l.is_hole() {
                l.invert();
            }
            ordered.push(l);
        }

        Self {
            loops: ordered,
            origin_inside,
        }
    }

    /// Builds a polygon from loops whose orientation is already correct: the region of the polygon is on the left
    /// side of every loop. Loops are reordered by nesting but never inverted.
    pub fn init_oriented(loops: Vec<Loop>) -> Self {
        let normalized: Vec<Loop> = loops
            .iter()
            .map(|l| {
                let mut copy = l.clone();
                copy.normalize();
                copy
            })
            .collect();

        let depths = nesting_depths(&normalized);
        let origin = reference_point();
        let origin_inside = deepest_containing(&normalized, &depths, &origin)
            .or_else(|| depths.iter().position(|d| *d == 0))
            .map_or(false, |i| loops[i].contains(&origin));

        let ordered = preorder(&normalized, &depths)
            .into_iter()
            .map(|index| {
                let mut l = loops[index].clone();
                l.set_depth(depths[index]);
                l
            })
            .collect();

        Self {
            loops: ordered,
            origin_inside,
        }
    }

    /// Loops of the polygon in nesting pre-order.
    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    /// Number of loops.
    pub fn num_loops(&self) -> usize {
        self.loops.len()
    }

    /// Number of shells (even-depth loops), each starting a separate connected part.
    pub fn num_shells(&self) -> usize {
        self.loops.iter().filter(|l| !l.is_hole()).count()
    }

    /// Total number of vertices in all loops.
    pub fn num_vertices(&self) -> usize {
        self.loops.iter().map(Loop::num_vertices).sum()
    }

    /// Returns true if the polygon has no loops and covers nothing.
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty() && !self.origin_inside
    }

    /// Returns true if the polygon has no loops and covers the whole sphere.
    pub fn is_full(&self) -> bool {
        self.loops.is_empty() && self.origin_inside
    }

    /// Groups loops into parts: one shell followed by the holes nested inside it.
    pub fn parts(&self) -> Vec<&[Loop]> {
        let mut parts = vec![];
        let mut start = 0;
        for (i, l) in self.loops.iter().enumerate() {
            if i > start && !l.is_hole() {
                parts.push(&self.loops[start..i]);
                start = i;
            }
        }
        if start < self.loops.len() {
            parts.push(&self.loops[start..]);
        }

        parts
    }

    /// Iterates over the edges of all loops.
    pub fn edges(&self) -> impl Iterator<Item = (&SpherePoint, &SpherePoint)> + '_ {
        self.loops.iter().flat_map(Loop::edges)
    }

    /// Returns true if the point is inside the polygon. Boundary points give an arbitrary but consistent answer.
    pub fn contains(&self, point: &SpherePoint) -> bool {
        let origin = reference_point();
        let crossings = self
            .edges()
            .filter(|(a, b)| edge::crosses(&origin, point, a, b))
            .count();
        self.origin_inside ^ (crossings % 2 == 1)
    }

    /// Returns true if the point is on the boundary of one of the loops.
    pub fn on_boundary(&self, point: &SpherePoint) -> bool {
        self.loops.iter().any(|l| l.on_boundary(point))
    }

    /// Location of the point relative to the polygon.
    pub fn locate(&self, point: &SpherePoint) -> PointLocation {
        if self.on_boundary(point) {
            PointLocation::Boundary
        } else if self.contains(point) {
            PointLocation::Interior
        } else {
            PointLocation::Exterior
        }
    }

    /// Area in steradians.
    pub fn area(&self) -> f64 {
        if self.loops.is_empty() {
            return if self.origin_inside { 4.0 * PI } else { 0.0 };
        }

        let signed: f64 = self.loops.iter().map(Loop::signed_area).sum();
        if signed.abs() < 1e-12 {
            return if self.origin_inside { 4.0 * PI } else { 0.0 };
        }

        signed.rem_euclid(4.0 * PI)
    }

    /// Integral of the position vector over the polygon. Not normalized.
    pub fn centroid(&self) -> Vector3<f64> {
        self.loops
            .iter()
            .map(Loop::centroid)
            .fold(Vector3::zeros(), |acc, v| acc + v)
    }

    /// Total length of all loops in radians.
    pub fn perimeter(&self) -> f64 {
        self.loops.iter().map(Loop::perimeter).sum()
    }

    /// Checks the validity of every loop, that no two loops cross and that holes are oriented opposite to their
    /// shells.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (index, l) in self.loops.iter().enumerate() {
            l.validate().map_err(|source| ValidationError::InvalidLoop {
                index,
                source: Box::new(source),
            })?;
        }

        for (loop_a, la) in self.loops.iter().enumerate() {
            for (loop_b, lb) in self.loops.iter().enumerate().skip(loop_a + 1) {
                for (edge_a, (a, b)) in la.edges().enumerate() {
                    for (edge_b, (c, d)) in lb.edges().enumerate() {
                        if edge::crosses(a, b, c, d) {
                            return Err(ValidationError::LoopsCross {
                                loop_a,
                                edge_a,
                                loop_b,
                                edge_b,
                            });
                        }
                    }
                }
            }
        }

        for (i, l) in self.loops.iter().enumerate() {
            if l.depth() == 0 {
                continue;
            }

            let parent = self.loops[..i]
                .iter()
                .rev()
                .find(|p| p.depth() + 1 == l.depth());
            if let Some(parent) = parent {
                if parent.is_normalized() == l.is_normalized() {
                    return Err(ValidationError::InconsistentOrientation);
                }
            }
        }

        Ok(())
    }
}

impl Default for Polygon {
    fn default() -> Self {
        Self::empty()
    }
}

fn nesting_depths(normalized: &[Loop]) -> Vec<usize> {
    (0..normalized.len())
        .map(|i| {
            (0..normalized.len())
                .filter(|&j| j != i && normalized[j].contains_loop(&normalized[i]))
                .count()
        })
        .collect()
}

fn deepest_containing(normalized: &[Loop], depths: &[usize], point: &SpherePoint) -> Option<usize> {
    normalized
        .iter()
        .enumerate()
        .filter(|(_, l)| l.contains(point))
        .max_by_key(|(i, _)| depths[*i])
        .map(|(i, _)| i)
}

fn preorder(normalized: &[Loop], depths: &[usize]) -> Vec<usize> {
    let parent = |i: usize| -> Option<usize> {
        if depths[i] == 0 {
            return None;
        }
        (0..normalized.len())
            .find(|&j| depths[j] + 1 == depths[i] && normalized[j].contains_loop(&normalized[i]))
    };
    let parents: Vec<Option<usize>> = (0..normalized.len()).map(parent).collect();

    let mut order = Vec::with_capacity(normalized.len());
    let mut stack: Vec<usize> = (0..normalized.len())
        .filter(|&i| parents[i].is_none())
        .rev()
        .collect();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(
            (0..normalized.len())
                .filter(|&j| parents[j] == Some(i))
                .rev(),
        );
    }

    order
}
