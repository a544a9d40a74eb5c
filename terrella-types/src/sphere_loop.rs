use std::f64::consts::PI;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{edge, SpherePoint, ValidationError, BOUNDARY_TOLERANCE};

/// Fixed point used as the start of all point-in-region rays. It is chosen so that it is unlikely to coincide with
/// vertices of real-world data.
pub fn reference_point() -> SpherePoint {
    SpherePoint::new(
        -0.0099994664350250197,
        0.0025924542609324121,
        0.99994664350250195,
    )
    .normalize()
}

/// Location of a point relative to a region.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointLocation {
    /// Strictly inside.
    Interior,
    /// On the boundary (within [`BOUNDARY_TOLERANCE`]).
    Boundary,
    /// Strictly outside.
    Exterior,
}

/// A closed ring of vertices. The region of the loop is on the left side of its edges.
///
/// The last vertex is implicitly connected to the first one, the closing vertex is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loop {
    vertices: Vec<SpherePoint>,
    origin_inside: bool,
    depth: usize,
}

impl Loop {
    /// Creates a loop from its vertices without the closing one.
    pub fn new(vertices: Vec<SpherePoint>) -> Self {
        let mut this = Self {
            vertices,
            origin_inside: false,
            depth: 0,
        };
        this.origin_inside = this.compute_origin_inside();
        this
    }

    /// Vertices of the loop.
    pub fn vertices(&self) -> &[SpherePoint] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex with wrap-around indexing. Returns `None` for an empty loop.
    pub fn vertex(&self, index: usize) -> Option<&SpherePoint> {
        let n = self.vertices.len();
        index.checked_rem(n).map(|i| &self.vertices[i])
    }

    /// Nesting depth of the loop within its polygon. Shells have even depth, holes odd.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    /// Returns true if this loop is a hole of its polygon.
    pub fn is_hole(&self) -> bool {
        self.depth % 2 == 1
    }

    /// Iterates over the edges of the loop including the closing one.
    pub fn edges(&self) -> impl Iterator<Item = (&SpherePoint, &SpherePoint)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }

    /// Vertices of the loop with the first vertex appended to the end.
    pub fn closed_ring(&self) -> Vec<SpherePoint> {
        let mut ring = self.vertices.clone();
        if let Some(first) = self.vertices.first() {
            ring.push(*first);
        }
        ring
    }

    fn compute_origin_inside(&self) -> bool {
        let Some(probe) = self.interior_probe() else {
            return false;
        };

        // Orientation tests are meaningless at this scale, winding decides between a speck and its complement.
        let signed = self.signed_area();
        if signed.abs() < 1e-12 {
            return signed < 0.0;
        }

        self.crossings_from_origin(&probe) % 2 == 0
    }

    /// A point just to the left of the first non-degenerate edge, i.e. inside the region of the loop.
    pub fn interior_probe(&self) -> Option<SpherePoint> {
        if self.vertices.len() < 3 {
            return None;
        }

        self.edges().find_map(|(a, b)| {
            let offset = (a.angle(b) * 1e-6).max(1e-12);
            edge::left_of(a, b, offset)
        })
    }

    fn crossings_from_origin(&self, point: &SpherePoint) -> usize {
        let origin = reference_point();
        self.edges()
            .filter(|(a, b)| edge::crosses(&origin, point, a, b))
            .count()
    }

    /// Returns true if the point is inside the loop. Points on the boundary give an arbitrary but consistent answer.
    pub fn contains(&self, point: &SpherePoint) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }

        self.origin_inside ^ (self.crossings_from_origin(point) % 2 == 1)
    }

    /// Returns true if the point is within [`BOUNDARY_TOLERANCE`] of an edge of the loop.
    pub fn on_boundary(&self, point: &SpherePoint) -> bool {
        self.edges()
            .any(|(a, b)| edge::distance_to_edge(point, a, b) <= BOUNDARY_TOLERANCE)
    }

    /// Location of the point relative to the loop's region.
    pub fn locate(&self, point: &SpherePoint) -> PointLocation {
        if self.on_boundary(point) {
            PointLocation::Boundary
        } else if self.contains(point) {
            PointLocation::Interior
        } else {
            PointLocation::Exterior
        }
    }

    /// Returns true if the region of `other` is inside the region of this loop. The loops must not cross.
    pub fn contains_loop(&self, other: &Loop) -> bool {
        if let Some(vertex) = other.vertices.iter().find(|v| !self.on_boundary(v)) {
            return self.contains(vertex);
        }

        // every vertex touches this loop, decide by the edge midpoints
        other
            .edges()
            .map(|(a, b)| edge::midpoint(a, b))
            .find(|m| !self.on_boundary(m))
            .map_or(true, |m| self.contains(&m))
    }

    /// Area of the region on the left of the loop's edges, modulo `4π`.
    pub fn signed_area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }

        let first = &self.vertices[0];
        self.vertices[1..]
            .windows(2)
            .map(|w| edge::signed_triangle_area(first, &w[0], &w[1]))
            .sum()
    }

    /// Area of the loop's region in steradians, in range `[0, 4π]`.
    pub fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }

        let signed = self.signed_area();
        if signed.abs() < 1e-12 {
            return if self.origin_inside { 4.0 * PI } else { 0.0 };
        }

        signed.rem_euclid(4.0 * PI)
    }

    /// Integral of the position vector over the region of the loop. Not normalized.
    pub fn centroid(&self) -> Vector3<f64> {
        if self.vertices.len() < 3 {
            return Vector3::zeros();
        }

        self.edges()
            .filter_map(|(a, b)| {
                let normal = a.cross(b);
                let norm = normal.norm();
                (norm > 0.0).then(|| normal / norm * a.angle(b))
            })
            .fold(Vector3::zeros(), |acc, v| acc + v)
            * 0.5
    }

    /// Total length of the edges in radians.
    pub fn perimeter(&self) -> f64 {
        if self.vertices.len() < 2 {
            return 0.0;
        }

        self.edges().map(|(a, b)| a.angle(b)).sum()
    }

    /// Returns true if the region of the loop is at most a hemisphere.
    pub fn is_normalized(&self) -> bool {
        self.area() <= 2.0 * PI + 1e-12
    }

    /// Inverts the loop if its region is larger than a hemisphere.
    pub fn normalize(&mut self) {
        if !self.is_normalized() {
            self.invert();
        }
    }

    /// Replaces the region of the loop with its complement by reversing the vertex order.
    pub fn invert(&mut self) {
        self.vertices.reverse();
        self.origin_inside = !self.origin_inside;
    }

    /// Checks the loop for structural validity.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let n = self.vertices.len();
        if n < 3 {
            return Err(ValidationError::TooFewLoopVertices);
        }

        for (i, v) in self.vertices.iter().enumerate() {
            if !(v.x().is_finite() && v.y().is_finite() && v.z().is_finite()) {
                return Err(ValidationError::NonFinite(i));
            }
            if !v.is_unit_length() {
                return Err(ValidationError::NotUnitLength(i));
            }
        }

        for (i, (a, b)) in self.edges().enumerate() {
            if a == b {
                return Err(ValidationError::DegenerateEdge(i));
            }
            if *a == -*b {
                return Err(ValidationError::AntipodalVertices(i, (i + 1) % n));
            }
        }

        for i in 0..n {
            for j in (i + 1)..n {
                if self.vertices[i] == self.vertices[j] {
                    return Err(ValidationError::DuplicateVertices(j));
                }
            }
        }

        for i in 0..n {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }

                let (a, b) = (&self.vertices[i], &self.vertices[(i + 1) % n]);
                let (c, d) = (&self.vertices[j], &self.vertices[(j + 1) % n]);
                if edge::crosses(a, b, c, d) {
                    return Err(ValidationError::EdgesCross(i, j));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    use super::*;

    fn square(size: f64) -> Loop {
        Loop::new(vec![
            SpherePoint::from_degrees(0.0, 0.0),
            SpherePoint::from_degrees(0.0, size),
            SpherePoint::from_degrees(size, size),
            SpherePoint::from_degrees(size, 0.0),
        ])
    }

    #[test]
    fn containment() {
        let square = square(10.0);
        assert!(square.contains(&SpherePoint::from_degrees(5.0, 5.0)));
        assert!(!square.contains(&SpherePoint::from_degrees(-5.0, 5.0)));
        assert!(!square.contains(&SpherePoint::from_degrees(5.0, 180.0)));
        assert_eq!(
            square.locate(&SpherePoint::from_degrees(0.0, 5.0)),
            PointLocation::Boundary
        );
    }

    #[test]
    fn inversion() {
        let mut square = square(10.0);
        let small_area = square.area();
        assert!(square.is_normalized());

        square.invert();
        assert!(!square.is_normalized());
        assert!(!square.contains(&SpherePoint::from_degrees(5.0, 5.0)));
        assert!(square.contains(&SpherePoint::from_degrees(-5.0, 5.0)));
        assert_abs_diff_eq!(square.area(), 4.0 * PI - small_area, epsilon = 1e-12);

        square.normalize();
        assert_abs_diff_eq!(square.area(), small_area, epsilon = 1e-12);
    }

    #[test]
    fn area_of_octant() {
        let octant = Loop::new(vec![
            SpherePoint::from_degrees(0.0, 0.0),
            SpherePoint::from_degrees(0.0, 90.0),
            SpherePoint::from_degrees(90.0, 0.0),
        ]);
        assert_abs_diff_eq!(octant.area(), PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(octant.perimeter(), 1.5 * PI, epsilon = 1e-12);

        let centroid = octant.centroid();
        assert_abs_diff_eq!(centroid.x, centroid.y, epsilon = 1e-12);
        assert_abs_diff_eq!(centroid.y, centroid.z, epsilon = 1e-12);
        assert_abs_diff_eq!(centroid.x, PI / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn nested_loops() {
        let outer = square(10.0);
        let inner = Loop::new(vec![
            SpherePoint::from_degrees(2.0, 2.0),
            SpherePoint::from_degrees(2.0, 4.0),
            SpherePoint::from_degrees(4.0, 4.0),
        ]);
        assert!(outer.contains_loop(&inner));
        assert!(!inner.contains_loop(&outer));
    }

    #[test]
    fn validation() {
        assert!(square(10.0).validate().is_ok());

        let bow_tie = Loop::new(vec![
            SpherePoint::from_degrees(0.0, 0.0),
            SpherePoint::from_degrees(1.0, 1.0),
            SpherePoint::from_degrees(0.0, 1.0),
            SpherePoint::from_degrees(1.0, 0.0),
        ]);
        assert_matches!(bow_tie.validate(), Err(ValidationError::EdgesCross(0, 2)));

        let p = SpherePoint::from_degrees(1.0, 1.0);
        assert_matches!(
            Loop::new(vec![p, p]).validate(),
            Err(ValidationError::TooFewLoopVertices)
        );
        assert_matches!(
            Loop::new(vec![p, SpherePoint::from_degrees(2.0, 2.0), p, SpherePoint::from_degrees(0.0, 3.0)])
                .validate(),
            Err(ValidationError::DuplicateVertices(2))
        );
    }

    #[test]
    fn empty_loop() {
        let empty = Loop::new(vec![]);
        assert_eq!(empty.vertex(0), None);
        assert_eq!(empty.vertex(3), None);
        assert_eq!(empty.area(), 0.0);
        assert_eq!(empty.perimeter(), 0.0);
        assert!(!empty.contains(&SpherePoint::from_degrees(1.0, 1.0)));
        assert_matches!(empty.validate(), Err(ValidationError::TooFewLoopVertices));

        let square = square(10.0);
        assert_eq!(square.vertex(4), square.vertex(0));
        assert_eq!(square.vertex(5), Some(&SpherePoint::from_degrees(0.0, 10.0)));
    }
}
