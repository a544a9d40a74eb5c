//! Predicates and measures on geodesic edges between two points of the unit sphere.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::SpherePoint;

/// Determinants with absolute value below this threshold are treated as zero.
const DET_EPSILON: f64 = 1e-15;

/// Orientation of a triplet of points on the sphere.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    Counterclockwise,
    /// The three points lie on one great circle.
    Collinear,
}

impl Orientation {
    /// Determines orientation of a triplet of points.
    pub fn triplet(a: &SpherePoint, b: &SpherePoint, c: &SpherePoint) -> Self {
        match a.vector().dot(&b.cross(c)) {
            v if v > DET_EPSILON => Self::Counterclockwise,
            v if v < -DET_EPSILON => Self::Clockwise,
            _ => Self::Collinear,
        }
    }

    fn sign(self) -> i32 {
        match self {
            Self::Counterclockwise => 1,
            Self::Clockwise => -1,
            Self::Collinear => 0,
        }
    }
}

/// Result of testing two edges for crossing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Crossing {
    /// The interiors of the edges cross at exactly one point.
    Proper,
    /// The edges share a vertex.
    SharedVertex,
    /// The edges do not cross (or touch in a way that is not a proper crossing).
    None,
}

/// Tests whether edge `ab` crosses edge `cd`.
pub fn crossing(a: &SpherePoint, b: &SpherePoint, c: &SpherePoint, d: &SpherePoint) -> Crossing {
    if a == c || a == d || b == c || b == d {
        return Crossing::SharedVertex;
    }
    if a == b || c == d {
        return Crossing::None;
    }

    let acb = Orientation::triplet(a, c, b).sign();
    if acb == 0 {
        return Crossing::None;
    }

    if Orientation::triplet(b, d, a).sign() == acb
        && Orientation::triplet(c, b, d).sign() == acb
        && Orientation::triplet(d, a, c).sign() == acb
    {
        Crossing::Proper
    } else {
        Crossing::None
    }
}

/// Shorthand for `crossing(..) == Crossing::Proper`.
pub fn crosses(a: &SpherePoint, b: &SpherePoint, c: &SpherePoint, d: &SpherePoint) -> bool {
    crossing(a, b, c, d) == Crossing::Proper
}

/// Point at the fraction `t` of the way along the edge `ab`.
pub fn interpolate(a: &SpherePoint, b: &SpherePoint, t: f64) -> SpherePoint {
    if t <= 0.0 {
        return *a;
    }
    if t >= 1.0 {
        return *b;
    }

    let angle = a.angle(b);
    if angle == 0.0 {
        return *a;
    }

    let normal = a.cross(b);
    if normal.norm() == 0.0 {
        // antipodal endpoints, the edge direction is undefined
        return *a;
    }

    let dir = normal.cross(a.vector()).normalize();
    let t_angle = angle * t;
    SpherePoint::from_vector(a.vector() * t_angle.cos() + dir * t_angle.sin()).normalize()
}

/// Geodesic midpoint of the edge.
pub fn midpoint(a: &SpherePoint, b: &SpherePoint) -> SpherePoint {
    interpolate(a, b, 0.5)
}

/// Point at the given angular distance to the left of the edge's midpoint.
pub fn left_of(a: &SpherePoint, b: &SpherePoint, offset: f64) -> Option<SpherePoint> {
    let normal = a.cross(b);
    let norm = normal.norm();
    if norm == 0.0 {
        return None;
    }

    let mid = midpoint(a, b);
    let n = normal / norm;
    Some(SpherePoint::from_vector(mid.vector() * offset.cos() + n * offset.sin()).normalize())
}

/// Closest point to `p` on the edge `ab`.
pub fn project(p: &SpherePoint, a: &SpherePoint, b: &SpherePoint) -> SpherePoint {
    let normal = a.cross(b);
    let norm = normal.norm();
    if norm == 0.0 {
        return *a;
    }

    let n = normal / norm;
    let on_circle = p.vector() - n * n.dot(p.vector());
    if on_circle.norm() > 0.0 {
        let q = SpherePoint::from_vector(on_circle).normalize();
        if a.cross(&q).dot(&n) >= 0.0 && q.cross(b).dot(&n) >= 0.0 {
            return q;
        }
    }

    if p.angle(a) <= p.angle(b) {
        *a
    } else {
        *b
    }
}

/// Angular distance from `p` to the closest point of the edge `ab`.
pub fn distance_to_edge(p: &SpherePoint, a: &SpherePoint, b: &SpherePoint) -> f64 {
    p.angle(&project(p, a, b))
}

/// Intersection point of two edges that cross properly.
pub fn intersection(a: &SpherePoint, b: &SpherePoint, c: &SpherePoint, d: &SpherePoint) -> SpherePoint {
    let x = a.cross(b).cross(&c.cross(d));
    let reference = a.vector() + b.vector() + c.vector() + d.vector();
    let x = if x.dot(&reference) < 0.0 { -x } else { x };
    SpherePoint::from_vector(x).normalize()
}

/// Closest pair of points on two edges, one on `ab` and one on `cd`.
pub fn closest_points(
    a: &SpherePoint,
    b: &SpherePoint,
    c: &SpherePoint,
    d: &SpherePoint,
) -> (SpherePoint, SpherePoint) {
    if crosses(a, b, c, d) {
        let x = intersection(a, b, c, d);
        return (x, x);
    }

    let candidates = [
        (*a, project(a, c, d)),
        (*b, project(b, c, d)),
        (project(c, a, b), *c),
        (project(d, a, b), *d),
    ];

    let mut best = candidates[0];
    let mut best_distance = best.0.angle(&best.1);
    for candidate in &candidates[1..] {
        let distance = candidate.0.angle(&candidate.1);
        if distance < best_distance {
            best = *candidate;
            best_distance = distance;
        }
    }

    best
}

/// Minimum angular distance between the two edges.
pub fn edge_distance(a: &SpherePoint, b: &SpherePoint, c: &SpherePoint, d: &SpherePoint) -> f64 {
    let (x, y) = closest_points(a, b, c, d);
    x.angle(&y)
}

/// Signed area of the triangle `abc`. Positive for counterclockwise triangles.
pub fn signed_triangle_area(a: &SpherePoint, b: &SpherePoint, c: &SpherePoint) -> f64 {
    let det = a.vector().dot(&b.cross(c));
    let denominator = 1.0 + a.dot(b) + b.dot(c) + c.dot(a);
    2.0 * det.atan2(denominator)
}

/// Integral of the position vector along the edge. The length of the result is not the edge length.
pub fn true_centroid(a: &SpherePoint, b: &SpherePoint) -> Vector3<f64> {
    let angle = a.angle(b);
    if angle == 0.0 {
        return Vector3::zeros();
    }

    (a.vector() + b.vector()) * (angle / 2.0).tan()
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;

    use super::*;

    fn p(lat: f64, lng: f64) -> SpherePoint {
        SpherePoint::from_degrees(lat, lng)
    }

    #[test]
    fn orientation() {
        assert_eq!(
            Orientation::triplet(&p(0.0, 0.0), &p(0.0, 10.0), &p(10.0, 5.0)),
            Orientation::Counterclockwise
        );
        assert_eq!(
            Orientation::triplet(&p(0.0, 0.0), &p(10.0, 5.0), &p(0.0, 10.0)),
            Orientation::Clockwise
        );
        assert_eq!(
            Orientation::triplet(&p(0.0, 0.0), &p(0.0, 5.0), &p(0.0, 10.0)),
            Orientation::Collinear
        );
    }

    #[test]
    fn edge_crossing() {
        let a = p(-1.0, 0.0);
        let b = p(1.0, 0.0);
        let c = p(0.0, -1.0);
        let d = p(0.0, 1.0);
        assert_eq!(crossing(&a, &b, &c, &d), Crossing::Proper);
        assert_eq!(crossing(&a, &b, &a, &d), Crossing::SharedVertex);
        assert_eq!(crossing(&a, &b, &p(5.0, 5.0), &p(6.0, 6.0)), Crossing::None);

        let x = intersection(&a, &b, &c, &d);
        assert_abs_diff_eq!(x, p(0.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn interpolation() {
        let a = p(0.0, 0.0);
        let b = p(0.0, 90.0);
        assert_abs_diff_eq!(interpolate(&a, &b, 0.5), p(0.0, 45.0), epsilon = 1e-15);
        assert_eq!(interpolate(&a, &b, 0.0), a);
        assert_eq!(interpolate(&a, &b, 1.0), b);
    }

    #[test]
    fn distance_to_point() {
        let a = p(0.0, 0.0);
        let b = p(0.0, 90.0);
        assert_abs_diff_eq!(distance_to_edge(&p(10.0, 45.0), &a, &b), 10f64.to_radians(), epsilon = 1e-14);
        assert_abs_diff_eq!(
            distance_to_edge(&p(0.0, -30.0), &a, &b),
            30f64.to_radians(),
            epsilon = 1e-14
        );
        assert_abs_diff_eq!(distance_to_edge(&p(90.0, 0.0), &a, &b), FRAC_PI_2, epsilon = 1e-14);
    }

    #[test]
    fn closest_points_of_edges() {
        let (x, y) = closest_points(&p(0.0, 0.0), &p(0.0, 10.0), &p(5.0, 5.0), &p(10.0, 5.0));
        assert_abs_diff_eq!(x, p(0.0, 5.0), epsilon = 1e-14);
        assert_abs_diff_eq!(y, p(5.0, 5.0), epsilon = 1e-14);
    }

    #[test]
    fn triangle_area() {
        let octant = signed_triangle_area(&p(0.0, 0.0), &p(0.0, 90.0), &p(90.0, 0.0));
        assert_abs_diff_eq!(octant, PI / 2.0, epsilon = 1e-14);
        let reversed = signed_triangle_area(&p(0.0, 0.0), &p(90.0, 0.0), &p(0.0, 90.0));
        assert_abs_diff_eq!(reversed, -PI / 2.0, epsilon = 1e-14);
    }

    #[test]
    fn left_of_edge() {
        let probe = left_of(&p(0.0, 0.0), &p(0.0, 10.0), 0.01).expect("edge is not degenerate");
        assert!(probe.to_lat_lng().lat() > 0.0);
        assert!(left_of(&p(0.0, 0.0), &p(0.0, 0.0), 0.01).is_none());
    }
}
