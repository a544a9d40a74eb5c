//! Closest and furthest distance queries between [`ShapeIndex`]es. Distances are angles in radians.

use std::f64::consts::PI;

use crate::boolean::{self, BooleanOptions};
use crate::{edge, ShapeIndex, SpherePoint};

/// Closest pair of points between the boundaries (edges and isolated points) of two indexes.
///
/// The interiors of polygons are not considered, so a point inside a polygon is still paired with the polygon's
/// nearest edge. Returns `None` if either index has no vertices.
pub fn closest_pair(a: &ShapeIndex, b: &ShapeIndex) -> Option<(SpherePoint, SpherePoint)> {
    let mut best: Option<(SpherePoint, SpherePoint, f64)> = None;
    let mut consider = |x: SpherePoint, y: SpherePoint| {
        let distance = x.angle(&y);
        if best.map_or(true, |(_, _, d)| distance < d) {
            best = Some((x, y, distance));
        }
    };

    for p in a.isolated_points() {
        for q in b.isolated_points() {
            consider(*p, *q);
        }
        for (q0, q1) in b.edges() {
            consider(*p, edge::project(p, q0, q1));
        }
    }

    for (p0, p1) in a.edges() {
        for q in b.isolated_points() {
            consider(edge::project(q, p0, p1), *q);
        }
        for (q0, q1) in b.edges() {
            let (x, y) = edge::closest_points(p0, p1, q0, q1);
            consider(x, y);
        }
    }

    best.map(|(x, y, _)| (x, y))
}

/// Minimum distance between any point of `a` and any point of `b`.
///
/// Returns `0` if the indexes intersect (including containment by polygons) and infinity if either is empty.
pub fn min_distance(a: &ShapeIndex, b: &ShapeIndex) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }

    if boolean::intersects(a, b, &BooleanOptions::closed()) {
        return 0.0;
    }

    closest_pair(a, b).map_or(f64::INFINITY, |(x, y)| x.angle(&y))
}

/// Maximum distance between any point of `a` and any point of `b`.
///
/// Returns negative infinity if either index is empty.
pub fn max_distance(a: &ShapeIndex, b: &ShapeIndex) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::NEG_INFINITY;
    }

    // the furthest point of `b` from `x` is the closest one to the antipode of `x`
    PI - min_distance(&a.antipodal(), b)
}

/// Returns true if some point of `a` is within `threshold` radians of some point of `b`.
pub fn is_within_distance(a: &ShapeIndex, b: &ShapeIndex, threshold: f64) -> bool {
    min_distance(a, b) <= threshold
}
