use nalgebra::Vector3;

use crate::{Loop, Polygon, Polyline, SpherePoint};

const HULL_EPSILON: f64 = 1e-12;

/// Incrementally collects geometries and computes the smallest convex polygon containing all of them.
///
/// If the input does not fit into an open hemisphere the result is the full polygon.
#[derive(Debug, Clone, Default)]
pub struct ConvexHullQuery {
    points: Vec<SpherePoint>,
}

impl ConvexHullQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single point.
    pub fn add_point(&mut self, point: SpherePoint) {
        self.points.push(point);
    }

    /// Adds vertices of a polyline.
    pub fn add_polyline(&mut self, polyline: &Polyline) {
        self.points.extend_from_slice(polyline.vertices());
    }

    /// Adds vertices of a loop.
    pub fn add_loop(&mut self, l: &Loop) {
        self.points.extend_from_slice(l.vertices());
    }

    /// Adds shells of a polygon. A full polygon makes the hull full.
    pub fn add_polygon(&mut self, polygon: &Polygon) {
        if polygon.is_full() {
            // points in every direction
            for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
                self.points.push(SpherePoint::from_vector(axis));
                self.points.push(SpherePoint::from_vector(-axis));
            }
            return;
        }

        for l in polygon.loops().iter().filter(|l| l.depth() == 0) {
            self.add_loop(l);
        }
    }

    /// Merges points collected by another query.
    pub fn merge(&mut self, other: ConvexHullQuery) {
        self.points.extend(other.points);
    }

    /// Number of collected points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Computes the hull of everything added so far.
    pub fn hull(&self) -> Polygon {
        if self.points.is_empty() {
            return Polygon::empty();
        }

        let sum = self
            .points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.vector());
        if sum.norm() < HULL_EPSILON {
            return Polygon::full();
        }

        let center = SpherePoint::from_vector(sum).normalize();
        if self.points.iter().any(|p| p.dot(&center) <= HULL_EPSILON) {
            log::debug!(
                "Hull of {} points does not fit into a hemisphere",
                self.points.len()
            );
            return Polygon::full();
        }

        let u = center.ortho();
        let v = center.vector().cross(&u);

        let mut projected: Vec<(f64, f64, SpherePoint)> = self
            .points
            .iter()
            .map(|p| {
                let w = p.dot(&center);
                (p.vector().dot(&u) / w, p.vector().dot(&v) / w, *p)
            })
            .collect();
        projected.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        projected.dedup_by(|a, b| a.2 == b.2);

        let distinct = projected.len();
        if distinct == 1 {
            return degenerate_point_hull(&projected[0].2);
        }

        let hull = monotone_chain(&projected);
        match hull.len() {
            0 | 1 => degenerate_point_hull(&projected[0].2),
            2 => degenerate_edge_hull(&hull[0], &hull[1]),
            _ => Polygon::init_nested(vec![Loop::new(hull)]),
        }
    }
}

fn cross_2d(o: &(f64, f64, SpherePoint), a: &(f64, f64, SpherePoint), b: &(f64, f64, SpherePoint)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Counterclockwise hull of points sorted by `x` then `y`. Collinear points are dropped.
fn monotone_chain(sorted: &[(f64, f64, SpherePoint)]) -> Vec<SpherePoint> {
    let mut lower: Vec<&(f64, f64, SpherePoint)> = vec![];
    for p in sorted {
        while lower.len() >= 2 && cross_2d(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<&(f64, f64, SpherePoint)> = vec![];
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && cross_2d(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.into_iter().chain(upper).map(|p| p.2).collect()
}

fn degenerate_point_hull(point: &SpherePoint) -> Polygon {
    let u = point.ortho();
    let v = point.vector().cross(&u);
    let vertices = vec![
        *point,
        SpherePoint::from_vector(point.vector() + u * HULL_EPSILON).normalize(),
        SpherePoint::from_vector(point.vector() + v * HULL_EPSILON).normalize(),
    ];
    Polygon::init_oriented(vec![Loop::new(vertices)])
}

fn degenerate_edge_hull(a: &SpherePoint, b: &SpherePoint) -> Polygon {
    let normal = a.cross(b).normalize();
    let mid = crate::edge::midpoint(a, b);
    let apex = SpherePoint::from_vector(mid.vector() + normal * HULL_EPSILON).normalize();
    Polygon::init_oriented(vec![Loop::new(vec![*a, *b, apex])])
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn hull_of_points() {
        let mut query = ConvexHullQuery::new();
        for (lat, lng) in [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (5.0, 5.0)] {
            query.add_point(SpherePoint::from_degrees(lat, lng));
        }

        let hull = query.hull();
        assert_eq!(hull.num_loops(), 1);
        assert_eq!(hull.loops()[0].num_vertices(), 4);
        assert!(hull.contains(&SpherePoint::from_degrees(5.0, 5.0)));
        assert!(!hull.contains(&SpherePoint::from_degrees(-5.0, 5.0)));
        assert!(hull.validate().is_ok());
    }

    #[test]
    fn empty_and_full_hulls() {
        assert!(ConvexHullQuery::new().hull().is_empty());

        let mut query = ConvexHullQuery::new();
        query.add_point(SpherePoint::from_degrees(0.0, 0.0));
        query.add_point(SpherePoint::from_degrees(0.0, 180.0));
        assert!(query.hull().is_full());
    }

    #[test]
    fn degenerate_hulls() {
        let mut query = ConvexHullQuery::new();
        let point = SpherePoint::from_degrees(10.0, 10.0);
        query.add_point(point);
        query.add_point(point);
        let hull = query.hull();
        assert_eq!(hull.num_loops(), 1);
        assert_abs_diff_eq!(hull.area(), 0.0, epsilon = 1e-12);

        query.add_point(SpherePoint::from_degrees(20.0, 10.0));
        let hull = query.hull();
        assert_eq!(hull.loops()[0].num_vertices(), 3);
        assert_abs_diff_eq!(hull.area(), 0.0, epsilon = 1e-12);
    }
}
