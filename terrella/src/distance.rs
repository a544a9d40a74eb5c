//! Distances between geographies, as angles in radians on the unit sphere.

use terrella_types::{distance, SpherePoint};

use crate::Geography;

/// Minimum distance between the geographies. Zero if they intersect, infinity if either of them is empty.
pub fn distance(a: &Geography, b: &Geography) -> f64 {
    distance::min_distance(a.shape_index(), b.shape_index())
}

/// Maximum distance between any two points of the geographies. Negative infinity if either of them is empty.
pub fn max_distance(a: &Geography, b: &Geography) -> f64 {
    distance::max_distance(a.shape_index(), b.shape_index())
}

/// Point of the boundary of `a` closest to `b`.
pub fn closest_point(a: &Geography, b: &Geography) -> Option<SpherePoint> {
    minimum_clearance_line_between(a, b).map(|(point, _)| point)
}

/// The shortest segment connecting the boundaries of `a` and `b`: the first point lies on `a`, the second on `b`.
///
/// Polygon interiors are ignored, so for a point inside a polygon the segment ends on the polygon's nearest edge.
/// Returns `None` if either geography is empty.
pub fn minimum_clearance_line_between(
    a: &Geography,
    b: &Geography,
) -> Option<(SpherePoint, SpherePoint)> {
    distance::closest_pair(a.shape_index(), b.shape_index())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use terrella_types::Polyline;

    use super::*;

    fn ll(lat: f64, lng: f64) -> SpherePoint {
        SpherePoint::from_degrees(lat, lng)
    }

    #[test]
    fn point_to_line() {
        let point = Geography::from_points(vec![ll(10.0, 5.0)]);
        let line = Geography::from_polylines(vec![Polyline::new(vec![ll(0.0, 0.0), ll(0.0, 10.0)])]);

        assert_abs_diff_eq!(distance(&point, &line), 10f64.to_radians(), epsilon = 1e-12);
        assert_abs_diff_eq!(distance(&line, &point), 10f64.to_radians(), epsilon = 1e-12);

        let (on_point, on_line) =
            minimum_clearance_line_between(&point, &line).expect("non-empty geographies");
        assert_abs_diff_eq!(on_point, ll(10.0, 5.0), epsilon = 1e-12);
        assert_abs_diff_eq!(on_line, ll(0.0, 5.0), epsilon = 1e-12);

        let closest = closest_point(&line, &point).expect("non-empty geographies");
        assert_abs_diff_eq!(closest, ll(0.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn max_distance_between_points() {
        let a = Geography::from_points(vec![ll(0.0, 0.0)]);
        let b = Geography::from_points(vec![ll(0.0, 10.0), ll(0.0, 120.0)]);
        assert_abs_diff_eq!(max_distance(&a, &b), 120f64.to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn empty_geographies() {
        let a = Geography::from_points(vec![ll(0.0, 0.0)]);
        let empty = Geography::empty();

        assert_eq!(distance(&a, &empty), f64::INFINITY);
        assert_eq!(max_distance(&a, &empty), f64::NEG_INFINITY);
        assert!(minimum_clearance_line_between(&a, &empty).is_none());
    }
}
