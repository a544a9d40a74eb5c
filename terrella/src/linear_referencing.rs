//! Positions along polylines expressed as fractions of their length.

use terrella_types::SpherePoint;

use crate::error::OperationError;
use crate::Geography;

/// Fraction of the length of `line` preceding the point of `line` closest to `point`.
///
/// NaN unless `line` is a single polyline and `point` is a single point.
pub fn project_normalized(line: &Geography, point: &Geography) -> f64 {
    if line.dimension() != 1 || point.dimension() != 0 {
        return f64::NAN;
    }

    let (polylines, points) = (line.shape_index().polylines(), point.shape_index().points());
    let ([polyline], [vertex]) = (polylines, points) else {
        return f64::NAN;
    };
    if vertex.is_zero() {
        return f64::NAN;
    }

    polyline
        .project(vertex)
        .map_or(f64::NAN, |(projected, next)| polyline.uninterpolate(&projected, next))
}

/// Point at the given fraction of the length of a single polyline geography.
///
/// An empty geography gives the zero vector.
pub fn interpolate_normalized(line: &Geography, fraction: f64) -> Result<SpherePoint, OperationError> {
    if line.is_empty() {
        return Ok(SpherePoint::default());
    }

    if line.dimension() != 1 {
        return Err(OperationError::Unsupported {
            operation: "interpolate_normalized",
            kind: line.kind(),
        });
    }

    let index = line.shape_index();
    match index.polylines() {
        [polyline] if index.points().is_empty() && index.polygons().is_empty() => {
            Ok(polyline.interpolate(fraction).unwrap_or_default())
        }
        polylines => Err(OperationError::NotSingle {
            operation: "interpolate_normalized",
            kind: "polyline",
            count: polylines.len() + index.points().len() + index.polygons().len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use terrella_types::Polyline;

    use super::*;

    fn ll(lat: f64, lng: f64) -> SpherePoint {
        SpherePoint::from_degrees(lat, lng)
    }

    fn line() -> Geography {
        Geography::from_polylines(vec![Polyline::new(vec![
            ll(0.0, 0.0),
            ll(0.0, 10.0),
            ll(0.0, 40.0),
        ])])
    }

    #[test]
    fn project() {
        let point = Geography::from_points(vec![ll(5.0, 20.0)]);
        assert_abs_diff_eq!(project_normalized(&line(), &point), 0.5, epsilon = 1e-12);

        let two = Geography::from_points(vec![ll(5.0, 20.0), ll(0.0, 0.0)]);
        assert!(project_normalized(&line(), &two).is_nan());
        assert!(project_normalized(&point, &line()).is_nan());
    }

    #[test]
    fn interpolate() {
        let middle = interpolate_normalized(&line(), 0.5).expect("single polyline");
        assert_abs_diff_eq!(middle, ll(0.0, 20.0), epsilon = 1e-12);

        let end = interpolate_normalized(&line(), 2.0).expect("single polyline");
        assert_abs_diff_eq!(end, ll(0.0, 40.0), epsilon = 1e-12);

        let empty = interpolate_normalized(&Geography::from_polylines(vec![]), 0.5)
            .expect("empty geography");
        assert!(empty.is_zero());
    }

    #[test]
    fn interpolate_requires_single_polyline() {
        let two = Geography::from_polylines(vec![
            Polyline::new(vec![ll(0.0, 0.0), ll(0.0, 1.0)]),
            Polyline::new(vec![ll(1.0, 0.0), ll(1.0, 1.0)]),
        ]);
        assert_matches!(
            interpolate_normalized(&two, 0.5),
            Err(OperationError::NotSingle { count: 2, .. })
        );

        let point = Geography::from_points(vec![ll(0.0, 0.0)]);
        assert_matches!(
            interpolate_normalized(&point, 0.5),
            Err(OperationError::Unsupported { kind: "point", .. })
        );
    }
}
