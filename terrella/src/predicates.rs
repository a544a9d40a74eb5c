//! Boolean predicates between geographies.

use terrella_types::{boolean, distance, Loop, Polygon, ShapeIndex, SpherePoint};

use crate::error::ConfigurationError;
use crate::options::{BoundaryModel, OperationOptions};
use crate::Geography;

/// Returns true if the geographies have at least one common point.
pub fn intersects(a: &Geography, b: &Geography, options: &OperationOptions) -> bool {
    boolean::intersects(a.shape_index(), b.shape_index(), &options.boolean_options())
}

/// Returns true if every point of `b` belongs to `a`.
pub fn contains(a: &Geography, b: &Geography, options: &OperationOptions) -> bool {
    boolean::contains(a.shape_index(), b.shape_index(), &options.boolean_options())
}

/// Returns true if the geographies consist of the same points.
pub fn equals(a: &Geography, b: &Geography, options: &OperationOptions) -> bool {
    boolean::equals(a.shape_index(), b.shape_index(), &options.boolean_options())
}

/// Returns true if the geographies share boundary points but no interior points.
///
/// The boundary models of `options` are ignored: the result compares the closed and the open model.
pub fn touches(a: &Geography, b: &Geography, options: &OperationOptions) -> bool {
    let closed = options.with_model(BoundaryModel::Closed);
    let open = options.with_model(BoundaryModel::Open);
    intersects(a, b, &closed) && !intersects(a, b, &open)
}

/// Returns true if the distance between the geographies is at most `distance` radians.
pub fn is_within_distance(a: &Geography, b: &Geography, distance: f64) -> bool {
    distance::is_within_distance(a.shape_index(), b.shape_index(), distance)
}

/// Returns true if the geography intersects the longitude/latitude box with south-west corner `(lng1, lat1)` and
/// north-east corner `(lng2, lat2)` in degrees.
///
/// The box is approximated by a polygon with `detail` geodesic edges along each of its parallels, so the parallels
/// are followed more closely with larger `detail`. `lng1` may be larger than `lng2` for a box crossing the
/// antimeridian. Boxes of zero width or height intersect nothing.
pub fn intersects_box(
    geography: &Geography,
    lng1: f64,
    lat1: f64,
    lng2: f64,
    lat2: f64,
    detail: i64,
    options: &OperationOptions,
) -> Result<bool, ConfigurationError> {
    let Some(ring) = box_ring(lng1, lat1, lng2, lat2, detail)? else {
        return Ok(false);
    };

    let mut l = Loop::new(ring);
    l.normalize();
    let index = ShapeIndex::from_polygon(Polygon::init_oriented(vec![l]));

    Ok(boolean::intersects(
        &index,
        geography.shape_index(),
        &options.boolean_options(),
    ))
}

fn box_ring(
    lng1: f64,
    lat1: f64,
    lng2: f64,
    lat2: f64,
    detail: i64,
) -> Result<Option<Vec<SpherePoint>>, ConfigurationError> {
    if detail < 1 {
        return Err(ConfigurationError::InvalidDetail(detail));
    }

    // the box may wrap around the antimeridian, so the width is measured on the equator
    let west = SpherePoint::from_degrees(0.0, lng1);
    let east = SpherePoint::from_degrees(0.0, lng2);
    let width = west.angle(&east).to_degrees();
    let height = lat2 - lat1;
    if width == 0.0 || height == 0.0 {
        return Ok(None);
    }

    let delta = width / detail as f64;
    let south = (0..=detail).map(|i| SpherePoint::from_degrees(lat1, lng1 + delta * i as f64));
    let north = (0..=detail).map(|i| SpherePoint::from_degrees(lat2, lng2 - delta * i as f64));

    Ok(Some(south.chain(north).collect()))
}
