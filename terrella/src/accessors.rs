//! Scalar and derived properties of geographies.

use nalgebra::Vector3;
use terrella_types::{Polygon, Polyline, ValidationError};

use crate::aggregator::{Aggregator, CentroidAggregator, ConvexHullAggregator};
use crate::error::OperationError;
use crate::Geography;

impl Geography {
    /// Topological dimension: 0 for points, 1 for polylines, 2 for polygons. A collection has the largest dimension of
    /// its children, or -1 if it has none.
    pub fn dimension(&self) -> i32 {
        match self {
            Self::Point(_) => 0,
            Self::Polyline(_) => 1,
            Self::Polygon(_) => 2,
            Self::Collection(g) => g
                .features()
                .iter()
                .map(Geography::dimension)
                .max()
                .unwrap_or(-1),
        }
    }

    /// Returns true if the geography consists of several parts: more than one point, polyline or polygon shell, or a
    /// non-empty collection.
    pub fn is_collection(&self) -> bool {
        match self {
            Self::Point(g) => g.points().len() > 1,
            Self::Polyline(g) => g.polylines().len() > 1,
            Self::Polygon(g) => g.polygon().num_shells() > 1,
            Self::Collection(g) => !g.features().is_empty(),
        }
    }

    /// Number of vertices. Closing vertices of loops are not counted.
    pub fn num_points(&self) -> usize {
        match self {
            Self::Point(g) => g.points().len(),
            Self::Polyline(g) => g.polylines().iter().map(Polyline::num_vertices).sum(),
            Self::Polygon(g) => g.polygon().num_vertices(),
            Self::Collection(g) => g.features().iter().map(Geography::num_points).sum(),
        }
    }

    /// Returns true if the geography covers no point of the sphere.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(g) => g.points().is_empty(),
            Self::Polyline(g) => g.polylines().iter().all(Polyline::is_empty),
            Self::Polygon(g) => g.polygon().is_empty(),
            Self::Collection(g) => g.features().iter().all(Geography::is_empty),
        }
    }

    /// Area in steradians. Zero for points and polylines.
    pub fn area(&self) -> f64 {
        match self {
            Self::Polygon(g) => g.polygon().area(),
            Self::Collection(g) => g.features().iter().map(Geography::area).sum(),
            Self::Point(_) | Self::Polyline(_) => 0.0,
        }
    }

    /// Length in radians. Zero for points and polygons.
    pub fn length(&self) -> f64 {
        match self {
            Self::Polyline(g) => g.polylines().iter().map(Polyline::length).sum(),
            Self::Collection(g) => g.features().iter().map(Geography::length).sum(),
            Self::Point(_) | Self::Polygon(_) => 0.0,
        }
    }

    /// Length of the polygon boundaries in radians. Zero for points and polylines.
    pub fn perimeter(&self) -> f64 {
        match self {
            Self::Polygon(g) => g.polygon().perimeter(),
            Self::Collection(g) => g.features().iter().map(Geography::perimeter).sum(),
            Self::Point(_) | Self::Polyline(_) => 0.0,
        }
    }

    /// Longitude in degrees of a single point geography. NaN for an empty geography or several points.
    pub fn x(&self) -> Result<f64, OperationError> {
        Ok(self
            .single_point("x")?
            .map_or(f64::NAN, |p| p.to_lat_lng().lng()))
    }

    /// Latitude in degrees of a single point geography. NaN for an empty geography or several points.
    pub fn y(&self) -> Result<f64, OperationError> {
        Ok(self
            .single_point("y")?
            .map_or(f64::NAN, |p| p.to_lat_lng().lat()))
    }

    fn single_point(
        &self,
        operation: &'static str,
    ) -> Result<Option<&terrella_types::SpherePoint>, OperationError> {
        let Self::Point(g) = self else {
            return Err(OperationError::Unsupported {
                operation,
                kind: self.kind(),
            });
        };

        Ok(match g.points() {
            [point] => Some(point),
            _ => None,
        })
    }

    /// Unit vector pointing to the centroid, or the zero vector for an empty geography.
    ///
    /// Children of a collection contribute their centroid directions with equal weights.
    pub fn centroid(&self) -> Vector3<f64> {
        let sum = match self {
            Self::Point(g) => g
                .points()
                .iter()
                .fold(Vector3::zeros(), |acc, p| acc + p.vector()),
            Self::Polyline(g) => g
                .polylines()
                .iter()
                .fold(Vector3::zeros(), |acc, p| acc + p.centroid()),
            Self::Polygon(g) => g.polygon().centroid(),
            Self::Collection(_) => {
                let mut aggregator = CentroidAggregator::default();
                aggregator.add(self);
                return aggregator.finalize();
            }
        };

        normalize_or_zero(sum)
    }

    /// Boundary of the geography.
    ///
    /// The boundary of linear geographies is a point geography of the chain endpoints, the boundary of polygons is a
    /// polyline geography of the closed loops. Point geographies have an empty boundary.
    pub fn boundary(&self) -> Result<Geography, OperationError> {
        let index = self.shape_index();
        match self.dimension() {
            1 => {
                let endpoints = index
                    .polylines()
                    .iter()
                    .filter_map(|p| Some([*p.vertices().first()?, *p.vertices().last()?]))
                    .flatten()
                    .collect();
                Ok(Geography::from_points(endpoints))
            }
            2 => {
                if !index.points().is_empty() || !index.polylines().is_empty() {
                    return Err(OperationError::Unsupported {
                        operation: "boundary",
                        kind: "heterogeneous collection",
                    });
                }

                let rings = index
                    .polygons()
                    .iter()
                    .flat_map(Polygon::loops)
                    .map(|l| Polyline::new(l.closed_ring()))
                    .collect();
                Ok(Geography::from_polylines(rings))
            }
            _ => Ok(Geography::empty()),
        }
    }

    /// Smallest convex polygon containing the geography.
    pub fn convex_hull(&self) -> Geography {
        let mut aggregator = ConvexHullAggregator::default();
        aggregator.add(self);
        aggregator.finalize()
    }

    /// Returns true if every part of the geography is valid.
    pub fn is_valid(&self) -> bool {
        self.find_validation_error().is_none()
    }

    /// The first validity problem found in the geography.
    pub fn find_validation_error(&self) -> Option<ValidationError> {
        match self {
            Self::Point(g) => g
                .points()
                .iter()
                .position(|p| !p.is_unit_length())
                .map(ValidationError::NotUnitLength),
            Self::Polyline(g) => g.polylines().iter().find_map(|p| p.validate().err()),
            Self::Polygon(g) => g.polygon().validate().err(),
            Self::Collection(g) => g.features().iter().find_map(Geography::find_validation_error),
        }
    }
}

pub(crate) fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm > 0.0 {
        v / norm
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use terrella_types::{Loop, SpherePoint};

    use super::*;

    fn ll(lat: f64, lng: f64) -> SpherePoint {
        SpherePoint::from_degrees(lat, lng)
    }

    fn square(lat: f64, lng: f64, size: f64) -> Loop {
        Loop::new(vec![
            ll(lat, lng),
            ll(lat, lng + size),
            ll(lat + size, lng + size),
            ll(lat + size, lng),
        ])
    }

    fn line(points: &[(f64, f64)]) -> Polyline {
        Polyline::new(points.iter().map(|(lat, lng)| ll(*lat, *lng)).collect())
    }

    #[test]
    fn empty_geographies() {
        let point = Geography::from_points(vec![]);
        assert_eq!(point.dimension(), 0);
        assert_eq!(point.num_points(), 0);
        assert!(point.is_empty());

        let polygon = Geography::from_polygon(Polygon::empty());
        assert_eq!(polygon.dimension(), 2);
        assert_eq!(polygon.area(), 0.0);

        let collection = Geography::empty();
        assert_eq!(collection.dimension(), -1);
        assert!(!collection.is_collection());
        assert_eq!(collection.centroid(), Vector3::zeros());
    }

    #[test]
    fn measures_of_mismatched_dimension_are_zero() {
        let polygon = Geography::from_polygon(Polygon::init_nested(vec![square(0.0, 0.0, 1.0)]));
        assert_eq!(polygon.length(), 0.0);
        assert!(polygon.perimeter() > 0.0);

        let polyline = Geography::from_polylines(vec![line(&[(0.0, 0.0), (0.0, 90.0)])]);
        assert_eq!(polyline.area(), 0.0);
        assert_eq!(polyline.perimeter(), 0.0);
        assert_abs_diff_eq!(polyline.length(), PI / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn is_collection() {
        assert!(!Geography::from_points(vec![ll(0.0, 0.0)]).is_collection());
        assert!(Geography::from_points(vec![ll(0.0, 0.0), ll(1.0, 1.0)]).is_collection());

        let one = Polygon::init_nested(vec![square(0.0, 0.0, 10.0), square(2.0, 2.0, 2.0)]);
        assert!(!Geography::from_polygon(one).is_collection());
        let two = Polygon::init_nested(vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)]);
        assert!(Geography::from_polygon(two).is_collection());
    }

    #[test]
    fn collection_sums() {
        let collection = Geography::from_features(vec![
            Geography::from_points(vec![ll(0.0, 0.0)]),
            Geography::from_polylines(vec![line(&[(0.0, 0.0), (0.0, 10.0)])]),
            Geography::from_polygon(Polygon::init_nested(vec![square(0.0, 0.0, 1.0)])),
        ]);

        assert_eq!(collection.dimension(), 2);
        assert_eq!(collection.num_points(), 1 + 2 + 4);
        assert_abs_diff_eq!(collection.length(), 10f64.to_radians(), epsilon = 1e-14);
        assert!(collection.area() > 0.0);
    }

    #[test]
    fn coordinates() {
        let point = Geography::from_points(vec![ll(20.0, 10.0)]);
        assert_abs_diff_eq!(point.x().expect("point"), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(point.y().expect("point"), 20.0, epsilon = 1e-12);

        assert!(Geography::from_points(vec![]).x().expect("point").is_nan());
        assert!(Geography::from_points(vec![ll(0.0, 0.0), ll(1.0, 1.0)])
            .y()
            .expect("point")
            .is_nan());
        assert_matches!(
            Geography::empty().x(),
            Err(OperationError::Unsupported { operation: "x", .. })
        );
    }

    #[test]
    fn centroid() {
        let points = Geography::from_points(vec![ll(0.0, -10.0), ll(0.0, 10.0)]);
        assert_abs_diff_eq!(
            SpherePoint::from_vector(points.centroid()),
            ll(0.0, 0.0),
            epsilon = 1e-15
        );

        let line = Geography::from_polylines(vec![line(&[(0.0, 0.0), (0.0, 20.0)])]);
        assert_abs_diff_eq!(
            SpherePoint::from_vector(line.centroid()),
            ll(0.0, 10.0),
            epsilon = 1e-15
        );

        let collection = Geography::from_features(vec![points, Geography::empty(), line]);
        assert_abs_diff_eq!(
            SpherePoint::from_vector(collection.centroid()),
            ll(0.0, 5.0),
            epsilon = 1e-15
        );
    }

    #[test]
    fn boundary() {
        let lines = Geography::from_polylines(vec![
            line(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]),
            line(&[(5.0, 5.0), (6.0, 6.0)]),
        ]);
        let Geography::Point(endpoints) = lines.boundary().expect("linear boundary") else {
            panic!("expected points");
        };
        assert_eq!(endpoints.points().len(), 4);

        let polygon = Geography::from_polygon(Polygon::init_nested(vec![square(0.0, 0.0, 1.0)]));
        let Geography::Polyline(rings) = polygon.boundary().expect("polygon boundary") else {
            panic!("expected polylines");
        };
        assert_eq!(rings.polylines()[0].num_vertices(), 5);
        assert!(rings.polylines()[0].is_closed());

        let point = Geography::from_points(vec![ll(0.0, 0.0)]);
        assert!(point.boundary().expect("empty boundary").is_empty());

        let mixed = Geography::from_features(vec![point, polygon]);
        assert_matches!(mixed.boundary(), Err(OperationError::Unsupported { .. }));
    }

    #[test]
    fn validity() {
        let bowtie = Loop::new(vec![ll(0.0, 0.0), ll(10.0, 10.0), ll(0.0, 10.0), ll(10.0, 0.0)]);
        let invalid = Geography::from_polygon(Polygon::init_nested(vec![bowtie]));
        assert!(!invalid.is_valid());
        assert_matches!(
            invalid.find_validation_error(),
            Some(ValidationError::InvalidLoop { index: 0, .. })
        );

        let valid = Geography::from_polygon(Polygon::init_nested(vec![square(0.0, 0.0, 1.0)]));
        assert!(valid.is_valid());
        assert!(Geography::from_points(vec![SpherePoint::new(2.0, 0.0, 0.0)])
            .find_validation_error()
            .is_some());
    }
}
