//! Incremental computation of derived properties over many geographies.

use nalgebra::Vector3;
use terrella_types::ConvexHullQuery;

use crate::accessors::normalize_or_zero;
use crate::Geography;

/// Accumulator of a property over any number of geographies.
///
/// Geographies can be split into several partitions, each aggregated separately, and the partial results combined
/// with [`Aggregator::merge`].
pub trait Aggregator {
    /// Result of the aggregation.
    type Output;

    /// Adds a geography to the accumulator.
    fn add(&mut self, geography: &Geography);

    /// Adds everything accumulated by `other`.
    fn merge(&mut self, other: Self)
    where
        Self: Sized;

    /// Computes the result.
    fn finalize(self) -> Self::Output;
}

/// Aggregates the centroid direction.
///
/// Every simple geography contributes the unit vector of its own centroid, so all parts weigh the same regardless of
/// their size. Empty geographies contribute nothing. The result is a unit vector, or zero if nothing was added.
#[derive(Debug, Clone, Default)]
pub struct CentroidAggregator {
    centroid: Vector3<f64>,
}

impl Aggregator for CentroidAggregator {
    type Output = Vector3<f64>;

    fn add(&mut self, geography: &Geography) {
        if let Geography::Collection(collection) = geography {
            for feature in collection.features() {
                self.add(feature);
            }
            return;
        }

        let centroid = geography.centroid();
        if centroid.norm_squared() > 0.0 {
            self.centroid += centroid;
        }
    }

    fn merge(&mut self, other: Self) {
        self.centroid += other.centroid;
    }

    fn finalize(self) -> Self::Output {
        normalize_or_zero(self.centroid)
    }
}

/// Aggregates the convex hull of all vertices.
#[derive(Debug, Clone, Default)]
pub struct ConvexHullAggregator {
    query: ConvexHullQuery,
}

impl Aggregator for ConvexHullAggregator {
    type Output = Geography;

    fn add(&mut self, geography: &Geography) {
        match geography {
            Geography::Point(g) => {
                for point in g.points() {
                    self.query.add_point(*point);
                }
            }
            Geography::Polyline(g) => {
                for polyline in g.polylines() {
                    self.query.add_polyline(polyline);
                }
            }
            Geography::Polygon(g) => self.query.add_polygon(g.polygon()),
            Geography::Collection(g) => {
                for feature in g.features() {
                    self.add(feature);
                }
            }
        }
    }

    fn merge(&mut self, other: Self) {
        self.query.merge(other.query);
    }

    fn finalize(self) -> Self::Output {
        Geography::from_polygon(self.query.hull())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use terrella_types::{Polygon, SpherePoint};

    use super::*;

    fn ll(lat: f64, lng: f64) -> SpherePoint {
        SpherePoint::from_degrees(lat, lng)
    }

    #[test]
    fn centroid_partitions() {
        let geographies = [
            Geography::from_points(vec![ll(0.0, 0.0)]),
            Geography::from_points(vec![ll(0.0, 30.0)]),
            Geography::from_points(vec![]),
            Geography::from_points(vec![ll(30.0, 0.0)]),
        ];

        let mut single = CentroidAggregator::default();
        for geography in &geographies {
            single.add(geography);
        }

        let mut first = CentroidAggregator::default();
        let mut second = CentroidAggregator::default();
        first.add(&geographies[0]);
        second.add(&geographies[1]);
        second.add(&geographies[2]);
        second.add(&geographies[3]);
        first.merge(second);

        let single = single.finalize();
        let merged = first.finalize();
        assert_abs_diff_eq!(single, merged, epsilon = 1e-15);
        assert_abs_diff_eq!(single.norm(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn empty_centroid_is_zero() {
        let mut aggregator = CentroidAggregator::default();
        aggregator.add(&Geography::empty());
        assert_eq!(aggregator.finalize(), Vector3::zeros());
    }

    #[test]
    fn convex_hull() {
        let mut aggregator = ConvexHullAggregator::default();
        aggregator.add(&Geography::from_points(vec![ll(0.0, 0.0), ll(0.0, 10.0)]));

        let mut other = ConvexHullAggregator::default();
        other.add(&Geography::from_features(vec![Geography::from_points(vec![
            ll(10.0, 5.0),
            ll(2.0, 5.0),
        ])]));
        aggregator.merge(other);

        let Geography::Polygon(hull) = aggregator.finalize() else {
            panic!("expected a polygon");
        };
        assert_eq!(hull.polygon().num_loops(), 1);
        assert_eq!(hull.polygon().loops()[0].num_vertices(), 3);
        assert!(hull.polygon().contains(&ll(2.0, 5.0)));

        let empty = ConvexHullAggregator::default().finalize();
        let Geography::Polygon(empty) = empty else {
            panic!("expected a polygon");
        };
        assert_eq!(empty.polygon(), &Polygon::empty());
    }
}
