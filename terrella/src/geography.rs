//! The in-memory geography model.

use std::sync::OnceLock;

use terrella_types::{Polygon, Polyline, ShapeIndex, SpherePoint};

/// Immutable geometry on the unit sphere.
///
/// Every variant lazily builds a [`ShapeIndex`] the first time a predicate or a distance query needs it. The index is
/// owned by the geography and dropped together with it.
#[derive(Debug, Clone)]
pub enum Geography {
    /// Zero or more points.
    Point(PointGeography),
    /// Zero or more polylines.
    Polyline(PolylineGeography),
    /// A single polygon with any number of loops.
    Polygon(PolygonGeography),
    /// Ordered list of child geographies of any kind.
    Collection(CollectionGeography),
}

/// Zero or more points.
#[derive(Debug, Clone, Default)]
pub struct PointGeography {
    points: Vec<SpherePoint>,
    index: OnceLock<ShapeIndex>,
}

impl PointGeography {
    /// Creates a geography from a list of points.
    pub fn new(points: Vec<SpherePoint>) -> Self {
        Self {
            points,
            index: OnceLock::new(),
        }
    }

    /// Points of the geography.
    pub fn points(&self) -> &[SpherePoint] {
        &self.points
    }
}

/// Zero or more polylines.
#[derive(Debug, Clone, Default)]
pub struct PolylineGeography {
    polylines: Vec<Polyline>,
    index: OnceLock<ShapeIndex>,
}

impl PolylineGeography {
    /// Creates a geography from a list of polylines.
    pub fn new(polylines: Vec<Polyline>) -> Self {
        Self {
            polylines,
            index: OnceLock::new(),
        }
    }

    /// Polylines of the geography.
    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }
}

/// A single polygon.
#[derive(Debug, Clone, Default)]
pub struct PolygonGeography {
    polygon: Polygon,
    index: OnceLock<ShapeIndex>,
}

impl PolygonGeography {
    /// Wraps a polygon.
    pub fn new(polygon: Polygon) -> Self {
        Self {
            polygon,
            index: OnceLock::new(),
        }
    }

    /// The polygon.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }
}

/// Ordered list of child geographies. The collection owns its children.
#[derive(Debug, Clone, Default)]
pub struct CollectionGeography {
    features: Vec<Geography>,
    index: OnceLock<ShapeIndex>,
}

impl CollectionGeography {
    /// Creates a collection from its children.
    pub fn new(features: Vec<Geography>) -> Self {
        Self {
            features,
            index: OnceLock::new(),
        }
    }

    /// Children of the collection.
    pub fn features(&self) -> &[Geography] {
        &self.features
    }

    /// Consumes the collection returning its children.
    pub fn into_features(self) -> Vec<Geography> {
        self.features
    }
}

impl Geography {
    /// Point geography from a list of points.
    pub fn from_points(points: Vec<SpherePoint>) -> Self {
        Self::Point(PointGeography::new(points))
    }

    /// Polyline geography from a list of polylines.
    pub fn from_polylines(polylines: Vec<Polyline>) -> Self {
        Self::Polyline(PolylineGeography::new(polylines))
    }

    /// Polygon geography.
    pub fn from_polygon(polygon: Polygon) -> Self {
        Self::Polygon(PolygonGeography::new(polygon))
    }

    /// Collection of geographies.
    pub fn from_features(features: Vec<Geography>) -> Self {
        Self::Collection(CollectionGeography::new(features))
    }

    /// Empty collection.
    pub fn empty() -> Self {
        Self::from_features(vec![])
    }

    /// Name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Polyline(_) => "polyline",
            Self::Polygon(_) => "polygon",
            Self::Collection(_) => "collection",
        }
    }

    /// Shape index of the geography, built on first access.
    pub fn shape_index(&self) -> &ShapeIndex {
        match self {
            Self::Point(g) => g
                .index
                .get_or_init(|| ShapeIndex::new(g.points.clone(), vec![], vec![])),
            Self::Polyline(g) => g
                .index
                .get_or_init(|| ShapeIndex::new(vec![], g.polylines.clone(), vec![])),
            Self::Polygon(g) => g
                .index
                .get_or_init(|| ShapeIndex::from_polygon(g.polygon.clone())),
            Self::Collection(g) => g.index.get_or_init(|| {
                let mut points = vec![];
                let mut polylines = vec![];
                let mut polygons = vec![];
                collect_shapes(&g.features, &mut points, &mut polylines, &mut polygons);
                ShapeIndex::new(points, polylines, polygons)
            }),
        }
    }
}

fn collect_shapes(
    features: &[Geography],
    points: &mut Vec<SpherePoint>,
    polylines: &mut Vec<Polyline>,
    polygons: &mut Vec<Polygon>,
) {
    for feature in features {
        match feature {
            Geography::Point(g) => points.extend_from_slice(&g.points),
            Geography::Polyline(g) => polylines.extend_from_slice(&g.polylines),
            Geography::Polygon(g) => polygons.push(g.polygon.clone()),
            Geography::Collection(g) => collect_shapes(&g.features, points, polylines, polygons),
        }
    }
}

impl From<PointGeography> for Geography {
    fn from(value: PointGeography) -> Self {
        Self::Point(value)
    }
}

impl From<PolylineGeography> for Geography {
    fn from(value: PolylineGeography) -> Self {
        Self::Polyline(value)
    }
}

impl From<PolygonGeography> for Geography {
    fn from(value: PolygonGeography) -> Self {
        Self::Polygon(value)
    }
}

impl From<CollectionGeography> for Geography {
    fn from(value: CollectionGeography) -> Self {
        Self::Collection(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_index_flattens_children() {
        let geography = Geography::from_features(vec![
            Geography::from_points(vec![SpherePoint::from_degrees(0.0, 0.0)]),
            Geography::from_features(vec![Geography::from_polylines(vec![Polyline::new(vec![
                SpherePoint::from_degrees(0.0, 0.0),
                SpherePoint::from_degrees(1.0, 1.0),
            ])])]),
        ]);

        let index = geography.shape_index();
        assert_eq!(index.points().len(), 1);
        assert_eq!(index.polylines().len(), 1);
        assert!(std::ptr::eq(index, geography.shape_index()));
    }
}
