//! Boolean predicates between [`ShapeIndex`]es under configurable boundary models.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{edge, reference_point, PointLocation, Polygon, Polyline, ShapeIndex, SpherePoint, BOUNDARY_TOLERANCE};

/// Distance by which semi-open boundary points are moved before testing on which side of the boundary they are.
const SEMI_OPEN_NUDGE: f64 = 1e-9;

/// Which boundary points belong to a polygon.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolygonModel {
    /// No boundary point belongs to the polygon.
    Open,
    /// Every boundary point belongs to exactly one of the polygons sharing it.
    #[default]
    SemiOpen,
    /// All boundary points belong to the polygon.
    Closed,
}

/// Which vertices belong to a polyline.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolylineModel {
    /// Neither of the endpoints belongs to the polyline.
    Open,
    /// The first vertex belongs to the polyline, the last one does not.
    SemiOpen,
    /// All vertices belong to the polyline.
    #[default]
    Closed,
}

/// Options of the boolean predicates.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BooleanOptions {
    /// Boundary model of polygons.
    pub polygon_model: PolygonModel,
    /// Boundary model of polylines.
    pub polyline_model: PolylineModel,
    /// If set, all vertices are snapped to the grid of this level before evaluating the predicate.
    pub snap_level: Option<u8>,
}

impl BooleanOptions {
    /// Options with closed boundaries for both polygons and polylines.
    pub fn closed() -> Self {
        Self {
            polygon_model: PolygonModel::Closed,
            polyline_model: PolylineModel::Closed,
            snap_level: None,
        }
    }
}

fn nudge_towards_reference(point: &SpherePoint) -> SpherePoint {
    let reference = reference_point();
    let angle = point.angle(&reference);
    if angle == 0.0 {
        return *point;
    }

    edge::interpolate(point, &reference, SEMI_OPEN_NUDGE / angle)
}

/// Returns true if the point belongs to the polygon under the given model.
pub fn polygon_includes(polygon: &Polygon, point: &SpherePoint, model: PolygonModel) -> bool {
    match polygon.locate(point) {
        PointLocation::Interior => true,
        PointLocation::Exterior => false,
        PointLocation::Boundary => match model {
            PolygonModel::Open => false,
            PolygonModel::Closed => true,
            PolygonModel::SemiOpen => polygon.contains(&nudge_towards_reference(point)),
        },
    }
}

/// Returns true if the point belongs to the polyline under the given model.
pub fn polyline_includes(polyline: &Polyline, point: &SpherePoint, model: PolylineModel) -> bool {
    let (Some(first), Some(last)) = (polyline.vertices().first(), polyline.vertices().last()) else {
        return false;
    };

    let on_line = if polyline.num_vertices() == 1 {
        first.angle(point) <= BOUNDARY_TOLERANCE
    } else {
        polyline
            .edges()
            .any(|(a, b)| edge::distance_to_edge(point, a, b) <= BOUNDARY_TOLERANCE)
    };
    if !on_line || polyline.is_closed() {
        return on_line;
    }

    let at_start = first.angle(point) <= BOUNDARY_TOLERANCE;
    let at_end = last.angle(point) <= BOUNDARY_TOLERANCE;
    match model {
        PolylineModel::Closed => true,
        PolylineModel::SemiOpen => !at_end,
        PolylineModel::Open => !at_start && !at_end,
    }
}

/// Returns true if the point belongs to any shape of the index.
pub fn index_includes(index: &ShapeIndex, point: &SpherePoint, options: &BooleanOptions) -> bool {
    if !index.cap().contains(point) {
        return false;
    }

    index
        .points()
        .iter()
        .any(|p| p.angle(point) <= BOUNDARY_TOLERANCE)
        || index
            .polylines()
            .iter()
            .any(|l| polyline_includes(l, point, options.polyline_model))
        || index
            .polygons()
            .iter()
            .any(|p| polygon_includes(p, point, options.polygon_model))
}

fn prepare<'a>(index: &'a ShapeIndex, options: &BooleanOptions) -> Cow<'a, ShapeIndex> {
    match options.snap_level {
        Some(level) => Cow::Owned(index.snapped(level)),
        None => Cow::Borrowed(index),
    }
}

/// Vertices of the polyline that belong to it under the model, followed by the midpoints of its edges.
fn polyline_samples(polyline: &Polyline, model: PolylineModel) -> Vec<SpherePoint> {
    let n = polyline.num_vertices();
    let closed = polyline.is_closed();
    let mut samples: Vec<SpherePoint> = polyline
        .vertices()
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            closed
                || match model {
                    PolylineModel::Closed => true,
                    PolylineModel::SemiOpen => *i + 1 < n,
                    PolylineModel::Open => *i > 0 && *i + 1 < n,
                }
        })
        .map(|(_, v)| *v)
        .collect();
    samples.extend(polyline.edges().map(|(a, b)| edge::midpoint(a, b)));
    samples
}

fn boundary_samples(polygon: &Polygon) -> Vec<SpherePoint> {
    polygon
        .loops()
        .iter()
        .flat_map(|l| {
            l.vertices()
                .iter()
                .copied()
                .chain(l.edges().map(|(a, b)| edge::midpoint(a, b)))
        })
        .collect()
}

fn interior_samples(polygon: &Polygon) -> Vec<SpherePoint> {
    polygon
        .loops()
        .iter()
        .filter_map(|l| l.interior_probe())
        .collect()
}

fn any_crossing(a: &ShapeIndex, b: &ShapeIndex) -> bool {
    a.edges()
        .any(|(p0, p1)| b.edges().any(|(q0, q1)| edge::crosses(p0, p1, q0, q1)))
}

fn one_way_intersects(a: &ShapeIndex, b: &ShapeIndex, options: &BooleanOptions) -> bool {
    if a.points().iter().any(|p| index_includes(b, p, options)) {
        return true;
    }

    for polyline in a.polylines() {
        if polyline_samples(polyline, options.polyline_model)
            .iter()
            .any(|p| index_includes(b, p, options))
        {
            return true;
        }
    }

    for polygon in a.polygons() {
        let on_both_boundaries = boundary_samples(polygon).iter().any(|p| {
            polygon_includes(polygon, p, options.polygon_model) && index_includes(b, p, options)
        });
        if on_both_boundaries {
            return true;
        }

        let interior_covered = interior_samples(polygon).iter().any(|p| {
            b.polygons()
                .iter()
                .any(|other| other.locate(p) == PointLocation::Interior)
        });
        if interior_covered {
            return true;
        }
    }

    false
}

/// Returns true if the two indexes have at least one common point.
pub fn intersects(a: &ShapeIndex, b: &ShapeIndex, options: &BooleanOptions) -> bool {
    let a = prepare(a, options);
    let b = prepare(b, options);

    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a.has_full_polygon() || b.has_full_polygon() {
        return true;
    }
    if !a.cap().intersects(b.cap()) {
        return false;
    }

    any_crossing(&a, &b) || one_way_intersects(&a, &b, options) || one_way_intersects(&b, &a, options)
}

fn polygon_covers(a: &ShapeIndex, polygon: &Polygon) -> bool {
    if polygon.is_full() {
        return a.has_full_polygon();
    }
    if a.has_full_polygon() {
        return true;
    }

    let outside = |p: &SpherePoint| {
        a.polygons()
            .iter()
            .all(|other| other.locate(p) == PointLocation::Exterior)
    };
    if boundary_samples(polygon).iter().any(outside) {
        return false;
    }

    let crossing = polygon.edges().any(|(p0, p1)| {
        a.polygons()
            .iter()
            .flat_map(Polygon::edges)
            .any(|(q0, q1)| edge::crosses(p0, p1, q0, q1))
    });
    if crossing {
        return false;
    }

    let interior_inside = interior_samples(polygon).iter().all(|p| {
        a.polygons()
            .iter()
            .any(|other| other.locate(p) == PointLocation::Interior)
    });
    if !interior_inside {
        return false;
    }

    // a hole of `a` (or another shell) must not be swallowed by the polygon
    !a.polygons()
        .iter()
        .flat_map(|p| p.loops().iter().flat_map(|l| l.vertices()))
        .any(|v| polygon.locate(v) == PointLocation::Interior)
}

/// Returns true if every point of `b` belongs to `a`.
pub fn contains(a: &ShapeIndex, b: &ShapeIndex, options: &BooleanOptions) -> bool {
    let a = prepare(a, options);
    let b = prepare(b, options);

    if b.is_empty() {
        return true;
    }
    if a.is_empty() {
        return false;
    }

    if !b.points().iter().all(|p| index_includes(&a, p, options)) {
        return false;
    }

    for polyline in b.polylines() {
        let samples_inside = polyline_samples(polyline, PolylineModel::Closed)
            .iter()
            .all(|p| index_includes(&a, p, options));
        if !samples_inside {
            return false;
        }

        let leaves_polygon = polyline.edges().any(|(p0, p1)| {
            a.polygons()
                .iter()
                .flat_map(Polygon::edges)
                .any(|(q0, q1)| edge::crosses(p0, p1, q0, q1))
        });
        if leaves_polygon {
            return false;
        }
    }

    b.polygons()
        .iter()
        .filter(|p| !p.is_empty())
        .all(|polygon| polygon_covers(&a, polygon))
}

/// Returns true if the two indexes cover the same set of points.
pub fn equals(a: &ShapeIndex, b: &ShapeIndex, options: &BooleanOptions) -> bool {
    contains(a, b, options) && contains(b, a, options)
}
