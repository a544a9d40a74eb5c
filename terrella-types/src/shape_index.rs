use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::snap::snap_to_level;
use crate::{Loop, Polygon, Polyline, SpherePoint, BOUNDARY_TOLERANCE};

/// A spherical cap: all points within `radius` radians of `center`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cap {
    center: SpherePoint,
    radius: f64,
}

impl Cap {
    /// Cap containing nothing.
    pub fn empty() -> Self {
        Self {
            center: SpherePoint::new(1.0, 0.0, 0.0),
            radius: -1.0,
        }
    }

    /// Cap containing the whole sphere.
    pub fn full() -> Self {
        Self {
            center: SpherePoint::new(1.0, 0.0, 0.0),
            radius: PI,
        }
    }

    /// Creates a cap from its center and angular radius.
    pub fn new(center: SpherePoint, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Center of the cap.
    pub fn center(&self) -> &SpherePoint {
        &self.center
    }

    /// Angular radius, negative for an empty cap.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns true if the cap contains nothing.
    pub fn is_empty(&self) -> bool {
        self.radius < 0.0
    }

    /// Returns true if the cap covers the whole sphere.
    pub fn is_full(&self) -> bool {
        self.radius >= PI
    }

    /// Returns true if the point is within the cap.
    pub fn contains(&self, point: &SpherePoint) -> bool {
        !self.is_empty() && (self.is_full() || self.center.angle(point) <= self.radius + BOUNDARY_TOLERANCE)
    }

    /// Returns true if the caps share at least one point (within the boundary tolerance).
    pub fn intersects(&self, other: &Cap) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.center.angle(&other.center) <= self.radius + other.radius + BOUNDARY_TOLERANCE
    }
}

/// Set of points, polylines and polygons queried as a whole.
///
/// The index does not perform any spatial partitioning: queries visit every edge. It only keeps a bounding cap to
/// reject distant geometries early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeIndex {
    points: Vec<SpherePoint>,
    polylines: Vec<Polyline>,
    polygons: Vec<Polygon>,
    cap: Cap,
}

impl ShapeIndex {
    /// Creates an index over the given shapes.
    pub fn new(points: Vec<SpherePoint>, polylines: Vec<Polyline>, polygons: Vec<Polygon>) -> Self {
        let cap = bounding_cap(&points, &polylines, &polygons);
        Self {
            points,
            polylines,
            polygons,
            cap,
        }
    }

    /// Index of a single polygon.
    pub fn from_polygon(polygon: Polygon) -> Self {
        Self::new(vec![], vec![], vec![polygon])
    }

    /// Indexed points.
    pub fn points(&self) -> &[SpherePoint] {
        &self.points
    }

    /// Indexed polylines.
    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    /// Indexed polygons.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Bounding cap of all shapes.
    pub fn cap(&self) -> &Cap {
        &self.cap
    }

    /// Returns true if the index covers no point of the sphere.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
            && self.polylines.iter().all(Polyline::is_empty)
            && self.polygons.iter().all(Polygon::is_empty)
    }

    /// Returns true if one of the polygons covers the whole sphere.
    pub fn has_full_polygon(&self) -> bool {
        self.polygons.iter().any(Polygon::is_full)
    }

    /// Edges of all polylines and polygon loops.
    pub fn edges(&self) -> impl Iterator<Item = (&SpherePoint, &SpherePoint)> + '_ {
        self.polylines
            .iter()
            .flat_map(Polyline::edges)
            .chain(self.polygons.iter().flat_map(Polygon::edges))
    }

    /// Points and single-vertex polylines: shapes that have no edges.
    pub fn isolated_points(&self) -> impl Iterator<Item = &SpherePoint> + '_ {
        self.points.iter().chain(
            self.polylines
                .iter()
                .filter(|l| l.num_vertices() == 1)
                .flat_map(Polyline::vertices),
        )
    }

    /// Every vertex of every shape.
    pub fn vertices(&self) -> impl Iterator<Item = &SpherePoint> + '_ {
        self.points
            .iter()
            .chain(self.polylines.iter().flat_map(Polyline::vertices))
            .chain(
                self.polygons
                    .iter()
                    .flat_map(|p| p.loops().iter().flat_map(Loop::vertices)),
            )
    }

    /// Copy of the index with every vertex snapped to the grid of the given level.
    ///
    /// Consecutive vertices that become identical are merged, and loops reduced below three vertices are dropped.
    pub fn snapped(&self, level: u8) -> Self {
        let snap_chain = |vertices: &[SpherePoint]| -> Vec<SpherePoint> {
            let mut out: Vec<SpherePoint> = Vec::with_capacity(vertices.len());
            for v in vertices {
                let snapped = snap_to_level(v, level);
                if out.last() != Some(&snapped) {
                    out.push(snapped);
                }
            }
            out
        };

        let points = self.points.iter().map(|p| snap_to_level(p, level)).collect();
        let polylines = self
            .polylines
            .iter()
            .map(|l| Polyline::new(snap_chain(l.vertices())))
            .collect();
        let polygons = self
            .polygons
            .iter()
            .map(|polygon| {
                if polygon.is_full() {
                    return Polygon::full();
                }

                let loops = polygon
                    .loops()
                    .iter()
                    .filter_map(|l| {
                        let mut vertices = snap_chain(l.vertices());
                        if vertices.len() > 1 && vertices.first() == vertices.last() {
                            vertices.pop();
                        }
                        (vertices.len() >= 3).then(|| Loop::new(vertices))
                    })
                    .collect();
                Polygon::init_oriented(loops)
            })
            .collect();

        Self::new(points, polylines, polygons)
    }

    /// Copy of the index with every shape replaced by its antipodal image.
    pub fn antipodal(&self) -> Self {
        let negate = |vertices: &[SpherePoint]| -> Vec<SpherePoint> { vertices.iter().map(|v| -*v).collect() };

        let points = negate(&self.points);
        let polylines = self
            .polylines
            .iter()
            .map(|l| Polyline::new(negate(l.vertices())))
            .collect();
        let polygons = self
            .polygons
            .iter()
            .map(|polygon| {
                if polygon.is_full() {
                    return Polygon::full();
                }

                // reflection through the center flips the winding, reversing restores the region side
                let loops = polygon
                    .loops()
                    .iter()
                    .map(|l| {
                        let mut vertices = negate(l.vertices());
                        vertices.reverse();
                        Loop::new(vertices)
                    })
                    .collect();
                Polygon::init_oriented(loops)
            })
            .collect();

        Self::new(points, polylines, polygons)
    }
}

impl Default for ShapeIndex {
    fn default() -> Self {
        Self::new(vec![], vec![], vec![])
    }
}

fn bounding_cap(points: &[SpherePoint], polylines: &[Polyline], polygons: &[Polygon]) -> Cap {
    if polygons.iter().any(|p| p.area() > 2.0 * PI) {
        return Cap::full();
    }

    let vertices: Vec<&SpherePoint> = points
        .iter()
        .chain(polylines.iter().flat_map(Polyline::vertices))
        .chain(
            polygons
                .iter()
                .flat_map(|p| p.loops().iter().flat_map(Loop::vertices)),
        )
        .collect();
    if vertices.is_empty() {
        return Cap::empty();
    }

    let sum = vertices
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, v| acc + v.vector());
    if sum.norm() == 0.0 {
        return Cap::full();
    }

    let center = SpherePoint::from_vector(sum).normalize();
    let radius = vertices
        .iter()
        .map(|v| center.angle(v))
        .fold(0.0, f64::max);

    // edges between vertices bulge away from the center at most by a hemisphere
    if radius >= PI / 2.0 {
        Cap::full()
    } else {
        Cap::new(center, radius)
    }
}
