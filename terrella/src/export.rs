//! Replaying geographies as geometry event streams.

use std::sync::Arc;

use terrella_types::geo::{PlateCarree, Projection, SphereProjection};
use terrella_types::{Loop, SpherePoint};

use crate::handler::{Event, EventRecorder, GeometryHandler, GeometryType};
use crate::Geography;

/// Sends the events describing a geography to a [`GeometryHandler`].
///
/// The produced stream is accepted by [`FeatureConstructor`](crate::FeatureConstructor) configured with the same
/// projection, so export followed by construction reproduces the geography. Rings are closed by repeating their first
/// vertex.
///
/// | Geography                       | Events                                   |
/// |---------------------------------|------------------------------------------|
/// | point with 0 or 1 points        | `Point`                                  |
/// | point with more points          | `MultiPoint` with a single coordinate batch |
/// | polyline with 0 or 1 polylines  | `LineString`                             |
/// | polyline with more polylines    | `MultiLineString` of `LineString`s       |
/// | polygon with 0 or 1 shells      | `Polygon`                                |
/// | polygon with more shells        | `MultiPolygon` of `Polygon`s             |
/// | collection                      | `GeometryCollection` of the children     |
#[derive(Debug, Clone)]
pub struct Exporter {
    projection: Option<Arc<dyn SphereProjection>>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self {
            projection: Some(Arc::new(PlateCarree::default())),
        }
    }
}

impl Exporter {
    /// Exporter writing longitude and latitude in degrees.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the projection of the output coordinates.
    pub fn with_projection(mut self, projection: impl SphereProjection + 'static) -> Self {
        self.projection = Some(Arc::new(projection));
        self
    }

    /// Outputs geocentric `x, y, z` coordinates.
    pub fn without_projection(mut self) -> Self {
        self.projection = None;
        self
    }

    /// Number of values in every exported coordinate tuple.
    pub fn dims(&self) -> usize {
        if self.projection.is_some() {
            2
        } else {
            3
        }
    }

    /// Exports one feature: the geography wrapped into `feat_start` and `feat_end`.
    pub fn export_feature<H: GeometryHandler>(
        &self,
        id: usize,
        geography: &Geography,
        handler: &mut H,
    ) -> Result<(), H::Error> {
        handler.feat_start(id)?;
        self.export(geography, handler)?;
        handler.feat_end(id)
    }

    /// Exports the geometry events of the geography.
    pub fn export<H: GeometryHandler>(
        &self,
        geography: &Geography,
        handler: &mut H,
    ) -> Result<(), H::Error> {
        // one iterator per open collection, the length of the stack is the nesting depth
        let mut open = vec![];
        if let Some(children) = self.export_node(geography, handler)? {
            open.push(children);
        }

        while let Some(children) = open.last_mut() {
            match children.next() {
                Some(child) => {
                    if let Some(grandchildren) = self.export_node(child, handler)? {
                        open.push(grandchildren);
                    }
                }
                None => {
                    open.pop();
                    handler.geom_end()?;
                }
            }
        }

        Ok(())
    }

    /// Records the events of the geography.
    pub fn to_events(&self, geography: &Geography) -> Vec<Event> {
        let mut recorder = EventRecorder::new();
        self.export(geography, &mut recorder)
            .unwrap_or_else(|never| match never {});
        recorder.into_events()
    }

    /// Exports a non-collection geography completely. For a collection only `geom_start` is sent and the iterator
    /// over its children is returned.
    fn export_node<'a, H: GeometryHandler>(
        &self,
        geography: &'a Geography,
        handler: &mut H,
    ) -> Result<Option<std::slice::Iter<'a, Geography>>, H::Error> {
        match geography {
            Geography::Point(g) => self.export_points(g.points(), handler)?,
            Geography::Polyline(g) => {
                let polylines = g.polylines();
                if polylines.len() > 1 {
                    handler.geom_start(GeometryType::MultiLineString, polylines.len())?;
                    for polyline in polylines {
                        self.export_chain(GeometryType::LineString, polyline.vertices(), handler)?;
                    }
                    handler.geom_end()?;
                } else {
                    let vertices = polylines.first().map_or(&[][..], |p| p.vertices());
                    self.export_chain(GeometryType::LineString, vertices, handler)?;
                }
            }
            Geography::Polygon(g) => {
                let parts = g.polygon().parts();
                if parts.len() > 1 {
                    handler.geom_start(GeometryType::MultiPolygon, parts.len())?;
                    for loops in parts {
                        self.export_rings(loops, handler)?;
                    }
                    handler.geom_end()?;
                } else {
                    self.export_rings(parts.first().copied().unwrap_or_default(), handler)?;
                }
            }
            Geography::Collection(g) => {
                handler.geom_start(GeometryType::GeometryCollection, g.features().len())?;
                return Ok(Some(g.features().iter()));
            }
        }

        Ok(None)
    }

    fn export_points<H: GeometryHandler>(
        &self,
        points: &[SpherePoint],
        handler: &mut H,
    ) -> Result<(), H::Error> {
        let geometry_type = if points.len() > 1 {
            GeometryType::MultiPoint
        } else {
            GeometryType::Point
        };

        self.export_chain(geometry_type, points, handler)
    }

    fn export_chain<H: GeometryHandler>(
        &self,
        geometry_type: GeometryType,
        vertices: &[SpherePoint],
        handler: &mut H,
    ) -> Result<(), H::Error> {
        handler.geom_start(geometry_type, vertices.len())?;
        if !vertices.is_empty() {
            handler.coords(&self.coords(vertices), self.dims())?;
        }
        handler.geom_end()
    }

    fn export_rings<H: GeometryHandler>(
        &self,
        loops: &[Loop],
        handler: &mut H,
    ) -> Result<(), H::Error> {
        handler.geom_start(GeometryType::Polygon, loops.len())?;
        for l in loops {
            let ring = l.closed_ring();
            handler.ring_start(ring.len())?;
            handler.coords(&self.coords(&ring), self.dims())?;
            handler.ring_end()?;
        }
        handler.geom_end()
    }

    fn coords(&self, points: &[SpherePoint]) -> Vec<f64> {
        let mut coords = Vec::with_capacity(points.len() * self.dims());
        for point in points {
            match &self.projection {
                Some(projection) => {
                    let projected = projection.project(point);
                    coords.extend(projected.map_or([f64::NAN; 2], |p| p.coords()));
                }
                None => coords.extend([point.x(), point.y(), point.z()]),
            }
        }

        coords
    }
}
