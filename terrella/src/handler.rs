//! Geometry event vocabulary shared by the constructors, the exporter and format adapters.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

/// Type of the geometry reported by [`GeometryHandler::geom_start`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    /// Single point.
    Point,
    /// Set of points.
    MultiPoint,
    /// Single chain of edges.
    LineString,
    /// Set of chains.
    MultiLineString,
    /// Single polygon: a list of rings.
    Polygon,
    /// Set of polygons.
    MultiPolygon,
    /// Heterogeneous list of geometries.
    GeometryCollection,
}

impl GeometryType {
    /// Returns true for point and multipoint.
    pub fn is_point_like(&self) -> bool {
        matches!(self, Self::Point | Self::MultiPoint)
    }

    /// Returns true for linestring and multilinestring.
    pub fn is_line_like(&self) -> bool {
        matches!(self, Self::LineString | Self::MultiLineString)
    }

    /// Returns true for polygon and multipolygon.
    pub fn is_polygon_like(&self) -> bool {
        matches!(self, Self::Polygon | Self::MultiPolygon)
    }
}

/// Receiver of a well nested stream of geometry events.
///
/// A stream for one feature looks like this:
///
/// ```text
/// feat_start
///   geom_start(type, size)
///     [ring_start(size) coords* ring_end]*   (polygons)
///     coords*                                (points and linestrings)
///     [geom_start ... geom_end]*             (multi geometries and collections)
///   geom_end
/// feat_end
/// ```
///
/// `size` arguments are hints of the number of children and may be zero. Coordinates are passed as a flat buffer of
/// `dims` values per tuple.
pub trait GeometryHandler {
    /// Error returned by the handler.
    type Error;

    /// Start of a feature.
    fn feat_start(&mut self, _id: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    /// End of a feature.
    fn feat_end(&mut self, _id: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Start of a geometry.
    fn geom_start(&mut self, geometry_type: GeometryType, size: usize) -> Result<(), Self::Error>;

    /// End of the geometry started last.
    fn geom_end(&mut self) -> Result<(), Self::Error>;

    /// Start of a polygon ring.
    fn ring_start(&mut self, size: usize) -> Result<(), Self::Error>;

    /// End of a polygon ring.
    fn ring_end(&mut self) -> Result<(), Self::Error>;

    /// A batch of coordinate tuples.
    fn coords(&mut self, coords: &[f64], dims: usize) -> Result<(), Self::Error>;
}

/// A single recorded call of a [`GeometryHandler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// [`GeometryHandler::feat_start`]
    FeatStart(usize),
    /// [`GeometryHandler::feat_end`]
    FeatEnd(usize),
    /// [`GeometryHandler::geom_start`]
    GeomStart(GeometryType, usize),
    /// [`GeometryHandler::geom_end`]
    GeomEnd,
    /// [`GeometryHandler::ring_start`]
    RingStart(usize),
    /// [`GeometryHandler::ring_end`]
    RingEnd,
    /// [`GeometryHandler::coords`]
    Coords {
        /// Flat coordinate buffer.
        coords: Vec<f64>,
        /// Number of values per tuple.
        dims: usize,
    },
}

/// Handler that stores every event it receives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventRecorder {
    events: Vec<Event>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consumes the recorder returning the events.
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl GeometryHandler for EventRecorder {
    type Error = Infallible;

    fn feat_start(&mut self, id: usize) -> Result<(), Self::Error> {
        self.events.push(Event::FeatStart(id));
        Ok(())
    }

    fn feat_end(&mut self, id: usize) -> Result<(), Self::Error> {
        self.events.push(Event::FeatEnd(id));
        Ok(())
    }

    fn geom_start(&mut self, geometry_type: GeometryType, size: usize) -> Result<(), Self::Error> {
        self.events.push(Event::GeomStart(geometry_type, size));
        Ok(())
    }

    fn geom_end(&mut self) -> Result<(), Self::Error> {
        self.events.push(Event::GeomEnd);
        Ok(())
    }

    fn ring_start(&mut self, size: usize) -> Result<(), Self::Error> {
        self.events.push(Event::RingStart(size));
        Ok(())
    }

    fn ring_end(&mut self) -> Result<(), Self::Error> {
        self.events.push(Event::RingEnd);
        Ok(())
    }

    fn coords(&mut self, coords: &[f64], dims: usize) -> Result<(), Self::Error> {
        self.events.push(Event::Coords {
            coords: coords.to_vec(),
            dims,
        });
        Ok(())
    }
}

/// Sends recorded events to a handler in order.
pub fn replay<'a, H: GeometryHandler>(
    events: impl IntoIterator<Item = &'a Event>,
    handler: &mut H,
) -> Result<(), H::Error> {
    for event in events {
        match event {
            Event::FeatStart(id) => handler.feat_start(*id)?,
            Event::FeatEnd(id) => handler.feat_end(*id)?,
            Event::GeomStart(geometry_type, size) => handler.geom_start(*geometry_type, *size)?,
            Event::GeomEnd => handler.geom_end()?,
            Event::RingStart(size) => handler.ring_start(*size)?,
            Event::RingEnd => handler.ring_end()?,
            Event::Coords { coords, dims } => handler.coords(coords, *dims)?,
        }
    }

    Ok(())
}
