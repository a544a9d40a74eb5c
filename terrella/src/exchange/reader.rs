use std::fmt::Display;

use geozero::error::{GeozeroError, Result as GeozeroResult};
use geozero::{FeatureProcessor, GeomProcessor, PropertyProcessor};

use crate::handler::{GeometryHandler, GeometryType};

#[derive(Debug, Copy, Clone, PartialEq)]
enum Frame {
    Geometry(GeometryType),
    Ring,
}

/// Adapter feeding the output of any geozero reader into a [`GeometryHandler`].
///
/// geozero processors can only return geozero errors, so an error of the handler is stored and reported to the
/// reader as [`GeozeroError::Geometry`]. It can be retrieved with [`GeozeroReader::take_error`] once the reader
/// returns.
pub struct GeozeroReader<H: GeometryHandler> {
    handler: H,
    open: Vec<Frame>,
    error: Option<H::Error>,
}

impl<H> GeozeroReader<H>
where
    H: GeometryHandler,
    H::Error: Display,
{
    /// Wraps a handler.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            open: vec![],
            error: None,
        }
    }

    /// The wrapped handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The wrapped handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consumes the adapter returning the handler.
    pub fn into_inner(self) -> H {
        self.handler
    }

    /// Error returned by the handler, if there was one.
    pub fn take_error(&mut self) -> Option<H::Error> {
        self.error.take()
    }

    fn emit(
        &mut self,
        f: impl FnOnce(&mut H) -> Result<(), H::Error>,
    ) -> GeozeroResult<()> {
        if let Some(err) = &self.error {
            return Err(GeozeroError::Geometry(err.to_string()));
        }

        f(&mut self.handler).map_err(|err| {
            let message = err.to_string();
            self.error = Some(err);
            GeozeroError::Geometry(message)
        })
    }

    fn begin(&mut self, geometry_type: GeometryType, size: usize) -> GeozeroResult<()> {
        self.open.push(Frame::Geometry(geometry_type));
        self.emit(|h| h.geom_start(geometry_type, size))
    }

    fn end(&mut self) -> GeozeroResult<()> {
        match self.open.pop() {
            Some(Frame::Geometry(_)) => self.emit(|h| h.geom_end()),
            Some(Frame::Ring) => self.emit(|h| h.ring_end()),
            None => Err(GeozeroError::Geometry(
                "geometry end without a start".to_string(),
            )),
        }
    }

    fn in_polygon(&self) -> bool {
        self.open.last() == Some(&Frame::Geometry(GeometryType::Polygon))
    }
}

impl<H> GeomProcessor for GeozeroReader<H>
where
    H: GeometryHandler,
    H::Error: Display,
{
    fn xy(&mut self, x: f64, y: f64, _idx: usize) -> GeozeroResult<()> {
        self.emit(|h| h.coords(&[x, y], 2))
    }

    fn coordinate(
        &mut self,
        x: f64,
        y: f64,
        z: Option<f64>,
        _m: Option<f64>,
        _t: Option<f64>,
        _tm: Option<u64>,
        _idx: usize,
    ) -> GeozeroResult<()> {
        match z {
            Some(z) => self.emit(|h| h.coords(&[x, y, z], 3)),
            None => self.emit(|h| h.coords(&[x, y], 2)),
        }
    }

    fn empty_point(&mut self, _idx: usize) -> GeozeroResult<()> {
        if self.open.last() == Some(&Frame::Geometry(GeometryType::MultiPoint)) {
            return self.emit(|h| h.coords(&[f64::NAN, f64::NAN], 2));
        }

        self.begin(GeometryType::Point, 0)?;
        self.end()
    }

    fn point_begin(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.begin(GeometryType::Point, 1)
    }

    fn point_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.end()
    }

    fn multipoint_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.begin(GeometryType::MultiPoint, size)
    }

    fn multipoint_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.end()
    }

    fn linestring_begin(&mut self, _tagged: bool, size: usize, _idx: usize) -> GeozeroResult<()> {
        if self.in_polygon() {
            self.open.push(Frame::Ring);
            self.emit(|h| h.ring_start(size))
        } else {
            self.begin(GeometryType::LineString, size)
        }
    }

    fn linestring_end(&mut self, _tagged: bool, _idx: usize) -> GeozeroResult<()> {
        self.end()
    }

    fn multilinestring_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.begin(GeometryType::MultiLineString, size)
    }

    fn multilinestring_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.end()
    }

    fn polygon_begin(&mut self, _tagged: bool, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.begin(GeometryType::Polygon, size)
    }

    fn polygon_end(&mut self, _tagged: bool, _idx: usize) -> GeozeroResult<()> {
        self.end()
    }

    fn multipolygon_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.begin(GeometryType::MultiPolygon, size)
    }

    fn multipolygon_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.end()
    }

    fn geometrycollection_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.begin(GeometryType::GeometryCollection, size)
    }

    fn geometrycollection_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.end()
    }
}

impl<H> PropertyProcessor for GeozeroReader<H>
where
    H: GeometryHandler,
    H::Error: Display,
{
}

impl<H> FeatureProcessor for GeozeroReader<H>
where
    H: GeometryHandler,
    H::Error: Display,
{
    fn feature_begin(&mut self, idx: u64) -> GeozeroResult<()> {
        self.open.clear();
        self.emit(|h| h.feat_start(idx as usize))
    }

    fn feature_end(&mut self, idx: u64) -> GeozeroResult<()> {
        self.emit(|h| h.feat_end(idx as usize))
    }
}

#[cfg(test)]
mod tests {
    use geozero::geojson::GeoJson;
    use geozero::GeozeroGeometry;

    use super::*;
    use crate::handler::{Event, EventRecorder};

    fn record(json: &str) -> Vec<Event> {
        let mut reader = GeozeroReader::new(EventRecorder::new());
        GeoJson(json)
            .process_geom(&mut reader)
            .expect("valid geojson");
        reader.into_inner().into_events()
    }

    #[test]
    fn polygon_rings() {
        let events = record(
            r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [0, 1], [0, 0]]]}"#,
        );

        assert_eq!(events[0], Event::GeomStart(GeometryType::Polygon, 1));
        assert_eq!(events[1], Event::RingStart(4));
        assert_eq!(events[events.len() - 2], Event::RingEnd);
        assert_eq!(events[events.len() - 1], Event::GeomEnd);

        let coords: usize = events
            .iter()
            .filter(|e| matches!(e, Event::Coords { .. }))
            .count();
        assert_eq!(coords, 4);
    }

    #[test]
    fn multilinestring_members_are_linestrings() {
        let events = record(
            r#"{"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]], [[2, 2], [3, 3]]]}"#,
        );

        let starts: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::GeomStart(t, _) => Some(*t),
                _ => None,
            })
            .collect();
        assert_eq!(
            starts,
            [
                GeometryType::MultiLineString,
                GeometryType::LineString,
                GeometryType::LineString
            ]
        );
        assert!(!events.iter().any(|e| matches!(e, Event::RingStart(_))));
    }
}
