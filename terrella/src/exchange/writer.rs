use geozero::error::GeozeroError;
use geozero::FeatureProcessor;

use crate::handler::{GeometryHandler, GeometryType};

#[derive(Debug)]
struct Frame {
    geometry_type: GeometryType,
    idx: usize,
    tagged: bool,
    children: usize,
    coords: usize,
    started: bool,
}

/// Adapter translating geometry events into calls of a geozero processor, such as
/// [`GeoJsonWriter`](geozero::geojson::GeoJsonWriter).
///
/// Features are written with empty properties.
#[derive(Debug)]
pub struct GeozeroWriter<P: FeatureProcessor> {
    processor: P,
    open: Vec<Frame>,
    ring: Option<(usize, usize)>,
}

impl<P: FeatureProcessor> GeozeroWriter<P> {
    /// Wraps a processor.
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            open: vec![],
            ring: None,
        }
    }

    /// The wrapped processor.
    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    /// Consumes the adapter returning the processor.
    pub fn into_inner(self) -> P {
        self.processor
    }

    fn malformed(message: &str) -> GeozeroError {
        GeozeroError::Geometry(message.to_string())
    }
}

impl<P: FeatureProcessor> GeometryHandler for GeozeroWriter<P> {
    type Error = GeozeroError;

    fn feat_start(&mut self, id: usize) -> Result<(), Self::Error> {
        self.open.clear();
        self.processor.feature_begin(id as u64)?;
        self.processor.properties_begin()?;
        self.processor.properties_end()?;
        self.processor.geometry_begin()
    }

    fn feat_end(&mut self, id: usize) -> Result<(), Self::Error> {
        self.processor.geometry_end()?;
        self.processor.feature_end(id as u64)
    }

    fn geom_start(&mut self, geometry_type: GeometryType, size: usize) -> Result<(), Self::Error> {
        let (idx, tagged) = match self.open.last_mut() {
            Some(parent) => {
                parent.children += 1;
                (
                    parent.children - 1,
                    parent.geometry_type == GeometryType::GeometryCollection,
                )
            }
            None => (0, true),
        };

        // points are started by their first coordinate, an empty point has none
        let started = geometry_type != GeometryType::Point;
        let p = &mut self.processor;
        match geometry_type {
            GeometryType::Point => {}
            GeometryType::MultiPoint => p.multipoint_begin(size, idx)?,
            GeometryType::LineString => p.linestring_begin(tagged, size, idx)?,
            GeometryType::MultiLineString => p.multilinestring_begin(size, idx)?,
            GeometryType::Polygon => p.polygon_begin(tagged, size, idx)?,
            GeometryType::MultiPolygon => p.multipolygon_begin(size, idx)?,
            GeometryType::GeometryCollection => p.geometrycollection_begin(size, idx)?,
        }

        self.open.push(Frame {
            geometry_type,
            idx,
            tagged,
            children: 0,
            coords: 0,
            started,
        });
        Ok(())
    }

    fn geom_end(&mut self) -> Result<(), Self::Error> {
        let frame = self
            .open
            .pop()
            .ok_or_else(|| Self::malformed("geometry end without a start"))?;
        let Frame {
            geometry_type,
            idx,
            tagged,
            started,
            ..
        } = frame;

        let p = &mut self.processor;
        match geometry_type {
            GeometryType::Point if started => p.point_end(idx),
            GeometryType::Point => p.empty_point(idx),
            GeometryType::MultiPoint => p.multipoint_end(idx),
            GeometryType::LineString => p.linestring_end(tagged, idx),
            GeometryType::MultiLineString => p.multilinestring_end(idx),
            GeometryType::Polygon => p.polygon_end(tagged, idx),
            GeometryType::MultiPolygon => p.multipolygon_end(idx),
            GeometryType::GeometryCollection => p.geometrycollection_end(idx),
        }
    }

    fn ring_start(&mut self, size: usize) -> Result<(), Self::Error> {
        let parent = self
            .open
            .last_mut()
            .filter(|f| f.geometry_type == GeometryType::Polygon)
            .ok_or_else(|| Self::malformed("ring outside of a polygon"))?;
        let idx = parent.children;
        parent.children += 1;

        self.ring = Some((idx, 0));
        self.processor.linestring_begin(false, size, idx)
    }

    fn ring_end(&mut self) -> Result<(), Self::Error> {
        let (idx, _) = self
            .ring
            .take()
            .ok_or_else(|| Self::malformed("ring end without a start"))?;
        self.processor.linestring_end(false, idx)
    }

    fn coords(&mut self, coords: &[f64], dims: usize) -> Result<(), Self::Error> {
        if dims < 2 || coords.len() % dims != 0 {
            return Err(Self::malformed("invalid coordinate buffer"));
        }

        let counter = match (&mut self.ring, self.open.last_mut()) {
            (Some((_, count)), _) => count,
            (None, Some(frame)) => {
                if !frame.started {
                    self.processor.point_begin(frame.idx)?;
                    frame.started = true;
                }
                &mut frame.coords
            }
            (None, None) => return Err(Self::malformed("coordinates outside of a geometry")),
        };

        for tuple in coords.chunks_exact(dims) {
            if dims > 2 {
                self.processor.coordinate(
                    tuple[0],
                    tuple[1],
                    Some(tuple[2]),
                    None,
                    None,
                    None,
                    *counter,
                )?;
            } else {
                self.processor.xy(tuple[0], tuple[1], *counter)?;
            }
            *counter += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use geozero::geojson::GeoJsonWriter;

    use super::*;
    use crate::handler::{replay, Event};

    fn write(events: &[Event]) -> String {
        let mut out = Vec::new();
        let mut writer = GeozeroWriter::new(GeoJsonWriter::new(&mut out));
        replay(events, &mut writer).expect("valid events");
        drop(writer);
        String::from_utf8(out).expect("utf8 output")
    }

    fn parse(json: &str) -> serde_json::Value {
        serde_json::from_str(json).expect("valid json")
    }

    #[test]
    fn point() {
        let json = write(&[
            Event::GeomStart(GeometryType::Point, 1),
            Event::Coords {
                coords: vec![1.0, 2.0],
                dims: 2,
            },
            Event::GeomEnd,
        ]);
        assert_eq!(
            parse(&json),
            parse(r#"{"type": "Point", "coordinates": [1, 2]}"#)
        );
    }

    #[test]
    fn polygon() {
        let json = write(&[
            Event::GeomStart(GeometryType::Polygon, 1),
            Event::RingStart(4),
            Event::Coords {
                coords: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
                dims: 2,
            },
            Event::RingEnd,
            Event::GeomEnd,
        ]);
        assert_eq!(
            parse(&json),
            parse(r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [0, 1], [0, 0]]]}"#)
        );
    }

    #[test]
    fn collection() {
        let json = write(&[
            Event::GeomStart(GeometryType::GeometryCollection, 2),
            Event::GeomStart(GeometryType::Point, 1),
            Event::Coords {
                coords: vec![0.0, 0.0],
                dims: 2,
            },
            Event::GeomEnd,
            Event::GeomStart(GeometryType::LineString, 2),
            Event::Coords {
                coords: vec![0.0, 0.0, 1.0, 1.0],
                dims: 2,
            },
            Event::GeomEnd,
            Event::GeomEnd,
        ]);
        assert_eq!(
            parse(&json),
            parse(
                r#"{"type": "GeometryCollection", "geometries": [
                    {"type": "Point", "coordinates": [0, 0]},
                    {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}
                ]}"#
            )
        );
    }
}
