use terrella_types::{Loop, Polygon};

use super::{Constructor, ConstructorOptions, VertexBuffer};
use crate::error::ConstructionError;
use crate::handler::{GeometryHandler, GeometryType};
use crate::Geography;

/// Builds [`Geography::Polygon`] from polygon and multipolygon geometries.
///
/// All rings of all polygons received before [`Constructor::finish`] end up as loops of a single polygon. In nested
/// mode the nesting of the loops decides which of them are holes, so the rings of a multipolygon can be given in
/// any order.
#[derive(Debug, Clone, Default)]
pub struct PolygonConstructor {
    options: ConstructorOptions,
    buffer: VertexBuffer,
    in_ring: bool,
    loops: Vec<Loop>,
}

impl PolygonConstructor {
    /// Creates a new constructor.
    pub fn new(options: ConstructorOptions) -> Self {
        Self {
            options,
            buffer: VertexBuffer::default(),
            in_ring: false,
            loops: vec![],
        }
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.in_ring = false;
        self.loops.clear();
    }
}

impl GeometryHandler for PolygonConstructor {
    type Error = ConstructionError;

    fn geom_start(&mut self, geometry_type: GeometryType, size: usize) -> Result<(), Self::Error> {
        if self.in_ring {
            return Err(ConstructionError::MalformedStream(
                "geometry started inside a ring",
            ));
        }

        if size != 0
            && !geometry_type.is_polygon_like()
            && geometry_type != GeometryType::GeometryCollection
        {
            return Err(ConstructionError::UnexpectedGeometry(geometry_type));
        }

        Ok(())
    }

    fn geom_end(&mut self) -> Result<(), Self::Error> {
        if self.in_ring {
            return Err(ConstructionError::MalformedStream(
                "geometry ended inside a ring",
            ));
        }

        Ok(())
    }

    fn ring_start(&mut self, _size: usize) -> Result<(), Self::Error> {
        if self.in_ring {
            return Err(ConstructionError::MalformedStream("nested ring"));
        }

        self.in_ring = true;
        self.buffer.clear();
        Ok(())
    }

    fn ring_end(&mut self) -> Result<(), Self::Error> {
        if !self.in_ring {
            return Err(ConstructionError::MalformedStream(
                "ring ended without being started",
            ));
        }
        self.in_ring = false;

        let mut vertices = self.buffer.finalize(&self.options)?;
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        if vertices.windows(2).all(|w| w[0] == w[1]) {
            log::debug!("Dropping degenerate ring with {} vertices", vertices.len());
            return Ok(());
        }

        let mut l = Loop::new(vertices);
        if !self.options.oriented() {
            l.normalize();
        }

        if self.options.check() {
            l.validate().map_err(|reason| ConstructionError::InvalidLoop {
                index: self.loops.len(),
                reason,
            })?;
        }

        self.loops.push(l);
        Ok(())
    }

    fn coords(&mut self, coords: &[f64], dims: usize) -> Result<(), Self::Error> {
        if !self.in_ring {
            return Err(ConstructionError::MalformedStream(
                "polygon coordinates outside of a ring",
            ));
        }

        self.buffer.push(coords, dims)
    }
}

impl Constructor for PolygonConstructor {
    fn finish(&mut self) -> Result<Geography, ConstructionError> {
        if self.in_ring {
            self.reset();
            return Err(ConstructionError::MalformedStream("unterminated ring"));
        }

        let loops = std::mem::take(&mut self.loops);
        let polygon = if self.options.oriented() {
            Polygon::init_oriented(loops)
        } else {
            Polygon::init_nested(loops)
        };

        if self.options.check() {
            polygon
                .validate()
                .map_err(ConstructionError::InvalidPolygon)?;
        }

        Ok(Geography::from_polygon(polygon))
    }
}
