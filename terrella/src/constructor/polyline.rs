use terrella_types::Polyline;

use super::{Constructor, ConstructorOptions, VertexBuffer};
use crate::error::ConstructionError;
use crate::handler::{GeometryHandler, GeometryType};
use crate::Geography;

/// Builds [`Geography::Polyline`] from linestring and multilinestring geometries.
///
/// Every linestring is finalized on its `geom_end`. Chains with fewer than two points after unprojection are dropped.
#[derive(Debug, Clone, Default)]
pub struct PolylineConstructor {
    options: ConstructorOptions,
    buffer: VertexBuffer,
    polylines: Vec<Polyline>,
}

impl PolylineConstructor {
    /// Creates a new constructor.
    pub fn new(options: ConstructorOptions) -> Self {
        Self {
            options,
            buffer: VertexBuffer::default(),
            polylines: vec![],
        }
    }
}

impl GeometryHandler for PolylineConstructor {
    type Error = ConstructionError;

    fn geom_start(&mut self, geometry_type: GeometryType, size: usize) -> Result<(), Self::Error> {
        if size != 0
            && !geometry_type.is_line_like()
            && geometry_type != GeometryType::GeometryCollection
        {
            return Err(ConstructionError::UnexpectedGeometry(geometry_type));
        }

        self.buffer.clear();
        Ok(())
    }

    fn geom_end(&mut self) -> Result<(), Self::Error> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let vertices = self.buffer.finalize(&self.options)?;
        if vertices.len() < 2 {
            log::debug!("Dropping polyline with {} vertices", vertices.len());
            return Ok(());
        }

        self.polylines.push(Polyline::new(vertices));
        Ok(())
    }

    fn ring_start(&mut self, _size: usize) -> Result<(), Self::Error> {
        Err(ConstructionError::UnexpectedRing("polyline"))
    }

    fn ring_end(&mut self) -> Result<(), Self::Error> {
        Err(ConstructionError::UnexpectedRing("polyline"))
    }

    fn coords(&mut self, coords: &[f64], dims: usize) -> Result<(), Self::Error> {
        self.buffer.push(coords, dims)
    }
}

impl Constructor for PolylineConstructor {
    fn finish(&mut self) -> Result<Geography, ConstructionError> {
        self.buffer.clear();
        Ok(Geography::from_polylines(std::mem::take(&mut self.polylines)))
    }
}
