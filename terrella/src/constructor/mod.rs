//! Builders turning geometry event streams into [`Geography`] values.
//!
//! There is one constructor per geography variant: [`PointConstructor`], [`PolylineConstructor`] and
//! [`PolygonConstructor`]. [`CollectionConstructor`] dispatches nested geometries to a fresh sub-constructor chosen
//! by the geometry type, and [`FeatureConstructor`] drives one feature at a time, unwrapping single-part results.

use terrella_types::geo::Projection;
use terrella_types::{EdgeTessellator, Point2, SpherePoint, Unprojectable};

use crate::error::ConstructionError;
use crate::handler::GeometryHandler;
use crate::Geography;

mod collection;
mod feature;
mod options;
mod point;
mod polygon;
mod polyline;
mod reader;

pub use collection::CollectionConstructor;
pub use feature::FeatureConstructor;
pub use options::{ConstructorConfig, ConstructorOptions, ProjectionKind};
pub use point::PointConstructor;
pub use polygon::PolygonConstructor;
pub use polyline::PolylineConstructor;
pub use reader::{CancellationToken, FeatureBatch, FeatureReader};

/// A geometry handler that accumulates events into a single geography.
pub trait Constructor: GeometryHandler<Error = ConstructionError> {
    /// Builds the geography from the events received so far and resets the constructor, so it can be used for the
    /// next geometry.
    fn finish(&mut self) -> Result<Geography, ConstructionError>;
}

/// Raw coordinate tuples of the chain being built, always stored with three values.
#[derive(Debug, Clone, Default)]
pub(crate) struct VertexBuffer {
    tuples: Vec<[f64; 3]>,
}

impl VertexBuffer {
    pub(crate) fn push(&mut self, coords: &[f64], dims: usize) -> Result<(), ConstructionError> {
        for tuple in tuples(coords, dims)? {
            self.tuples.push(tuple);
        }
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.tuples.clear();
    }

    /// Converts buffered tuples into points on the sphere, tessellating projected edges if configured, and clears
    /// the buffer.
    pub(crate) fn finalize(
        &mut self,
        options: &ConstructorOptions,
    ) -> Result<Vec<SpherePoint>, ConstructionError> {
        let tuples = std::mem::take(&mut self.tuples);
        let Some(projection) = options.projection() else {
            return Ok(tuples.iter().map(|t| SpherePoint::new(t[0], t[1], t[2])).collect());
        };

        let tessellator = EdgeTessellator::new(projection, options.tessellate_tolerance());
        let planar: Vec<Point2> = tuples.iter().map(|t| Point2::new(t[0], t[1])).collect();
        if planar.len() == 1 {
            return Ok(vec![tessellator.unproject(&planar[0])?]);
        }

        let mut out = Vec::with_capacity(planar.len());
        for pair in planar.windows(2) {
            tessellator.append_unprojected(&pair[0], &pair[1], &mut out)?;
        }

        Ok(out)
    }
}

/// Splits a flat buffer into tuples of three values. Two dimensional tuples get zero `z`.
pub(crate) fn tuples(
    coords: &[f64],
    dims: usize,
) -> Result<impl Iterator<Item = [f64; 3]> + '_, ConstructionError> {
    if dims < 2 {
        return Err(ConstructionError::MalformedStream(
            "coordinates must have at least two dimensions",
        ));
    }
    if coords.len() % dims != 0 {
        return Err(ConstructionError::MalformedStream(
            "coordinate buffer length is not a multiple of dimensions",
        ));
    }

    Ok(coords
        .chunks_exact(dims)
        .map(|c| [c[0], c[1], if c.len() > 2 { c[2] } else { 0.0 }]))
}

/// Converts a single tuple into a point on the sphere.
pub(crate) fn to_point(
    tuple: &[f64; 3],
    options: &ConstructorOptions,
) -> Result<SpherePoint, ConstructionError> {
    match options.projection() {
        Some(projection) => {
            let planar = Point2::new(tuple[0], tuple[1]);
            projection
                .unproject(&planar)
                .ok_or(ConstructionError::Unprojectable(Unprojectable(planar)))
        }
        None => Ok(SpherePoint::new(tuple[0], tuple[1], tuple[2])),
    }
}
