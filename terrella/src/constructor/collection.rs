use super::{
    Constructor, ConstructorOptions, PointConstructor, PolygonConstructor, PolylineConstructor,
};
use crate::error::ConstructionError;
use crate::handler::{GeometryHandler, GeometryType};
use crate::Geography;

/// Constructor of the nested geometry currently being built by a [`CollectionConstructor`].
#[derive(Debug, Clone)]
enum SubConstructor {
    Point(PointConstructor),
    Polyline(PolylineConstructor),
    Polygon(PolygonConstructor),
    Collection(Box<CollectionConstructor>),
}

impl SubConstructor {
    fn for_type(geometry_type: GeometryType, options: &ConstructorOptions) -> Self {
        match geometry_type {
            GeometryType::Point | GeometryType::MultiPoint => {
                Self::Point(PointConstructor::new(options.clone()))
            }
            GeometryType::LineString | GeometryType::MultiLineString => {
                Self::Polyline(PolylineConstructor::new(options.clone()))
            }
            GeometryType::Polygon | GeometryType::MultiPolygon => {
                Self::Polygon(PolygonConstructor::new(options.clone()))
            }
            GeometryType::GeometryCollection => {
                Self::Collection(Box::new(CollectionConstructor::new(options.clone())))
            }
        }
    }

    fn handler(&mut self) -> &mut dyn Constructor {
        match self {
            Self::Point(c) => c,
            Self::Polyline(c) => c,
            Self::Polygon(c) => c,
            Self::Collection(c) => c.as_mut(),
        }
    }
}

/// Builds [`Geography::Collection`] from a geometry collection.
///
/// The first `geom_start` must open the collection itself. Every child geometry is built by a fresh sub-constructor
/// chosen by the child's type, and child collections recurse. Events are forwarded to the active sub-constructor until
/// the `geom_end` that brings the nesting level back to the collection's own level.
#[derive(Debug, Clone, Default)]
pub struct CollectionConstructor {
    options: ConstructorOptions,
    level: usize,
    active: Option<SubConstructor>,
    features: Vec<Geography>,
}

impl CollectionConstructor {
    /// Creates a new constructor.
    pub fn new(options: ConstructorOptions) -> Self {
        Self {
            options,
            level: 0,
            active: None,
            features: vec![],
        }
    }

    /// Drops any partially built state.
    pub fn reset(&mut self) {
        self.level = 0;
        self.active = None;
        self.features.clear();
    }

    fn active(&mut self) -> Result<&mut dyn Constructor, ConstructionError> {
        self.active
            .as_mut()
            .map(SubConstructor::handler)
            .ok_or(ConstructionError::MalformedStream(
                "event outside of a child geometry",
            ))
    }
}

impl GeometryHandler for CollectionConstructor {
    type Error = ConstructionError;

    fn geom_start(&mut self, geometry_type: GeometryType, size: usize) -> Result<(), Self::Error> {
        self.level += 1;
        match self.level {
            1 if geometry_type == GeometryType::GeometryCollection => Ok(()),
            1 => Err(ConstructionError::UnexpectedGeometry(geometry_type)),
            2 => {
                log::trace!("Starting {geometry_type:?} child of a collection");
                let mut sub = SubConstructor::for_type(geometry_type, &self.options);
                sub.handler().geom_start(geometry_type, size)?;
                self.active = Some(sub);
                Ok(())
            }
            _ => self.active()?.geom_start(geometry_type, size),
        }
    }

    fn geom_end(&mut self) -> Result<(), Self::Error> {
        match self.level {
            0 => Err(ConstructionError::MalformedStream(
                "geometry ended without being started",
            )),
            1 => {
                self.level = 0;
                Ok(())
            }
            2 => {
                let mut sub = self
                    .active
                    .take()
                    .ok_or(ConstructionError::MalformedStream(
                        "child geometry ended without being started",
                    ))?;
                self.level = 1;

                let handler = sub.handler();
                handler.geom_end()?;
                self.features.push(handler.finish()?);
                Ok(())
            }
            _ => {
                self.level -= 1;
                self.active()?.geom_end()
            }
        }
    }

    fn ring_start(&mut self, size: usize) -> Result<(), Self::Error> {
        self.active()?.ring_start(size)
    }

    fn ring_end(&mut self) -> Result<(), Self::Error> {
        self.active()?.ring_end()
    }

    fn coords(&mut self, coords: &[f64], dims: usize) -> Result<(), Self::Error> {
        self.active()?.coords(coords, dims)
    }
}

impl Constructor for CollectionConstructor {
    fn finish(&mut self) -> Result<Geography, ConstructionError> {
        if self.level != 0 || self.active.is_some() {
            self.reset();
            return Err(ConstructionError::MalformedStream(
                "collection finished inside an open geometry",
            ));
        }

        Ok(Geography::from_features(std::mem::take(&mut self.features)))
    }
}
