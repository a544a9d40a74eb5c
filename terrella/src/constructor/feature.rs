use super::{CollectionConstructor, Constructor, ConstructorOptions};
use crate::error::{ConstructionError, TerrellaError};
use crate::handler::{replay, Event, GeometryHandler, GeometryType};
use crate::Geography;

/// Top level constructor building one geography per feature.
///
/// Every feature is wrapped into an implicit geometry collection, so a single geometry and a collection take the same
/// path. When the feature ends with exactly one part, that part is returned instead of the wrapping collection.
///
/// ```
/// use terrella::{Event, FeatureConstructor, Geography, GeometryType};
///
/// let mut constructor = FeatureConstructor::default();
/// let geography = constructor
///     .construct(&[
///         Event::GeomStart(GeometryType::Point, 1),
///         Event::Coords { coords: vec![30.0, 10.0], dims: 2 },
///         Event::GeomEnd,
///     ])
///     .unwrap();
///
/// assert!(matches!(geography, Geography::Point(_)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureConstructor {
    collection: CollectionConstructor,
    feature: Option<usize>,
    finished: Option<Geography>,
}

impl FeatureConstructor {
    /// Creates a new constructor.
    pub fn new(options: ConstructorOptions) -> Self {
        Self {
            collection: CollectionConstructor::new(options),
            feature: None,
            finished: None,
        }
    }

    /// Drops any partially built feature.
    pub fn reset(&mut self) {
        self.collection.reset();
        self.feature = None;
        self.finished = None;
    }

    /// Takes the geography of the last completed feature.
    pub fn finish_feature(&mut self) -> Result<Geography, TerrellaError> {
        self.finished.take().ok_or_else(|| {
            self.error(ConstructionError::MalformedStream(
                "no completed feature to finish",
            ))
        })
    }

    /// Builds a geography from recorded events.
    ///
    /// If the events do not start with [`Event::FeatStart`], they are treated as the geometry of feature 0.
    pub fn construct<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<Geography, TerrellaError> {
        self.reset();

        let mut events = events.into_iter().peekable();
        let bare = !matches!(events.peek(), Some(Event::FeatStart(_)));
        if bare {
            self.feat_start(0)?;
        }

        replay(events, self)?;

        if bare {
            self.feat_end(0)?;
        }

        self.finish_feature()
    }

    fn error(&self, source: ConstructionError) -> TerrellaError {
        TerrellaError::Construction {
            feature: self.feature,
            source,
        }
    }

    fn forward(
        &mut self,
        f: impl FnOnce(&mut CollectionConstructor) -> Result<(), ConstructionError>,
    ) -> Result<(), TerrellaError> {
        if self.feature.is_none() {
            return Err(self.error(ConstructionError::MalformedStream(
                "geometry event outside of a feature",
            )));
        }

        match f(&mut self.collection) {
            Ok(()) => Ok(()),
            Err(source) => {
                let err = self.error(source);
                self.collection.reset();
                self.feature = None;
                Err(err)
            }
        }
    }

    fn complete(&mut self) -> Result<Geography, ConstructionError> {
        self.collection.geom_end()?;
        let Geography::Collection(collection) = self.collection.finish()? else {
            return Err(ConstructionError::MalformedStream(
                "feature did not produce a collection",
            ));
        };

        let mut features = collection.into_features();
        if features.len() == 1 {
            if let Some(single) = features.pop() {
                return Ok(single);
            }
        }

        Ok(Geography::from_features(features))
    }
}

impl GeometryHandler for FeatureConstructor {
    type Error = TerrellaError;

    fn feat_start(&mut self, id: usize) -> Result<(), Self::Error> {
        self.reset();
        self.feature = Some(id);
        self.forward(|c| c.geom_start(GeometryType::GeometryCollection, 0))
    }

    fn feat_end(&mut self, id: usize) -> Result<(), Self::Error> {
        if self.feature != Some(id) {
            return Err(self.error(ConstructionError::MalformedStream(
                "feature ended without being started",
            )));
        }

        let result = self.complete();
        match result {
            Ok(geography) => {
                self.finished = Some(geography);
                self.feature = None;
                Ok(())
            }
            Err(source) => {
                let err = self.error(source);
                self.reset();
                Err(err)
            }
        }
    }

    fn geom_start(&mut self, geometry_type: GeometryType, size: usize) -> Result<(), Self::Error> {
        self.forward(|c| c.geom_start(geometry_type, size))
    }

    fn geom_end(&mut self) -> Result<(), Self::Error> {
        self.forward(|c| c.geom_end())
    }

    fn ring_start(&mut self, size: usize) -> Result<(), Self::Error> {
        self.forward(|c| c.ring_start(size))
    }

    fn ring_end(&mut self) -> Result<(), Self::Error> {
        self.forward(|c| c.ring_end())
    }

    fn coords(&mut self, coords: &[f64], dims: usize) -> Result<(), Self::Error> {
        self.forward(|c| c.coords(coords, dims))
    }
}
