use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{ConstructorOptions, FeatureConstructor};
use crate::error::TerrellaError;
use crate::handler::{replay, Event, GeometryHandler, GeometryType};
use crate::Geography;

const DEFAULT_CHECK_INTERVAL: usize = 1000;

/// Flag used to interrupt a long running [`FeatureReader`] from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. All clones of the token observe it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of reading a stream of features.
#[derive(Debug, Default)]
pub struct FeatureBatch {
    /// Successfully built features with their indices in the input.
    pub features: Vec<(usize, Geography)>,
    /// Errors of skipped features.
    pub errors: Vec<TerrellaError>,
}

/// Builds a geography for every feature of an event stream.
///
/// By default the first invalid feature aborts reading. With [`FeatureReader::with_skip_invalid`] the error is
/// recorded in [`FeatureBatch::errors`] and the rest of the feature's events are ignored.
#[derive(Debug)]
pub struct FeatureReader {
    constructor: FeatureConstructor,
    skip_invalid: bool,
    cancellation: Option<CancellationToken>,
    check_interval: usize,
    started: usize,
    skipping: Option<usize>,
    batch: FeatureBatch,
}

impl FeatureReader {
    /// Creates a reader.
    pub fn new(options: ConstructorOptions) -> Self {
        Self {
            constructor: FeatureConstructor::new(options),
            skip_invalid: false,
            cancellation: None,
            check_interval: DEFAULT_CHECK_INTERVAL,
            started: 0,
            skipping: None,
            batch: FeatureBatch::default(),
        }
    }

    /// Sets whether invalid features are skipped instead of aborting the read.
    pub fn with_skip_invalid(mut self, skip_invalid: bool) -> Self {
        self.skip_invalid = skip_invalid;
        self
    }

    /// Sets the token checked once every `interval` features.
    pub fn with_cancellation(mut self, token: CancellationToken, interval: usize) -> Self {
        self.cancellation = Some(token);
        self.check_interval = interval.max(1);
        self
    }

    /// Reads recorded events, returning the features built from them.
    pub fn read<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<FeatureBatch, TerrellaError> {
        let result = replay(events, self);
        let batch = self.take_batch();
        result.map(|_| batch)
    }

    /// Takes the features read so far and resets the reader.
    pub fn take_batch(&mut self) -> FeatureBatch {
        self.constructor.reset();
        self.started = 0;
        self.skipping = None;
        std::mem::take(&mut self.batch)
    }

    fn check_cancelled(&self) -> Result<(), TerrellaError> {
        if let Some(token) = &self.cancellation {
            if self.started % self.check_interval == 0 && token.is_cancelled() {
                return Err(TerrellaError::Cancelled);
            }
        }

        Ok(())
    }

    fn handle(
        &mut self,
        f: impl FnOnce(&mut FeatureConstructor) -> Result<(), TerrellaError>,
    ) -> Result<(), TerrellaError> {
        if self.skipping.is_some() {
            return Ok(());
        }

        match f(&mut self.constructor) {
            Ok(()) => Ok(()),
            Err(err @ TerrellaError::Construction { feature: Some(id), .. }) if self.skip_invalid => {
                log::warn!("Skipping invalid feature: {err}");
                self.skipping = Some(id);
                self.batch.errors.push(err);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

impl GeometryHandler for FeatureReader {
    type Error = TerrellaError;

    fn feat_start(&mut self, id: usize) -> Result<(), Self::Error> {
        self.check_cancelled()?;
        self.started += 1;
        self.skipping = None;
        self.handle(|c| c.feat_start(id))
    }

    fn feat_end(&mut self, id: usize) -> Result<(), Self::Error> {
        if self.skipping == Some(id) {
            self.skipping = None;
            self.constructor.reset();
            return Ok(());
        }

        self.handle(|c| c.feat_end(id))?;
        if self.skipping.is_none() {
            let geography = self.constructor.finish_feature()?;
            self.batch.features.push((id, geography));
        }

        Ok(())
    }

    fn geom_start(&mut self, geometry_type: GeometryType, size: usize) -> Result<(), Self::Error> {
        self.handle(|c| c.geom_start(geometry_type, size))
    }

    fn geom_end(&mut self) -> Result<(), Self::Error> {
        self.handle(|c| c.geom_end())
    }

    fn ring_start(&mut self, size: usize) -> Result<(), Self::Error> {
        self.handle(|c| c.ring_start(size))
    }

    fn ring_end(&mut self) -> Result<(), Self::Error> {
        self.handle(|c| c.ring_end())
    }

    fn coords(&mut self, coords: &[f64], dims: usize) -> Result<(), Self::Error> {
        self.handle(|c| c.coords(coords, dims))
    }
}
