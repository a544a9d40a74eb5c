use std::sync::Arc;

use serde::{Deserialize, Serialize};
use terrella_types::geo::{PlateCarree, SphereProjection, WebMercator};

use crate::error::ConfigurationError;

/// Options shared by all constructors of one build.
///
/// Options are fixed when a constructor is created and never change during the build.
#[derive(Debug, Clone)]
pub struct ConstructorOptions {
    oriented: bool,
    check: bool,
    projection: Option<Arc<dyn SphereProjection>>,
    tessellate_tolerance: f64,
}

impl Default for ConstructorOptions {
    fn default() -> Self {
        Self {
            oriented: false,
            check: true,
            projection: Some(Arc::new(PlateCarree::default())),
            tessellate_tolerance: f64::INFINITY,
        }
    }
}

impl ConstructorOptions {
    /// Default options: nested loops, validity checks enabled, longitude/latitude degrees input, no tessellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// If set, polygon loops are taken with the winding they are given in: the interior of the polygon is on the
    /// left side of every loop. Otherwise loops are normalized and holes are found by nesting.
    pub fn with_oriented(mut self, oriented: bool) -> Self {
        self.oriented = oriented;
        self
    }

    /// Enables or disables validation of loops and polygons.
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Sets the projection input coordinates are given in.
    pub fn with_projection(mut self, projection: impl SphereProjection + 'static) -> Self {
        self.projection = Some(Arc::new(projection));
        self
    }

    /// Input coordinates are geocentric `x, y, z` values of unit vectors.
    pub fn without_projection(mut self) -> Self {
        self.projection = None;
        self
    }

    /// Sets the maximum distance in radians between a projected straight edge and its geodesic approximation.
    ///
    /// Infinity (the default) disables tessellation.
    pub fn with_tessellate_tolerance(mut self, tolerance: f64) -> Result<Self, ConfigurationError> {
        if tolerance.is_nan() || tolerance <= 0.0 {
            return Err(ConfigurationError::InvalidTolerance(tolerance));
        }

        self.tessellate_tolerance = tolerance;
        Ok(self)
    }

    /// Oriented mode.
    pub fn oriented(&self) -> bool {
        self.oriented
    }

    /// Validation flag.
    pub fn check(&self) -> bool {
        self.check
    }

    /// Projection of the input coordinates.
    pub fn projection(&self) -> Option<&dyn SphereProjection> {
        self.projection.as_deref()
    }

    /// Tessellation tolerance in radians.
    pub fn tessellate_tolerance(&self) -> f64 {
        self.tessellate_tolerance
    }
}

/// Projection selector of [`ConstructorConfig`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Longitude and latitude in degrees.
    #[default]
    PlateCarree,
    /// Spherical mercator in meters.
    Mercator,
    /// Geocentric coordinates.
    None,
}

/// Serializable form of [`ConstructorOptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorConfig {
    /// See [`ConstructorOptions::with_oriented`].
    #[serde(default)]
    pub oriented: bool,
    /// See [`ConstructorOptions::with_check`].
    #[serde(default = "default_check")]
    pub check: bool,
    /// Projection of the input coordinates.
    #[serde(default)]
    pub projection: ProjectionKind,
    /// Tessellation tolerance in degrees. Absent means no tessellation.
    #[serde(default)]
    pub tessellate_tolerance_degrees: Option<f64>,
}

fn default_check() -> bool {
    true
}

impl Default for ConstructorConfig {
    fn default() -> Self {
        Self {
            oriented: false,
            check: default_check(),
            projection: ProjectionKind::default(),
            tessellate_tolerance_degrees: None,
        }
    }
}

impl TryFrom<ConstructorConfig> for ConstructorOptions {
    type Error = ConfigurationError;

    fn try_from(config: ConstructorConfig) -> Result<Self, Self::Error> {
        let options = ConstructorOptions::new()
            .with_oriented(config.oriented)
            .with_check(config.check);
        let options = match config.projection {
            ProjectionKind::PlateCarree => options.with_projection(PlateCarree::default()),
            ProjectionKind::Mercator => options.with_projection(WebMercator::default()),
            ProjectionKind::None => options.without_projection(),
        };

        match config.tessellate_tolerance_degrees {
            Some(degrees) => options.with_tessellate_tolerance(degrees.to_radians()),
            None => Ok(options),
        }
    }
}
