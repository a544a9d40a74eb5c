//! Options of boolean and distance operations.

use serde::{Deserialize, Serialize};
use terrella_types::snap::MAX_LEVEL;
use terrella_types::{BooleanOptions, PolygonModel, PolylineModel};

use crate::error::ConfigurationError;

/// Rule deciding whether boundary points belong to a geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BoundaryModel {
    /// Boundary points never belong to the geometry.
    Open,
    /// Boundary points shared by several geometries belong to exactly one of them.
    SemiOpen,
    /// All boundary points belong to the geometry.
    Closed,
}

impl BoundaryModel {
    /// Converts the wire code `0 = open`, `1 = semi-open`, `2 = closed`. `field` names the option in the error.
    pub fn from_code(field: &'static str, code: i64) -> Result<Self, ConfigurationError> {
        match code {
            0 => Ok(Self::Open),
            1 => Ok(Self::SemiOpen),
            2 => Ok(Self::Closed),
            value => Err(ConfigurationError::InvalidModel { field, value }),
        }
    }

    /// Wire code of the model.
    pub fn code(&self) -> i64 {
        match self {
            Self::Open => 0,
            Self::SemiOpen => 1,
            Self::Closed => 2,
        }
    }

    fn polygon_model(self) -> PolygonModel {
        match self {
            Self::Open => PolygonModel::Open,
            Self::SemiOpen => PolygonModel::SemiOpen,
            Self::Closed => PolygonModel::Closed,
        }
    }

    fn polyline_model(self) -> PolylineModel {
        match self {
            Self::Open => PolylineModel::Open,
            Self::SemiOpen => PolylineModel::SemiOpen,
            Self::Closed => PolylineModel::Closed,
        }
    }
}

/// Validated options of [`intersects`](crate::intersects), [`contains`](crate::contains),
/// [`equals`](crate::equals) and the other boolean operations.
///
/// Unset fields fall back to the defaults of the boolean engine: semi-open polygons, closed polylines, no snapping.
///
/// The serialized form uses integer codes:
///
/// ```
/// use terrella::{BoundaryModel, OperationOptions};
///
/// let options: OperationOptions = serde_json::from_str(r#"{"polygon_model": 2}"#).unwrap();
/// assert_eq!(options.polygon_model(), Some(BoundaryModel::Closed));
///
/// assert!(serde_json::from_str::<OperationOptions>(r#"{"polyline_model": 3}"#).is_err());
/// ```
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOperationOptions", into = "RawOperationOptions")]
pub struct OperationOptions {
    polygon_model: Option<BoundaryModel>,
    polyline_model: Option<BoundaryModel>,
    snap_level: Option<u8>,
}

impl OperationOptions {
    /// Options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options from wire codes. `None` leaves the field unset.
    pub fn from_codes(
        polygon_model: Option<i64>,
        polyline_model: Option<i64>,
        snap_level: Option<i64>,
    ) -> Result<Self, ConfigurationError> {
        let mut options = Self::new();
        if let Some(code) = polygon_model {
            options = options.with_polygon_model(BoundaryModel::from_code("polygon_model", code)?);
        }
        if let Some(code) = polyline_model {
            options = options.with_polyline_model(BoundaryModel::from_code("polyline_model", code)?);
        }
        if let Some(level) = snap_level {
            options = options.with_snap_level(level)?;
        }

        Ok(options)
    }

    /// Sets both the polygon and the polyline model.
    pub fn with_model(self, model: BoundaryModel) -> Self {
        self.with_polygon_model(model).with_polyline_model(model)
    }

    /// Sets the boundary model of polygons.
    pub fn with_polygon_model(mut self, model: BoundaryModel) -> Self {
        self.polygon_model = Some(model);
        self
    }

    /// Sets the boundary model of polylines.
    pub fn with_polyline_model(mut self, model: BoundaryModel) -> Self {
        self.polyline_model = Some(model);
        self
    }

    /// Snaps input vertices to the centers of cells of the given level. Level 0 disables snapping.
    pub fn with_snap_level(mut self, level: i64) -> Result<Self, ConfigurationError> {
        match u8::try_from(level) {
            Ok(level) if level <= MAX_LEVEL => {
                self.snap_level = Some(level);
                Ok(self)
            }
            _ => Err(ConfigurationError::InvalidSnapLevel(level)),
        }
    }

    /// Polygon boundary model, if set.
    pub fn polygon_model(&self) -> Option<BoundaryModel> {
        self.polygon_model
    }

    /// Polyline boundary model, if set.
    pub fn polyline_model(&self) -> Option<BoundaryModel> {
        self.polyline_model
    }

    /// Snap level, if set.
    pub fn snap_level(&self) -> Option<u8> {
        self.snap_level
    }

    /// Native options of the boolean engine.
    pub fn boolean_options(&self) -> BooleanOptions {
        let defaults = BooleanOptions::default();
        BooleanOptions {
            polygon_model: self
                .polygon_model
                .map_or(defaults.polygon_model, BoundaryModel::polygon_model),
            polyline_model: self
                .polyline_model
                .map_or(defaults.polyline_model, BoundaryModel::polyline_model),
            snap_level: self.snap_level.filter(|level| *level > 0),
        }
    }
}

/// Wire form of [`OperationOptions`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct RawOperationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    polygon_model: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    polyline_model: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snap_level: Option<i64>,
}

impl TryFrom<RawOperationOptions> for OperationOptions {
    type Error = ConfigurationError;

    fn try_from(raw: RawOperationOptions) -> Result<Self, Self::Error> {
        Self::from_codes(raw.polygon_model, raw.polyline_model, raw.snap_level)
    }
}

impl From<OperationOptions> for RawOperationOptions {
    fn from(options: OperationOptions) -> Self {
        Self {
            polygon_model: options.polygon_model.map(|m| m.code()),
            polyline_model: options.polyline_model.map(|m| m.code()),
            snap_level: options.snap_level.map(i64::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn unset_options_use_engine_defaults() {
        assert_eq!(
            OperationOptions::new().boolean_options(),
            BooleanOptions::default()
        );
    }

    #[test]
    fn codes() {
        let options = OperationOptions::from_codes(Some(0), Some(1), Some(10)).expect("valid codes");
        let native = options.boolean_options();
        assert_eq!(native.polygon_model, PolygonModel::Open);
        assert_eq!(native.polyline_model, PolylineModel::SemiOpen);
        assert_eq!(native.snap_level, Some(10));

        assert_matches!(
            OperationOptions::from_codes(Some(3), None, None),
            Err(ConfigurationError::InvalidModel {
                field: "polygon_model",
                value: 3
            })
        );
        assert_matches!(
            OperationOptions::from_codes(None, Some(-1), None),
            Err(ConfigurationError::InvalidModel {
                field: "polyline_model",
                value: -1
            })
        );
        assert_matches!(
            OperationOptions::from_codes(None, None, Some(31)),
            Err(ConfigurationError::InvalidSnapLevel(31))
        );
        assert_matches!(
            OperationOptions::new().with_snap_level(-1),
            Err(ConfigurationError::InvalidSnapLevel(-1))
        );
    }

    #[test]
    fn level_zero_does_not_snap() {
        let options = OperationOptions::new()
            .with_snap_level(0)
            .expect("valid level");
        assert_eq!(options.snap_level(), Some(0));
        assert_eq!(options.boolean_options().snap_level, None);
    }

    #[test]
    fn serde_round_trip() {
        let options = OperationOptions::new()
            .with_model(BoundaryModel::Closed)
            .with_snap_level(5)
            .expect("valid level");
        let json = serde_json::to_string(&options).expect("serializable");
        assert_eq!(json, r#"{"polygon_model":2,"polyline_model":2,"snap_level":5}"#);

        let parsed: OperationOptions = serde_json::from_str(&json).expect("valid json");
        assert_eq!(parsed, options);

        let error = serde_json::from_str::<OperationOptions>(r#"{"snap_level": 40}"#)
            .expect_err("invalid level");
        assert!(error.to_string().contains("invalid snap level: 40"));
    }
}
