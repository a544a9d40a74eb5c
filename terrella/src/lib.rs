//! Terrella builds spherical geographies from streams of geometry events and writes them back.
//!
//! Parsers of exchange formats describe geometries as a sequence of events: a feature starts, a geometry of some
//! type starts, a ring starts, a batch of coordinates arrives, and so on. Any type implementing [`GeometryHandler`]
//! can receive these events. This crate provides
//!
//! * [constructors](constructor) turning the events into a [`Geography`]: points, polylines, polygons or
//!   arbitrarily nested collections of them,
//! * the [`Exporter`], replaying a geography as events, so that it can be written to any format,
//! * a bridge to [geozero] ([`GeozeroReader`], [`GeozeroWriter`]) with GeoJSON helpers,
//! * accessors, predicates and distances computed on the unit sphere by [`terrella_types`].
//!
//! # Quick start
//!
//! ```
//! use terrella::{intersects, read_geojson, ConstructorOptions, OperationOptions};
//!
//! let square = read_geojson(
//!     r#"{"type": "Polygon", "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]}"#,
//!     ConstructorOptions::new(),
//! )?;
//! let point = read_geojson(r#"{"type": "Point", "coordinates": [5, 5]}"#, ConstructorOptions::new())?;
//!
//! assert_eq!(square.dimension(), 2);
//! assert!(intersects(&square, &point, &OperationOptions::new()));
//! # Ok::<(), terrella::TerrellaError>(())
//! ```
//!
//! # Coordinates
//!
//! By default input coordinates are longitude and latitude in degrees. A different
//! [projection](terrella_types::geo::SphereProjection) can be set in [`ConstructorOptions`], in which case edges are
//! tessellated so that straight lines in the projection are followed within the given tolerance. Without a
//! projection the coordinates are geocentric `x, y, z` vectors.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod accessors;
pub mod aggregator;
pub mod constructor;
pub mod distance;
pub mod error;
pub mod exchange;
mod export;
mod geography;
mod handler;
pub mod linear_referencing;
mod options;
mod predicates;

pub use aggregator::{Aggregator, CentroidAggregator, ConvexHullAggregator};
pub use constructor::{
    CancellationToken, CollectionConstructor, Constructor, ConstructorConfig, ConstructorOptions, FeatureBatch,
    FeatureConstructor, FeatureReader, PointConstructor, PolygonConstructor, PolylineConstructor, ProjectionKind,
};
pub use error::{ConfigurationError, ConstructionError, OperationError, TerrellaError};
pub use exchange::{read_geojson, read_geojson_features, write_geojson_features, GeozeroReader, GeozeroWriter};
pub use export::Exporter;
pub use geography::{CollectionGeography, Geography, PointGeography, PolygonGeography, PolylineGeography};
pub use handler::{replay, Event, EventRecorder, GeometryHandler, GeometryType};
pub use options::{BoundaryModel, OperationOptions};
pub use predicates::{contains, equals, intersects, intersects_box, is_within_distance, touches};

pub use terrella_types;
