//! Spherical geometry primitives.
//!
//! All geometries live on the unit sphere and are made of geodesic edges between [`SpherePoint`]s. The crate
//! provides the building blocks used by the `terrella` crate: loops and polygons with containment and validation,
//! polylines, a convex hull query, an edge tessellator for projected input, and a brute-force [`ShapeIndex`] answering
//! boolean and distance queries under configurable boundary models.

mod sphere_point;
pub use sphere_point::*;

mod planar;
pub use planar::*;

pub mod geo;

mod error;
pub use error::*;

pub mod edge;

mod polyline;
pub use polyline::*;

mod sphere_loop;
pub use sphere_loop::*;

mod polygon;
pub use polygon::*;

mod convex_hull;
pub use convex_hull::*;

mod tessellator;
pub use tessellator::*;

pub mod snap;

mod shape_index;
pub use shape_index::*;

pub mod boolean;
pub use boolean::{BooleanOptions, PolygonModel, PolylineModel};

pub mod distance;

/// Tolerance used to decide whether a point lies on an edge.
pub const BOUNDARY_TOLERANCE: f64 = 1e-12;
