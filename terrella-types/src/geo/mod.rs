//! Geographic coordinates (latitude and longitude, see [`LatLng`]) and conversion between the sphere and planar
//! coordinate systems (see [`Projection`]).

mod datum;
mod lat_lng;
mod projection;

pub use datum::Datum;
pub use lat_lng::LatLng;
pub use projection::{PlateCarree, Projection, SphereProjection, WebMercator};
