use std::f64::consts::PI;
use std::fmt::Debug;

use crate::geo::{Datum, LatLng};
use crate::{Point2, SpherePoint};

/// Conversion between two coordinate systems.
pub trait Projection {
    /// Type of the input point.
    type InPoint;
    /// Type of the output point.
    type OutPoint;

    /// Projects a point. Returns `None` if the point cannot be represented in the output system.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Inverse of [`Projection::project`].
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

/// Projection between the sphere and a plane, usable as a reprojection hook while building geometries.
pub trait SphereProjection:
    Projection<InPoint = SpherePoint, OutPoint = Point2> + Debug + Send + Sync
{
    /// Coordinate period of the plane along each axis, or zero for axes that do not wrap around.
    ///
    /// Edges whose projected length along a wrapping axis exceeds half of the period are assumed to take the
    /// shorter way around.
    fn wrap_distance(&self) -> Point2 {
        Point2::new(0.0, 0.0)
    }
}

/// Equirectangular projection: `x` is proportional to longitude and `y` to latitude.
///
/// With the default scale of `180` the planar coordinates are plain degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateCarree {
    x_scale: f64,
}

impl PlateCarree {
    /// Creates a projection mapping longitude `[-180, 180]` into `[-x_scale, x_scale]`.
    pub fn new(x_scale: f64) -> Self {
        Self { x_scale }
    }

    fn from_radians(&self) -> f64 {
        self.x_scale / PI
    }
}

impl Default for PlateCarree {
    fn default() -> Self {
        Self::new(180.0)
    }
}

impl Projection for PlateCarree {
    type InPoint = SpherePoint;
    type OutPoint = Point2;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let ll = LatLng::from_point(input);
        let scale = self.from_radians();
        Some(Point2::new(ll.lng_rad() * scale, ll.lat_rad() * scale))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        if !input.is_finite() {
            return None;
        }

        let to_radians = PI / self.x_scale;
        let lat = (input.y() * to_radians).to_degrees();
        let lng = (input.x() * to_radians).to_degrees();
        Some(LatLng::new(lat, lng).normalized().to_point())
    }
}

impl SphereProjection for PlateCarree {
    fn wrap_distance(&self) -> Point2 {
        Point2::new(2.0 * self.x_scale, 0.0)
    }
}

/// Spherical Mercator projection in meters of the datum's semimajor axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WebMercator {
    datum: Datum,
}

impl WebMercator {
    /// Creates a projection for the given datum.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            datum: Datum::WGS84,
        }
    }
}

impl Projection for WebMercator {
    type InPoint = SpherePoint;
    type OutPoint = Point2;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let ll = LatLng::from_point(input);
        let radius = self.datum.semimajor();
        let sin_lat = ll.lat_rad().sin();
        let x = radius * ll.lng_rad();
        let y = radius * 0.5 * ((1.0 + sin_lat) / (1.0 - sin_lat)).ln();

        if x.is_finite() && y.is_finite() {
            Some(Point2::new(x, y))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        if !input.is_finite() {
            return None;
        }

        let radius = self.datum.semimajor();
        let lat = (input.y() / radius).sinh().atan();
        let lng = input.x() / radius;
        Some(LatLng::new(lat.to_degrees(), lng.to_degrees()).normalized().to_point())
    }
}

impl SphereProjection for WebMercator {
    fn wrap_distance(&self) -> Point2 {
        Point2::new(2.0 * PI * self.datum.semimajor(), 0.0)
    }
}
