use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::SpherePoint;

/// Latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Creates a new value from latitude and longitude in degrees.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Latitude in radians.
    pub fn lat_rad(&self) -> f64 {
        self.lat.to_radians()
    }

    /// Longitude in radians.
    pub fn lng_rad(&self) -> f64 {
        self.lng.to_radians()
    }

    /// Returns true if latitude is within `[-90, 90]` and longitude within `[-180, 180]`.
    pub fn is_valid(&self) -> bool {
        self.lat.abs() <= 90.0 && self.lng.abs() <= 180.0
    }

    /// Clamps latitude into `[-90, 90]` and wraps longitude into `[-180, 180]`.
    pub fn normalized(&self) -> Self {
        let lat = self.lat.clamp(-90.0, 90.0);
        let lng = if self.lng.abs() > 180.0 {
            (self.lng + 180.0).rem_euclid(360.0) - 180.0
        } else {
            self.lng
        };

        Self { lat, lng }
    }

    /// Converts the coordinates into a unit point on the sphere.
    pub fn to_point(&self) -> SpherePoint {
        let phi = self.lat_rad();
        let theta = self.lng_rad();
        let cos_phi = phi.cos();
        SpherePoint::from_vector(Vector3::new(
            theta.cos() * cos_phi,
            theta.sin() * cos_phi,
            phi.sin(),
        ))
    }

    /// Coordinates of a point on the sphere. The point does not have to be unit length.
    pub fn from_point(point: &SpherePoint) -> Self {
        let lat = point
            .z()
            .atan2((point.x() * point.x() + point.y() * point.y()).sqrt());
        let lng = point.y().atan2(point.x());
        Self {
            lat: lat.to_degrees(),
            lng: lng.to_degrees(),
        }
    }
}

/// Creates a new [`LatLng`] from latitude and longitude values (in degrees).
///
/// ```
/// use terrella_types::latlng;
///
/// let point = latlng!(38.0, 52.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! latlng {
    ($lat:expr, $lng:expr) => {
        $crate::geo::LatLng::new($lat, $lng)
    };
}
