use std::ops::Neg;

use approx::AbsDiffEq;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

/// A point on the surface of the unit sphere, represented as a geocentric vector.
///
/// Points produced by the conversion methods of this crate are unit length. Points created with
/// [`SpherePoint::new`] are stored as given, which allows validation to report non-unit input
/// instead of silently fixing it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpherePoint(Vector3<f64>);

impl SpherePoint {
    /// Creates a point from raw geocentric coordinates without normalizing them.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// Creates a point from a geocentric vector without normalizing it.
    pub fn from_vector(vector: Vector3<f64>) -> Self {
        Self(vector)
    }

    /// Creates a unit point from latitude and longitude in degrees.
    pub fn from_degrees(lat: f64, lng: f64) -> Self {
        LatLng::new(lat, lng).to_point()
    }

    /// Geocentric vector of the point.
    pub fn vector(&self) -> &Vector3<f64> {
        &self.0
    }

    /// X coordinate.
    pub fn x(&self) -> f64 {
        self.0.x
    }

    /// Y coordinate.
    pub fn y(&self) -> f64 {
        self.0.y
    }

    /// Z coordinate.
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Returns the point scaled to unit length. The zero vector stays zero.
    pub fn normalize(&self) -> Self {
        let norm = self.0.norm();
        if norm > 0.0 {
            Self(self.0 / norm)
        } else {
            *self
        }
    }

    /// Returns true if the vector has (nearly) unit length.
    pub fn is_unit_length(&self) -> bool {
        (self.0.norm_squared() - 1.0).abs() <= 5.0 * f64::EPSILON
    }

    /// Returns true for the zero vector.
    pub fn is_zero(&self) -> bool {
        self.0.x == 0.0 && self.0.y == 0.0 && self.0.z == 0.0
    }

    /// Dot product of the two vectors.
    pub fn dot(&self, other: &Self) -> f64 {
        self.0.dot(&other.0)
    }

    /// Cross product of the two vectors.
    pub fn cross(&self, other: &Self) -> Vector3<f64> {
        self.0.cross(&other.0)
    }

    /// Angle between the two points in radians, in range `[0, PI]`.
    pub fn angle(&self, other: &Self) -> f64 {
        self.0.cross(&other.0).norm().atan2(self.0.dot(&other.0))
    }

    /// Returns a unit vector orthogonal to this one.
    pub fn ortho(&self) -> Vector3<f64> {
        let v = self.0;
        let axis = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
            Vector3::x()
        } else if v.y.abs() <= v.z.abs() {
            Vector3::y()
        } else {
            Vector3::z()
        };

        v.cross(&axis).normalize()
    }

    /// Latitude and longitude of the point.
    pub fn to_lat_lng(&self) -> LatLng {
        LatLng::from_point(self)
    }
}

impl From<Vector3<f64>> for SpherePoint {
    fn from(value: Vector3<f64>) -> Self {
        Self(value)
    }
}

impl From<SpherePoint> for Vector3<f64> {
    fn from(value: SpherePoint) -> Self {
        value.0
    }
}

impl Neg for SpherePoint {
    type Output = SpherePoint;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl AbsDiffEq for SpherePoint {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.x.abs_diff_eq(&other.0.x, epsilon)
            && self.0.y.abs_diff_eq(&other.0.y, epsilon)
            && self.0.z.abs_diff_eq(&other.0.z, epsilon)
    }
}
