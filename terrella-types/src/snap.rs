//! Rounding of points to a hierarchical grid of cells on the faces of a cube circumscribing the sphere.
//!
//! At level `k` every face is split into `2^k × 2^k` cells. Snapping moves a point to the centre of the cell it
//! falls into, so nearly coincident input vertices become identical.

use nalgebra::Vector3;

use crate::SpherePoint;

/// The finest supported level.
pub const MAX_LEVEL: u8 = 30;

fn uv_to_st(u: f64) -> f64 {
    if u >= 0.0 {
        0.5 * (1.0 + 3.0 * u).sqrt()
    } else {
        1.0 - 0.5 * (1.0 - 3.0 * u).sqrt()
    }
}

fn st_to_uv(s: f64) -> f64 {
    if s >= 0.5 {
        (4.0 * s * s - 1.0) / 3.0
    } else {
        (1.0 - 4.0 * (1.0 - s) * (1.0 - s)) / 3.0
    }
}

/// Index of the axis with the largest absolute coordinate.
fn major_axis(v: &Vector3<f64>) -> usize {
    let abs = v.abs();
    if abs.x >= abs.y && abs.x >= abs.z {
        0
    } else if abs.y >= abs.z {
        1
    } else {
        2
    }
}

/// Moves the point to the centre of the grid cell containing it. Levels above [`MAX_LEVEL`] are clamped.
pub fn snap_to_level(point: &SpherePoint, level: u8) -> SpherePoint {
    let v = point.vector();
    if point.is_zero() || !v.iter().all(|c| c.is_finite()) {
        return *point;
    }

    let axis = major_axis(v);
    let (i, j) = ((axis + 1) % 3, (axis + 2) % 3);
    let major = v[axis];

    let cells = f64::from(1u32 << level.min(MAX_LEVEL));
    let snap = |coordinate: f64| -> f64 {
        let s = uv_to_st(coordinate / major.abs()).clamp(0.0, 1.0);
        let index = (s * cells).floor().min(cells - 1.0);
        st_to_uv((index + 0.5) / cells)
    };

    let mut snapped = Vector3::zeros();
    snapped[axis] = major.signum();
    snapped[i] = snap(v[i]);
    snapped[j] = snap(v[j]);

    SpherePoint::from_vector(snapped).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_points_snap_together() {
        let a = SpherePoint::from_degrees(10.0, 10.0);
        let b = SpherePoint::from_degrees(10.0 + 1e-9, 10.0 - 1e-9);
        assert_ne!(a, b);
        assert_eq!(snap_to_level(&a, 10), snap_to_level(&b, 10));
    }

    #[test]
    fn snapped_point_is_close() {
        let a = SpherePoint::from_degrees(-33.0, 151.0);
        let snapped = snap_to_level(&a, 20);
        assert!(snapped.is_unit_length());
        assert!(a.angle(&snapped) < 1e-5);
    }

    #[test]
    fn level_zero_is_face_center() {
        let a = SpherePoint::from_degrees(20.0, 30.0);
        let snapped = snap_to_level(&a, 0);
        assert_eq!(snapped, SpherePoint::new(1.0, 0.0, 0.0));
    }
}
