use thiserror::Error;

use crate::geo::SphereProjection;
use crate::{edge, Point2, SpherePoint};

const MAX_DEPTH: usize = 14;

/// A projected coordinate that has no counterpart on the sphere.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("point ({}, {}) cannot be unprojected", .0.x(), .0.y())]
pub struct Unprojectable(pub Point2);

/// Converts straight edges of a projected plane into chains of geodesic edges.
///
/// An edge is split in half (in the plane) until the geodesic between the unprojected endpoints of every piece
/// passes within `tolerance` radians of the unprojected planar midpoint.
#[derive(Debug, Clone, Copy)]
pub struct EdgeTessellator<'a> {
    projection: &'a dyn SphereProjection,
    tolerance: f64,
}

impl<'a> EdgeTessellator<'a> {
    /// Creates a tessellator. An infinite `tolerance` disables subdivision.
    pub fn new(projection: &'a dyn SphereProjection, tolerance: f64) -> Self {
        Self {
            projection,
            tolerance,
        }
    }

    /// Angular tolerance in radians.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Unprojects a single planar point.
    pub fn unproject(&self, point: &Point2) -> Result<SpherePoint, Unprojectable> {
        self.projection
            .unproject(point)
            .ok_or(Unprojectable(*point))
    }

    /// Appends the geodesic approximation of the planar edge `ab` to `out`.
    ///
    /// The start of the edge is appended only if `out` is empty, so consecutive edges of a chain can be appended one
    /// after another.
    pub fn append_unprojected(
        &self,
        a: &Point2,
        b: &Point2,
        out: &mut Vec<SpherePoint>,
    ) -> Result<(), Unprojectable> {
        let b = self.wrap(a, b);
        let pa = self.unproject(a)?;
        let pb = self.unproject(&b)?;

        if out.is_empty() {
            out.push(pa);
        }

        self.subdivide(*a, pa, b, pb, 0, out)
    }

    fn wrap(&self, a: &Point2, b: &Point2) -> Point2 {
        let wrap = self.projection.wrap_distance();
        let mut x = b.x();
        if wrap.x() > 0.0 {
            while x - a.x() > wrap.x() / 2.0 {
                x -= wrap.x();
            }
            while a.x() - x > wrap.x() / 2.0 {
                x += wrap.x();
            }
        }

        Point2::new(x, b.y())
    }

    fn subdivide(
        &self,
        a: Point2,
        pa: SpherePoint,
        b: Point2,
        pb: SpherePoint,
        depth: usize,
        out: &mut Vec<SpherePoint>,
    ) -> Result<(), Unprojectable> {
        if self.tolerance.is_infinite() {
            out.push(pb);
            return Ok(());
        }
        if depth >= MAX_DEPTH {
            log::trace!("Edge subdivision stopped at depth {depth}");
            out.push(pb);
            return Ok(());
        }

        let mid = a.midpoint(&b);
        let pm = self.unproject(&mid)?;
        if pm.angle(&edge::midpoint(&pa, &pb)) <= self.tolerance {
            out.push(pb);
            return Ok(());
        }

        self.subdivide(a, pa, mid, pm, depth + 1, out)?;
        self.subdivide(mid, pm, b, pb, depth + 1, out)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geo::PlateCarree;

    #[test]
    fn infinite_tolerance_keeps_vertices() {
        let projection = PlateCarree::default();
        let tessellator = EdgeTessellator::new(&projection, f64::INFINITY);
        let mut out = vec![];
        tessellator
            .append_unprojected(&Point2::new(0.0, 40.0), &Point2::new(60.0, 40.0), &mut out)
            .expect("valid input");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn parallel_is_subdivided() {
        let projection = PlateCarree::default();
        let tolerance = 0.01f64.to_radians();
        let tessellator = EdgeTessellator::new(&projection, tolerance);
        let mut out = vec![];
        tessellator
            .append_unprojected(&Point2::new(0.0, 40.0), &Point2::new(60.0, 40.0), &mut out)
            .expect("valid input");
        assert!(out.len() > 2);

        for p in &out {
            assert_abs_diff_eq!(p.to_lat_lng().lat(), 40.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn antimeridian_takes_short_way() {
        let projection = PlateCarree::default();
        let tessellator = EdgeTessellator::new(&projection, 1e-4);
        let mut out = vec![];
        tessellator
            .append_unprojected(&Point2::new(170.0, 10.0), &Point2::new(-170.0, 10.0), &mut out)
            .expect("valid input");

        for p in &out {
            assert!(p.to_lat_lng().lng().abs() >= 170.0 - 1e-9);
        }
    }

    #[test]
    fn unprojectable_point() {
        let projection = PlateCarree::default();
        let tessellator = EdgeTessellator::new(&projection, f64::INFINITY);
        let mut out = vec![];
        assert!(tessellator
            .append_unprojected(&Point2::new(f64::NAN, 0.0), &Point2::new(0.0, 0.0), &mut out)
            .is_err());
    }
}
