use terrella_types::SpherePoint;

use super::{to_point, tuples, Constructor, ConstructorOptions};
use crate::error::ConstructionError;
use crate::handler::{GeometryHandler, GeometryType};
use crate::Geography;

/// Builds [`Geography::Point`] from point and multipoint geometries.
///
/// Tuples with all coordinates NaN are empty members and are skipped.
#[derive(Debug, Clone, Default)]
pub struct PointConstructor {
    options: ConstructorOptions,
    points: Vec<SpherePoint>,
}

impl PointConstructor {
    /// Creates a new constructor.
    pub fn new(options: ConstructorOptions) -> Self {
        Self {
            options,
            points: vec![],
        }
    }
}

impl GeometryHandler for PointConstructor {
    type Error = ConstructionError;

    fn geom_start(&mut self, geometry_type: GeometryType, size: usize) -> Result<(), Self::Error> {
        if size != 0
            && !geometry_type.is_point_like()
            && geometry_type != GeometryType::GeometryCollection
        {
            return Err(ConstructionError::UnexpectedGeometry(geometry_type));
        }

        Ok(())
    }

    fn geom_end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn ring_start(&mut self, _size: usize) -> Result<(), Self::Error> {
        Err(ConstructionError::UnexpectedRing("point"))
    }

    fn ring_end(&mut self) -> Result<(), Self::Error> {
        Err(ConstructionError::UnexpectedRing("point"))
    }

    fn coords(&mut self, coords: &[f64], dims: usize) -> Result<(), Self::Error> {
        for tuple in tuples(coords, dims)? {
            if tuple[..dims.min(3)].iter().all(|c| c.is_nan()) {
                log::debug!("Skipping empty point member");
                continue;
            }

            self.points.push(to_point(&tuple, &self.options)?);
        }

        Ok(())
    }
}

impl Constructor for PointConstructor {
    fn finish(&mut self) -> Result<Geography, ConstructionError> {
        Ok(Geography::from_points(std::mem::take(&mut self.points)))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn multipoint_with_empty_member() {
        let mut constructor = PointConstructor::new(ConstructorOptions::default());
        constructor
            .geom_start(GeometryType::MultiPoint, 3)
            .expect("point input");
        constructor
            .coords(&[1.0, 2.0, f64::NAN, f64::NAN, 3.0, 4.0], 2)
            .expect("valid coordinates");
        constructor.geom_end().expect("balanced");

        let Geography::Point(geography) = constructor.finish().expect("valid points") else {
            panic!("expected a point geography");
        };
        assert_eq!(geography.points().len(), 2);
        assert_abs_diff_eq!(
            geography.points()[1],
            SpherePoint::from_degrees(4.0, 3.0),
            epsilon = 1e-15
        );

        let Geography::Point(reused) = constructor.finish().expect("empty") else {
            panic!("expected a point geography");
        };
        assert!(reused.points().is_empty());
    }

    #[test]
    fn rejects_other_geometries() {
        let mut constructor = PointConstructor::new(ConstructorOptions::default());
        assert_matches!(
            constructor.geom_start(GeometryType::LineString, 2),
            Err(ConstructionError::UnexpectedGeometry(GeometryType::LineString))
        );
        assert!(constructor.geom_start(GeometryType::LineString, 0).is_ok());
        assert_matches!(
            constructor.ring_start(4),
            Err(ConstructionError::UnexpectedRing("point"))
        );
    }
}
