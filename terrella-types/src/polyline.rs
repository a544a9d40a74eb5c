use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{edge, SpherePoint, ValidationError};

/// A chain of geodesic edges connecting consecutive vertices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    vertices: Vec<SpherePoint>,
}

impl Polyline {
    /// Creates a polyline from its vertices.
    pub fn new(vertices: Vec<SpherePoint>) -> Self {
        Self { vertices }
    }

    /// Vertices of the polyline.
    pub fn vertices(&self) -> &[SpherePoint] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polyline has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates over the edges of the polyline.
    pub fn edges(&self) -> impl Iterator<Item = (&SpherePoint, &SpherePoint)> + '_ {
        self.vertices.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Returns true if the first and the last vertices are identical.
    pub fn is_closed(&self) -> bool {
        self.vertices.len() > 2 && self.vertices.first() == self.vertices.last()
    }

    /// Total angular length in radians.
    pub fn length(&self) -> f64 {
        self.edges().map(|(a, b)| a.angle(b)).sum()
    }

    /// Sum of the edge centroids weighted by edge length. Not normalized.
    pub fn centroid(&self) -> Vector3<f64> {
        self.edges()
            .map(|(a, b)| edge::true_centroid(a, b))
            .fold(Vector3::zeros(), |acc, v| acc + v)
    }

    /// Closest point of the polyline to `point` together with the index of the vertex following it.
    ///
    /// Returns `None` for an empty polyline.
    pub fn project(&self, point: &SpherePoint) -> Option<(SpherePoint, usize)> {
        match self.vertices.len() {
            0 => None,
            1 => Some((self.vertices[0], 1)),
            _ => {
                let mut best: Option<(SpherePoint, usize, f64)> = None;
                for (i, (a, b)) in self.edges().enumerate() {
                    let projected = edge::project(point, a, b);
                    let distance = projected.angle(point);
                    if best.map_or(true, |(_, _, d)| distance < d) {
                        best = Some((projected, i + 1, distance));
                    }
                }

                best.map(|(p, next, _)| (p, next))
            }
        }
    }

    /// Fraction of the length of the polyline preceding `point`, which must lie on the edge ending at `next_vertex`.
    pub fn uninterpolate(&self, point: &SpherePoint, next_vertex: usize) -> f64 {
        if self.vertices.len() < 2 {
            return 0.0;
        }

        let total = self.length();
        if total == 0.0 {
            return 0.0;
        }

        let next_vertex = next_vertex.clamp(1, self.vertices.len() - 1);
        let prefix: f64 = self.vertices[..next_vertex]
            .windows(2)
            .map(|w| w[0].angle(&w[1]))
            .sum();
        let partial = prefix + self.vertices[next_vertex - 1].angle(point);

        (partial / total).min(1.0)
    }

    /// Point at the given fraction of the polyline's length. Fractions outside `[0, 1]` are clamped.
    ///
    /// Returns `None` for an empty polyline.
    pub fn interpolate(&self, fraction: f64) -> Option<SpherePoint> {
        let first = self.vertices.first()?;
        if fraction <= 0.0 || self.vertices.len() == 1 {
            return Some(*first);
        }

        let target = fraction.min(1.0) * self.length();
        let mut covered = 0.0;
        for (a, b) in self.edges() {
            let length = a.angle(b);
            if covered + length >= target && length > 0.0 {
                return Some(edge::interpolate(a, b, (target - covered) / length));
            }
            covered += length;
        }

        self.vertices.last().copied()
    }

    /// Checks that the polyline is a valid chain: unit length finite vertices and no degenerate or antipodal edges.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (i, v) in self.vertices.iter().enumerate() {
            if !(v.x().is_finite() && v.y().is_finite() && v.z().is_finite()) {
                return Err(ValidationError::NonFinite(i));
            }
            if !v.is_unit_length() {
                return Err(ValidationError::NotUnitLength(i));
            }
        }

        for (i, (a, b)) in self.edges().enumerate() {
            if a == b {
                return Err(ValidationError::DegenerateEdge(i));
            }
            if *a == -*b {
                return Err(ValidationError::AntipodalVertices(i, i + 1));
            }
        }

        Ok(())
    }
}

impl From<Vec<SpherePoint>> for Polyline {
    fn from(value: Vec<SpherePoint>) -> Self {
        Self::new(value)
    }
}
