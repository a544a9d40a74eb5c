//! Validity diagnostics of spherical geometries.

use thiserror::Error;

/// Reason why a polyline, loop or polygon is not valid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A loop has fewer than 3 vertices.
    #[error("Loop must have at least 3 vertices")]
    TooFewLoopVertices,

    /// A vertex is not a unit vector.
    #[error("Vertex {0} is not unit length")]
    NotUnitLength(usize),

    /// A vertex coordinate is NaN or infinite.
    #[error("Vertex {0} has non-finite coordinates")]
    NonFinite(usize),

    /// Two consecutive vertices are identical.
    #[error("Edge {0} is degenerate (duplicate vertex)")]
    DegenerateEdge(usize),

    /// Same vertex appears twice in a loop.
    #[error("Duplicate vertex {0}")]
    DuplicateVertices(usize),

    /// Two consecutive vertices are antipodal, so the edge between them is not defined.
    #[error("Vertices {0} and {1} are antipodal")]
    AntipodalVertices(usize, usize),

    /// Two edges of a loop or polyline cross.
    #[error("Edge {0} crosses edge {1}")]
    EdgesCross(usize, usize),

    /// One of the loops of a polygon is invalid.
    #[error("Loop {index}: {source}")]
    InvalidLoop {
        /// Ordinal of the loop within the polygon.
        index: usize,
        /// What is wrong with the loop.
        source: Box<ValidationError>,
    },

    /// Edges of two different loops of a polygon cross.
    #[error("Loop {loop_a} edge {edge_a} crosses loop {loop_b} edge {edge_b}")]
    LoopsCross {
        /// First loop.
        loop_a: usize,
        /// Edge of the first loop.
        edge_a: usize,
        /// Second loop.
        loop_b: usize,
        /// Edge of the second loop.
        edge_b: usize,
    },

    /// In oriented mode a hole has the same orientation as its parent.
    #[error("Inconsistent loop orientations detected")]
    InconsistentOrientation,
}
