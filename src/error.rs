//! Error types for the geometry kernel.

use std::fmt;

/// Inputs the geometry kernel refuses to reason about.
///
/// A line that simply misses a circle is not an error: the intersection
/// functions return `Ok(None)` for that. These variants cover inputs for which
/// no well-defined answer exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// Radius is negative, NaN or infinite.
    InvalidRadius(f64),
    /// A coordinate is NaN or infinite.
    NonFinitePoint,
    /// Origin and destination of a line are the same point.
    DegenerateLine,
    /// Both circles are the same circle, so they share infinitely many points.
    CoincidentCircles,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidRadius(radius) => write!(f, "invalid radius: {radius}"),
            GeometryError::NonFinitePoint => write!(f, "point has a non-finite coordinate"),
            GeometryError::DegenerateLine => {
                write!(f, "line origin and destination are the same point")
            }
            GeometryError::CoincidentCircles => {
                write!(f, "circles coincide: no unique intersection")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Result type for geometry queries.
pub type GeometryResult<T> = Result<T, GeometryError>;
