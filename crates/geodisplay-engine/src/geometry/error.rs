use std::fmt;

/// Geometry that cannot be turned into a mesh.
///
/// Never surfaced to API callers: the render loop logs it and draws nothing
/// for the offending shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// A polygon needs at least three vertices.
    TooFewVertices(usize),
    /// A coordinate is NaN or infinite.
    NonFinite,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::TooFewVertices(n) => {
                write!(f, "polygon has {n} vertices, at least 3 are required")
            }
            GeometryError::NonFinite => write!(f, "geometry contains non-finite coordinates"),
        }
    }
}

impl std::error::Error for GeometryError {}
