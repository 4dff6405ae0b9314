use thiserror::Error;

/// Failure to turn a map payload into a country set.
///
/// Never reaches the frame loop: callers fall back to an empty set.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse map payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("map payload has no object named {0:?}")]
    MissingObject(String),
    #[error("map payload has {count} arcs (max {max})")]
    TooManyArcs { count: usize, max: usize },
    #[error("map payload has {count} arc points (max {max})")]
    TooManyPoints { count: usize, max: usize },
    #[error("map object has {count} geometries (max {max})")]
    TooManyGeometries { count: usize, max: usize },
}

impl LoadError {
    /// Stable short code used at the JS boundary.
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Parse(_) => "invalid_payload",
            LoadError::MissingObject(_) => "missing_object",
            LoadError::TooManyArcs { .. }
            | LoadError::TooManyPoints { .. }
            | LoadError::TooManyGeometries { .. } => "too_large",
        }
    }
}
