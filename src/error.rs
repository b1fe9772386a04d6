//! Error types for graph operations.

use thiserror::Error;

use crate::series::SeriesId;

/// Errors reported by [`Graph`](crate::graph::Graph) operations.
///
/// None of these are fatal: the failing operation is skipped and the graph
/// keeps its previous state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A series operation referenced a handle the graph never issued.
    #[error("unknown series handle {0:?}")]
    InvalidHandle(SeriesId),

    /// A series was requested with zero capacity.
    #[error("series capacity must be at least 1")]
    InvalidCapacity,

    /// A zoom or offset would make the transform singular or non-finite.
    #[error("transform would become degenerate")]
    DegenerateTransform,

    /// A follow window width was not finite and positive.
    #[error("follow window width must be finite and positive, got {0}")]
    InvalidWindow(f64),

    /// A gesture arrived with an empty viewport.
    #[error("viewport size must be positive in both dimensions")]
    InvalidViewportSize,

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
