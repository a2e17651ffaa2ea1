//! Error types for surface generation

use thiserror::Error;

/// Errors that can occur before a pipeline run starts
///
/// Degenerate inputs (too few samples, flat value ranges) are not errors:
/// every stage returns an empty result for them instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Input samples could not be used
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for surface operations
pub type Result<T> = std::result::Result<T, SurfaceError>;
