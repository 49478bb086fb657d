//! Error types for the nesting engine.

use thiserror::Error;

/// Errors reported while validating or loading a nesting problem.
///
/// The placement engine itself never fails: "no feasible placement" and an
/// expired deadline are ordinary outcomes, not errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A piece polygon is malformed.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The plate polygon is malformed.
    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An instance description could not be parsed.
    #[error("parse error: {0}")]
    ParseError(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Broken internal invariant.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
