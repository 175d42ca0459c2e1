//! Error types for post-processing operations.

use medkit::{DocumentError, Uid};
use thiserror::Error;

/// Errors raised while deriving new documents or annotations.
#[derive(Debug, Error)]
pub enum PostprocessError {
    /// The document layer refused an operation.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// An entity could not be rebased onto its segment.
    #[error("entity {entity} has spans starting before segment {segment}")]
    SpanOutsideSegment { entity: Uid, segment: Uid },
}

/// Result type for post-processing operations.
pub type PostprocessResult<T> = Result<T, PostprocessError>;
