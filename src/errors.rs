//! Error types for the document model.

use thiserror::Error;

use crate::{Span, Uid};

/// Errors raised while building or reading documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// An item with the same identifier is already attached.
    #[error("{kind} with uid {uid} already attached")]
    DuplicateUid { kind: &'static str, uid: Uid },

    /// A span does not fit inside the document text.
    #[error("span {span} is out of bounds for text of length {text_len}")]
    SpanOutOfBounds { span: Span, text_len: usize },

    /// A document could not be (de)serialized.
    #[error("serialization failed: {message}")]
    Serialization { message: String },
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
