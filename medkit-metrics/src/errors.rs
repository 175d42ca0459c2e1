//! Error types for agreement and classification metrics.

use thiserror::Error;

/// Errors raised when metric inputs do not allow a meaningful score.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetricsError {
    /// Annotator rows (or true/predicted sequences) differ in length.
    #[error("number of labels should be the same for all annotators: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Agreement needs at least two distinct labels to be defined.
    #[error("there must be more than one label in annotators data, found {found}")]
    NotEnoughLabels { found: usize },

    /// Every unit rated by two or more annotators carries the same single
    /// label, so agreement by chance cannot be estimated.
    #[error("pairable units hold a single label across {labels} labels seen, expected disagreement is zero")]
    NoExpectedDisagreement { labels: usize },

    /// True and predicted labels mix value types whose class names collide.
    #[error("labels of attribute '{label}' mix {first} and {second} values")]
    MixedLabelTypes {
        label: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("at least two annotators are needed, found {found}")]
    NotEnoughAnnotators { found: usize },

    #[error("no attribute with label '{label}' was found in document {doc}")]
    MissingAttribute { label: String, doc: String },

    #[error("attribute '{label}' holds a {found} value, only str, int or bool are supported")]
    UnsupportedValue { label: String, found: &'static str },
}

/// Result type for metric computations.
pub type MetricsResult<T> = Result<T, MetricsError>;
