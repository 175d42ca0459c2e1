//! Error types for training.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can stop a training run.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Filesystem error while writing or reading a checkpoint.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unreadable trainer configuration.
    #[error("invalid trainer config: {message}")]
    Config { message: String },

    /// The component was asked for a loss and returned none.
    #[error("the component did not return a loss from the input")]
    MissingLoss,

    /// A metric needed by the scheduler or checkpointing was not computed.
    #[error("metric '{name}' not found in evaluation metrics")]
    MissingMetric { name: String },

    /// Error reported by the trained component.
    #[error("component error: {message}")]
    Component { message: String },
}

impl TrainingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrainingError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for training operations.
pub type TrainingResult<T> = Result<T, TrainingError>;
