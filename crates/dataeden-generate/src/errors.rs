use thiserror::Error;

use dataeden_core::RemoteFailure;

/// Errors emitted by the generation engines.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation service {failure}: {message}")]
    Remote {
        failure: RemoteFailure,
        message: String,
    },
    #[error("unexpected response from generation service: {0}")]
    Protocol(String),
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedGrid {
        row: usize,
        found: usize,
        expected: usize,
    },
}

impl GenerationError {
    pub(crate) fn remote(failure: RemoteFailure, message: impl Into<String>) -> Self {
        Self::Remote {
            failure,
            message: message.into(),
        }
    }
}

impl From<GenerationError> for dataeden_core::Error {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Remote { failure, message } => {
                dataeden_core::Error::RemoteService { failure, message }
            }
            GenerationError::Protocol(message) => dataeden_core::Error::Protocol(message),
            err @ GenerationError::RaggedGrid { .. } => {
                dataeden_core::Error::InvalidGrid(err.to_string())
            }
        }
    }
}
