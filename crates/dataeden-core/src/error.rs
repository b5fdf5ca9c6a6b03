use serde::Serialize;
use thiserror::Error;

/// Core error type shared across DataEden crates.
///
/// Every fatal kind gets its own variant so a caller can render a specific
/// message instead of a generic failure.
#[derive(Debug, Error)]
pub enum Error {
    /// The address does not name a known database family.
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),
    /// A handle could not be constructed for the target.
    #[error("connection error: {0}")]
    Connection(String),
    /// An introspection query failed.
    #[error("database error: {0}")]
    Db(String),
    /// Every column of the table is filled by the database itself.
    #[error("nothing to generate: no column of table '{0}' requires generated values")]
    NothingToGenerate(String),
    /// The external generation service refused or failed the request.
    #[error("remote service error ({failure}): {message}")]
    RemoteService {
        failure: RemoteFailure,
        message: String,
    },
    /// The external generation service answered with an unexpected shape.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// The grid handed to the executor does not match the column list.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    /// The database rejected the insert batch.
    #[error("insertion error: {0}")]
    Insertion(String),
}

/// Convenience alias for results returned by DataEden crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Category of a remote generation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteFailure {
    MalformedRequest,
    Authentication,
    InsufficientBalance,
    InvalidParameters,
    RateLimited,
    ServerFault,
    ServerBusy,
    UnexpectedStatus(u16),
    /// An error object embedded in an otherwise successful response.
    Upstream,
    Unreachable,
    NotConfigured,
}

impl RemoteFailure {
    /// Map a non-success HTTP status to its failure category.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => RemoteFailure::MalformedRequest,
            401 => RemoteFailure::Authentication,
            402 => RemoteFailure::InsufficientBalance,
            422 => RemoteFailure::InvalidParameters,
            429 => RemoteFailure::RateLimited,
            500 => RemoteFailure::ServerFault,
            503 => RemoteFailure::ServerBusy,
            other => RemoteFailure::UnexpectedStatus(other),
        }
    }
}

impl std::fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteFailure::MalformedRequest => write!(f, "malformed request"),
            RemoteFailure::Authentication => write!(f, "authentication failed"),
            RemoteFailure::InsufficientBalance => write!(f, "insufficient balance"),
            RemoteFailure::InvalidParameters => write!(f, "invalid parameters"),
            RemoteFailure::RateLimited => write!(f, "rate limited"),
            RemoteFailure::ServerFault => write!(f, "server fault"),
            RemoteFailure::ServerBusy => write!(f, "server busy"),
            RemoteFailure::UnexpectedStatus(status) => write!(f, "unexpected status {status}"),
            RemoteFailure::Upstream => write!(f, "upstream error"),
            RemoteFailure::Unreachable => write!(f, "unreachable"),
            RemoteFailure::NotConfigured => write!(f, "not configured"),
        }
    }
}
