//! Error taxonomy for remote and local-session operations.

use thiserror::Error;

/// Errors returned by the accessor, credentials loading, and backups.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request hit the 30-second deadline. Aborted, no retry.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),
    /// Any other transport-level failure, including 5xx responses.
    #[error("transport error: {0}")]
    Transport(String),
    /// HTTP 401. Fatal; the operator must refresh the credentials file.
    #[error("authentication failed (401): refresh the credentials file")]
    Unauthorized,
    /// HTTP 404 for the requested config key.
    #[error("config not found: {0}")]
    NotFound(String),
    /// HTTP 400; the service rejected the posted record.
    #[error("record rejected by the service: {0}")]
    Validation(String),
    /// A 2xx body that carried an error object instead of a record. Usually
    /// stale credentials.
    #[error("service returned an error body: {0}")]
    Service(String),
    /// The response body could not be parsed as expected.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The credentials file is absent. Fatal precondition for every remote
    /// operation.
    #[error("credentials file not found at {0}; create it with {{\"userid\", \"apikey\"}}")]
    CredentialsMissing(String),
    /// The credentials file could not be read or parsed.
    #[error("failed to load credentials: {0}")]
    CredentialsInvalid(String),
    /// Local backup I/O failed.
    #[error("backup io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serializing a record for a backup file failed.
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}
