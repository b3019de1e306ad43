//! Error types for the Centro client.
//!
//! Every failed API call surfaces as an [`ErrorOutcome`]: a human-readable
//! message plus an [`ErrorKind`] for callers that do want to branch.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for API calls.
pub type Result<T> = std::result::Result<T, ErrorOutcome>;

/// Message carried by every authentication failure.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Where a request failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend answered 401; the session has been cleared.
    AuthenticationExpired,
    /// The backend answered with a non-success status other than 401.
    RequestFailed {
        /// HTTP status code.
        status: u16,
    },
    /// The call could not be completed (connectivity, timeout, TLS).
    TransportFailed,
    /// A success response carried a body that is not the expected JSON.
    MalformedResponse,
    /// The request could not be built (payload encoding, bad endpoint).
    InvalidRequest,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationExpired => write!(f, "authentication_expired"),
            Self::RequestFailed { status } => write!(f, "request_failed({status})"),
            Self::TransportFailed => write!(f, "transport_failed"),
            Self::MalformedResponse => write!(f, "malformed_response"),
            Self::InvalidRequest => write!(f, "invalid_request"),
        }
    }
}

/// Uniform failure returned by the request dispatcher.
///
/// `Display` prints the message alone, so UI code can show it directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ErrorOutcome {
    kind: ErrorKind,
    message: String,
}

impl ErrorOutcome {
    /// Creates an outcome of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The outcome of a 401 response.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::AuthenticationExpired, UNAUTHORIZED_MESSAGE)
    }

    /// A non-success response with the given status.
    #[must_use]
    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestFailed { status }, message)
    }

    /// A transport-level failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransportFailed, message)
    }

    /// A success response whose body could not be decoded.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    /// A request that could not be built.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    /// The failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, if the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::AuthenticationExpired => Some(401),
            ErrorKind::RequestFailed { status } => Some(status),
            _ => None,
        }
    }

    /// Returns true if this outcome cleared the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.kind, ErrorKind::AuthenticationExpired)
    }
}

/// Failure of the underlying HTTP transport.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    /// Creates a transport error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Failures of durable session storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("session storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// The session could not be encoded.
    #[error("failed to encode session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Invalid client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL is empty, unparseable or not http(s).
    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The base path does not start with `/`.
    #[error("invalid base path '{0}': must start with '/'")]
    InvalidBasePath(String),

    /// The timeout is zero or unparseable.
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    /// No location is known for the session file.
    #[error("no session file location: set CENTRO_SESSION_FILE")]
    NoSessionPath,

    /// The session file location is unusable.
    #[error("unusable session file '{}': {reason}", path.display())]
    SessionPath {
        /// The offending path.
        path: PathBuf,
        /// Why it is unusable.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_displays_message_only() {
        let err = ErrorOutcome::request_failed(404, "job not found");
        assert_eq!(err.to_string(), "job not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn unauthorized_outcome() {
        let err = ErrorOutcome::unauthorized();
        assert_eq!(err.to_string(), "Unauthorized");
        assert!(err.is_unauthorized());
        assert_eq!(err.kind(), ErrorKind::AuthenticationExpired);
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn transport_outcome_has_no_status() {
        let err = ErrorOutcome::transport("connection refused");
        assert_eq!(err.kind(), ErrorKind::TransportFailed);
        assert_eq!(err.status(), None);
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn kind_display() {
        assert_eq!(
            ErrorKind::RequestFailed { status: 500 }.to_string(),
            "request_failed(500)"
        );
        assert_eq!(ErrorKind::TransportFailed.to_string(), "transport_failed");
    }

    #[test]
    fn storage_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::from(io);
        assert!(matches!(err, StorageError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidUrl {
            url: "ftp://x".into(),
            reason: "scheme must be http or https".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid base URL 'ftp://x': scheme must be http or https"
        );
    }
}
