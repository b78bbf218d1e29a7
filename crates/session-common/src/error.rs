//! Error types for session registration and hook execution.

use thiserror::Error;

/// Result type alias using SessionError.
pub type SessionResult<T> = Result<T, SessionError>;

/// Primary error type for registration and hook operations.
#[derive(Debug, Error)]
pub enum SessionError {
    // === Transport Errors ===
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    // === Protocol Errors ===
    #[error("Malformed registration response, field '{field}': {reason}")]
    MalformedResponse { field: String, reason: String },

    #[error("Invalid session url: {0}")]
    InvalidSessionUrl(String),

    // === Hook Errors ===
    #[error("Unknown hook: {0}")]
    UnknownHook(String),

    #[error("Hook '{0}' returned without signalling completion")]
    NotSignalled(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SessionError {
    /// Whether the failure happened before a response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, SessionError::Network(_) | SessionError::Timeout)
    }

    /// HTTP status carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SessionError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return SessionError::Timeout;
        }
        match err.status() {
            Some(status) => SessionError::UnexpectedStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => SessionError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::MalformedResponse {
            field: "body".to_string(),
            reason: format!("JSON error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(SessionError::Timeout.is_transport());
        assert!(SessionError::Network("refused".into()).is_transport());
        assert!(!SessionError::InvalidSessionUrl("/".into()).is_transport());
    }

    #[test]
    fn test_status_code() {
        let err = SessionError::UnexpectedStatus {
            status: 503,
            url: "http://localhost/register".into(),
        };
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(SessionError::Timeout.status_code(), None);
    }

    #[test]
    fn test_json_error_names_body() {
        let err: SessionError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        match err {
            SessionError::MalformedResponse { field, .. } => assert_eq!(field, "body"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_message_mentions_field() {
        let err = SessionError::MalformedResponse {
            field: "url".into(),
            reason: "missing".into(),
        };
        assert!(err.to_string().contains("'url'"));
    }
}
