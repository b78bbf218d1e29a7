//! Registration protocol for the websocket game server.
//!
//! `POST /register` takes a [`RegisterRequest`] and answers with
//! `{"url": "/ws/<id>"}`. The body is shape-checked into a
//! [`RegistrationOutcome`] rather than trusted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SessionError, SessionResult};

/// Path of the registration endpoint, relative to the HTTP host.
pub const REGISTER_PATH: &str = "/register";

/// Path of the health endpoint, relative to the HTTP host.
pub const HEALTH_PATH: &str = "/health";

/// Field of the registration response holding the websocket path.
pub const URL_FIELD: &str = "url";

/// Request body for the register endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub game_id: u32,
    pub user_id: u32,
}

impl RegisterRequest {
    pub fn new(game_id: u32, user_id: u32) -> Self {
        Self { game_id, user_id }
    }
}

/// Response body of the register endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub url: String,
}

/// Result of checking a registration response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The body carried a usable websocket path.
    Registered { url: String },
    /// The body was not shaped like a registration response.
    Invalid { field: &'static str, reason: String },
}

impl RegistrationOutcome {
    /// Check a raw response body.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(e) => RegistrationOutcome::Invalid {
                field: "body",
                reason: format!("not valid JSON: {}", e),
            },
        }
    }

    /// Check an already decoded response body.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return RegistrationOutcome::Invalid {
                field: "body",
                reason: "expected a JSON object".to_string(),
            };
        };

        match object.get(URL_FIELD) {
            None | Some(Value::Null) => RegistrationOutcome::Invalid {
                field: URL_FIELD,
                reason: "missing".to_string(),
            },
            Some(Value::String(url)) if url.is_empty() => RegistrationOutcome::Invalid {
                field: URL_FIELD,
                reason: "empty".to_string(),
            },
            Some(Value::String(url)) => RegistrationOutcome::Registered { url: url.clone() },
            Some(other) => RegistrationOutcome::Invalid {
                field: URL_FIELD,
                reason: format!("expected a string, got {}", json_kind(other)),
            },
        }
    }

    /// Convert into a result, turning invalid shapes into errors.
    pub fn into_result(self) -> SessionResult<RegisterResponse> {
        match self {
            RegistrationOutcome::Registered { url } => Ok(RegisterResponse { url }),
            RegistrationOutcome::Invalid { field, reason } => {
                Err(SessionError::MalformedResponse {
                    field: field.to_string(),
                    reason,
                })
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract the session id from a registered websocket path or full url.
///
/// The id is the last non-empty path segment, e.g. `/ws/3f2a` -> `3f2a`.
pub fn session_id_from_url(url: &str) -> SessionResult<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let id = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':'))
        .ok_or_else(|| SessionError::InvalidSessionUrl(url.to_string()))?;

    // A bare host like "ws://localhost:9000" has no session segment
    if path.trim_end_matches('/').ends_with(&format!("//{}", id)) {
        return Err(SessionError::InvalidSessionUrl(url.to_string()));
    }

    Ok(id)
}

/// Path of the unregister endpoint for a session id.
pub fn unregister_path(session_id: &str) -> String {
    format!("{}/{}", REGISTER_PATH, session_id)
}
