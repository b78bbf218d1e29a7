//! Tests for registration response checking and session url handling.

use session_common::{
    session_id_from_url, RegisterRequest, RegistrationOutcome, SessionError,
};

// ============================================================================
// RegistrationOutcome tests
// ============================================================================

#[test]
fn test_outcome_registered() {
    let outcome = RegistrationOutcome::from_body(r#"{"url": "/ws/0a1b2c"}"#);
    assert_eq!(
        outcome,
        RegistrationOutcome::Registered {
            url: "/ws/0a1b2c".to_string()
        }
    );
}

#[test]
fn test_outcome_ignores_extra_fields() {
    let outcome = RegistrationOutcome::from_body(r#"{"url": "/socket/abc123", "ttl": 30}"#);
    let response = outcome.into_result().unwrap();
    assert_eq!(response.url, "/socket/abc123");
}

#[test]
fn test_outcome_missing_url() {
    let outcome = RegistrationOutcome::from_body(r#"{"path": "/ws/1"}"#);
    match outcome {
        RegistrationOutcome::Invalid { field, reason } => {
            assert_eq!(field, "url");
            assert_eq!(reason, "missing");
        }
        other => panic!("expected invalid outcome, got {other:?}"),
    }
}

#[test]
fn test_outcome_null_url() {
    let outcome = RegistrationOutcome::from_body(r#"{"url": null}"#);
    assert!(matches!(
        outcome,
        RegistrationOutcome::Invalid { field: "url", .. }
    ));
}

#[test]
fn test_outcome_empty_url() {
    let outcome = RegistrationOutcome::from_body(r#"{"url": ""}"#);
    assert!(matches!(
        outcome,
        RegistrationOutcome::Invalid { field: "url", .. }
    ));
}

#[test]
fn test_outcome_not_json() {
    let outcome = RegistrationOutcome::from_body("<html>502 Bad Gateway</html>");
    assert!(matches!(
        outcome,
        RegistrationOutcome::Invalid { field: "body", .. }
    ));
}

#[test]
fn test_outcome_not_an_object() {
    let outcome = RegistrationOutcome::from_body(r#"["/ws/1"]"#);
    assert!(matches!(
        outcome,
        RegistrationOutcome::Invalid { field: "body", .. }
    ));
}

#[test]
fn test_invalid_outcome_into_error_names_field() {
    let err = RegistrationOutcome::from_body("{}").into_result().unwrap_err();
    match err {
        SessionError::MalformedResponse { field, .. } => assert_eq!(field, "url"),
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================================
// RegisterRequest tests
// ============================================================================

#[test]
fn test_request_roundtrip_field_names() {
    let value = serde_json::to_value(RegisterRequest::new(99, 0)).unwrap();
    assert_eq!(value["game_id"], 99);
    assert_eq!(value["user_id"], 0);
}

// ============================================================================
// session_id_from_url tests
// ============================================================================

#[test]
fn test_session_id_from_path() {
    assert_eq!(session_id_from_url("/ws/3f2a9c").unwrap(), "3f2a9c");
}

#[test]
fn test_session_id_from_full_url() {
    assert_eq!(
        session_id_from_url("ws://localhost:9000/ws/3f2a9c").unwrap(),
        "3f2a9c"
    );
}

#[test]
fn test_session_id_trailing_slash_and_query() {
    assert_eq!(session_id_from_url("/ws/abc/").unwrap(), "abc");
    assert_eq!(session_id_from_url("/ws/abc?token=1").unwrap(), "abc");
}

#[test]
fn test_session_id_rejects_bare_host() {
    assert!(session_id_from_url("ws://localhost:9000").is_err());
    assert!(session_id_from_url("ws://localhost").is_err());
}

#[test]
fn test_session_id_rejects_empty() {
    assert!(matches!(
        session_id_from_url("/"),
        Err(SessionError::InvalidSessionUrl(_))
    ));
    assert!(session_id_from_url("").is_err());
}
