use super::error::{ApiError, BrokerError};
use super::logging;
use axum::http::StatusCode;

#[test]
fn logging_init_accepts_levels() {
    // Should not panic
    logging::init("info");
    logging::init("debug");
    logging::init("warn");
}

#[test]
fn test_parse_level_falls_back_to_info() {
    assert_eq!(logging::parse_level("WARNING"), tracing::Level::WARN);
    assert_eq!(logging::parse_level("trace"), tracing::Level::TRACE);
    assert_eq!(logging::parse_level("verbose"), tracing::Level::INFO);
}

#[test]
fn test_api_error_status_codes() {
    let bad_body = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert_eq!(ApiError::from(bad_body).status(), StatusCode::BAD_REQUEST);

    let invalid = ApiError::from(BrokerError::InvalidName { kind: "topic" });
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert_eq!(invalid.to_string(), "topic name must not be empty");

    let poisoned = ApiError::from(BrokerError::Poisoned);
    assert_eq!(poisoned.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
