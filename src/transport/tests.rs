use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::broker::{Broker, Message, RetentionPolicy};
use crate::transport::message::PublishRequest;
use crate::transport::router;

// Drives one request through the router and returns status and raw body.
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn app() -> (Router, Arc<Broker>) {
    let broker = Arc::new(Broker::with_retention(RetentionPolicy::unbounded()));
    (router(broker.clone()), broker)
}

#[test]
fn test_publish_request_ignores_published_field() {
    let body = br#"{"message": "hi", "published": "2001-01-01T00:00:00Z"}"#;
    let request = PublishRequest::from_body(body).unwrap();
    assert_eq!(request.content, "hi");
}

#[test]
fn test_publish_request_requires_message() {
    assert!(PublishRequest::from_body(b"{}").is_err());
    assert!(PublishRequest::from_body(b"").is_err());
    assert!(PublishRequest::from_body(br#"{"message": 5}"#).is_err());
}

#[tokio::test]
async fn test_handle_subscribe() {
    let (app, broker) = app();

    let (status, _) = send(&app, Method::POST, "/test_topic/client", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(broker.subscriber_count("test_topic").unwrap(), 1);

    // idempotent
    let (status, _) = send(&app, Method::POST, "/test_topic/client", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(broker.subscriber_count("test_topic").unwrap(), 1);
}

#[tokio::test]
async fn test_handle_publish_without_subscribers() {
    let (app, broker) = app();

    let body = Some(r#"{"message": "hi"}"#);
    let (status, body) = send(&app, Method::POST, "/room", body).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
    assert_eq!(broker.topic_count().unwrap(), 0);
}

#[tokio::test]
async fn test_handle_publish_and_poll() {
    let (app, _broker) = app();
    send(&app, Method::POST, "/room/alice", None).await;

    let body = Some(r#"{"message": "hello"}"#);
    let (status, _) = send(&app, Method::POST, "/room", body).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, "/room/alice", None).await;
    assert_eq!(status, StatusCode::OK);

    let messages: Vec<Message> = serde_json::from_slice(&body).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "hello");

    // wire shape uses "message" and an RFC3339 "published"
    let raw: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(raw[0]["message"], json!("hello"));
    let published = raw[0]["published"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(published).is_ok());

    let (status, body) = send(&app, Method::GET, "/room/alice", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_handle_malformed_publish_body() {
    let (app, broker) = app();
    send(&app, Method::POST, "/room/alice", None).await;

    let (status, body) = send(&app, Method::POST, "/room", Some("not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].as_str().unwrap().starts_with("invalid request body"));

    let (status, _) = send(&app, Method::POST, "/room", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(broker.buffered("room", "alice").unwrap(), Some(0));
}

#[tokio::test]
async fn test_handle_unsubscribe() {
    let (app, broker) = app();
    send(&app, Method::POST, "/test_topic/client", None).await;

    let (status, _) = send(&app, Method::DELETE, "/test_topic/client", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(broker.topic_count().unwrap(), 0);

    let (status, _) = send(&app, Method::DELETE, "/test_topic/client", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_handle_poll_unknown_subscription() {
    let (app, _broker) = app();

    let (status, body) = send(&app, Method::GET, "/room/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_publish_does_not_accept_get() {
    let (app, _broker) = app();

    let (status, _) = send(&app, Method::GET, "/room", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_head_on_subscription_keeps_buffer() {
    let (app, broker) = app();
    send(&app, Method::POST, "/room/alice", None).await;
    let body = Some(r#"{"message": "hello"}"#);
    send(&app, Method::POST, "/room", body).await;

    let (status, _) = send(&app, Method::HEAD, "/room/alice", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(broker.buffered("room", "alice").unwrap(), Some(1));

    let (status, body) = send(&app, Method::GET, "/room/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    let messages: Vec<Message> = serde_json::from_slice(&body).unwrap();
    assert_eq!(messages[0].content, "hello");
}
