//! HTTP routes over the broker.
//!
//! | Route                          | Operation   |
//! |--------------------------------|-------------|
//! | `POST /{topic}`                | publish     |
//! | `POST /{topic}/{subscriber}`   | subscribe   |
//! | `DELETE /{topic}/{subscriber}` | unsubscribe |
//! | `GET /{topic}/{subscriber}`    | poll        |
//!
//! Handlers call into the broker synchronously and never hold its lock
//! across an `.await`.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::broker::{Broker, PollOutcome, PublishOutcome, UnsubscribeOutcome};
use crate::transport::message::PublishRequest;
use crate::utils::error::ApiError;

/// Build the router serving the four broker operations.
pub fn router(broker: Arc<Broker>) -> Router {
    Router::new()
        .route("/{topic}", post(publish))
        .route(
            "/{topic}/{subscriber}",
            post(subscribe).delete(unsubscribe).get(poll),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(broker)
}

/// Serve the broker on `addr` until the listener fails.
pub async fn start_http_server(addr: &str, broker: Arc<Broker>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(broker)).await
}

async fn publish(
    State(broker): State<Arc<Broker>>,
    Path(topic): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let request = PublishRequest::from_body(&body)?;

    match broker.publish(&topic, request.content)? {
        PublishOutcome::Delivered(_) => Ok(StatusCode::CREATED),
        PublishOutcome::NoSubscribers => Ok(StatusCode::NO_CONTENT),
    }
}

async fn subscribe(
    State(broker): State<Arc<Broker>>,
    Path((topic, subscriber)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    broker.subscribe(&topic, &subscriber)?;
    Ok(StatusCode::CREATED)
}

async fn unsubscribe(
    State(broker): State<Arc<Broker>>,
    Path((topic, subscriber)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    match broker.unsubscribe(&topic, &subscriber)? {
        UnsubscribeOutcome::Removed => Ok(StatusCode::NO_CONTENT),
        UnsubscribeOutcome::NotFound => Ok(StatusCode::NOT_FOUND),
    }
}

async fn poll(
    method: Method,
    State(broker): State<Arc<Broker>>,
    Path((topic, subscriber)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    // axum routes HEAD to GET handlers; a HEAD must not drain a body it drops.
    if method == Method::HEAD {
        return Ok((
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, POST, DELETE")],
        )
            .into_response());
    }

    let messages = match broker.poll(&topic, &subscriber)? {
        PollOutcome::Messages(messages) => messages,
        PollOutcome::Empty => return Ok(StatusCode::NO_CONTENT.into_response()),
        PollOutcome::NotFound => return Ok(StatusCode::NOT_FOUND.into_response()),
    };

    // The drain above has already committed; an encoding failure loses the batch.
    let body = serde_json::to_vec(&messages).map_err(ApiError::Encode)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
