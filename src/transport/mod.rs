//! The `transport` module exposes the broker over HTTP.
//!
//! It defines the JSON request shapes accepted from publishers and the axum
//! router that maps verbs and paths onto broker operations and their
//! outcomes onto status codes.

pub mod http;
pub mod message;

pub use http::{router, start_http_server};

#[cfg(test)]
mod tests;
