//! # pollsub
//!
//! `pollsub` is a minimalist, in-memory publish/subscribe server exposed over
//! HTTP. Publishers post messages to named topics; subscribers register under
//! a name and poll to drain whatever has been published since.
//!
//! ## Core Modules
//!
//! - `broker`: the topic/subscription store with publish fan-out, subscribe,
//!   unsubscribe and drain-on-poll.
//! - `config`: loading and merging server configuration.
//! - `transport`: the HTTP router and JSON request shapes.
//! - `utils`: error types and logging setup.

pub mod broker;
pub mod config;
pub mod transport;
pub mod utils;
