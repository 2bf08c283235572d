//! Broker engine
//!
//! This module contains the in-memory broker responsible for:
//! - tracking which subscribers are registered on which topic
//! - fanning published messages out into every subscriber's buffer
//! - draining a subscriber's buffer when it polls
//!
//! Concurrency and usage notes:
//! - All state lives behind one `Mutex`, and every operation runs start to
//!   finish inside a single critical section. A publish therefore sees a fixed
//!   subscriber set, and a poll drains exactly what it returns.
//! - The API takes `&self`, so a server shares one broker as `Arc<Broker>`.
//!   Nothing here awaits or performs I/O while holding the lock.
//! - Topics exist only while they have subscribers: the last unsubscribe
//!   removes the topic entry, so a later publish sees no subscribers.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::debug;

use crate::broker::message::Message;
use crate::broker::retention::RetentionPolicy;
use crate::broker::topic::Topic;
use crate::utils::error::BrokerError;

/// Result of [`Broker::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The message was buffered for this many subscribers.
    Delivered(usize),
    NoSubscribers,
}

/// Result of [`Broker::subscribe`]. Both variants are a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Created,
    AlreadySubscribed,
}

/// Result of [`Broker::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsubscribeOutcome {
    Removed,
    NotFound,
}

/// Result of [`Broker::poll`]. `Empty` means the subscription exists but has
/// nothing new; `NotFound` means it does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Everything that was buffered, oldest first.
    Messages(Vec<Message>),
    Empty,
    NotFound,
}

/// The topic/subscription store. Construct one per server and share it as
/// `Arc<Broker>`; every operation takes `&self` and locks internally.
#[derive(Debug, Default)]
pub struct Broker {
    topics: Mutex<HashMap<String, Topic>>,
    retention: RetentionPolicy,
}

impl Broker {
    /// Broker with the default retention policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Broker whose subscription buffers are bounded by `retention`.
    pub fn with_retention(retention: RetentionPolicy) -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
            retention,
        }
    }

    /// The retention policy applied to every subscription buffer.
    pub fn retention(&self) -> &RetentionPolicy {
        &self.retention
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Topic>>, BrokerError> {
        self.topics.lock().map_err(|_| BrokerError::Poisoned)
    }

    /// Stamp `content` with the current time and buffer it for every current
    /// subscriber of `topic`. Publishing to a topic nobody listens on changes
    /// nothing.
    pub fn publish(
        &self,
        topic: &str,
        content: impl Into<String>,
    ) -> Result<PublishOutcome, BrokerError> {
        validate_name("topic", topic)?;

        let mut topics = self.lock()?;
        let Some(entry) = topics.get_mut(topic) else {
            debug!("publish to '{topic}' dropped, no subscribers");
            return Ok(PublishOutcome::NoSubscribers);
        };

        let now = Utc::now();
        let message = Message::new(content, now);
        let (delivered, evicted) = entry.fan_out(&message, &self.retention, now);
        if evicted > 0 {
            debug!("evicted {evicted} buffered message(s) on '{topic}'");
        }
        debug!("published to '{topic}' for {delivered} subscriber(s)");

        Ok(PublishOutcome::Delivered(delivered))
    }

    /// Register `subscriber` on `topic`, creating the topic if needed.
    /// Subscribing twice is a no-op and keeps the existing buffer.
    pub fn subscribe(
        &self,
        topic: &str,
        subscriber: &str,
    ) -> Result<SubscribeOutcome, BrokerError> {
        validate_name("topic", topic)?;
        validate_name("subscriber", subscriber)?;

        let mut topics = self.lock()?;
        let entry = topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic));

        if entry.subscribe(subscriber.to_string()) {
            debug!("{subscriber} subscribed to '{topic}'");
            Ok(SubscribeOutcome::Created)
        } else {
            Ok(SubscribeOutcome::AlreadySubscribed)
        }
    }

    /// Remove the subscription and discard its unread messages. The topic is
    /// removed along with its last subscriber.
    pub fn unsubscribe(
        &self,
        topic: &str,
        subscriber: &str,
    ) -> Result<UnsubscribeOutcome, BrokerError> {
        validate_name("topic", topic)?;
        validate_name("subscriber", subscriber)?;

        let mut topics = self.lock()?;
        let Some(entry) = topics.get_mut(topic) else {
            return Ok(UnsubscribeOutcome::NotFound);
        };
        if !entry.unsubscribe(subscriber) {
            return Ok(UnsubscribeOutcome::NotFound);
        }

        if entry.is_empty() {
            topics.remove(topic);
            debug!("topic '{topic}' removed, last subscriber left");
        }
        debug!("{subscriber} unsubscribed from '{topic}'");

        Ok(UnsubscribeOutcome::Removed)
    }

    /// Return and clear everything buffered for the subscription.
    pub fn poll(&self, topic: &str, subscriber: &str) -> Result<PollOutcome, BrokerError> {
        validate_name("topic", topic)?;
        validate_name("subscriber", subscriber)?;

        let mut topics = self.lock()?;
        let Some(subscription) = topics
            .get_mut(topic)
            .and_then(|entry| entry.subscription_mut(subscriber))
        else {
            return Ok(PollOutcome::NotFound);
        };

        let expired = subscription.expire(&self.retention, Utc::now());
        if expired > 0 {
            debug!("expired {expired} message(s) for {subscriber} on '{topic}'");
        }

        if subscription.is_empty() {
            return Ok(PollOutcome::Empty);
        }

        let messages = subscription.drain();
        debug!(
            "{subscriber} drained {} message(s) from '{topic}'",
            messages.len()
        );
        Ok(PollOutcome::Messages(messages))
    }

    /// Number of topics that currently have at least one subscriber.
    pub fn topic_count(&self) -> Result<usize, BrokerError> {
        Ok(self.lock()?.len())
    }

    /// Number of subscribers on `topic`, `0` if the topic does not exist.
    pub fn subscriber_count(&self, topic: &str) -> Result<usize, BrokerError> {
        Ok(self
            .lock()?
            .get(topic)
            .map_or(0, |entry| entry.subscribers.len()))
    }

    /// Buffered message count for a subscription, or `None` if it does not
    /// exist.
    pub fn buffered(
        &self,
        topic: &str,
        subscriber: &str,
    ) -> Result<Option<usize>, BrokerError> {
        Ok(self
            .lock()?
            .get(topic)
            .and_then(|entry| entry.subscribers.get(subscriber))
            .map(|subscription| subscription.len()))
    }
}

fn validate_name(kind: &'static str, name: &str) -> Result<(), BrokerError> {
    if name.is_empty() {
        return Err(BrokerError::InvalidName { kind });
    }
    Ok(())
}
