//! Topic management
//!
//! A `Topic` maps subscriber names to their `Subscription`, and each
//! subscription owns the FIFO buffer of messages published since it was
//! created or last drained. Duplicate subscriptions are a no-op.
//!
//! Concurrency note: callers must synchronize access to `Topic` (the broker
//! keeps every topic behind its store lock).

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};

use crate::broker::message::Message;
use crate::broker::retention::RetentionPolicy;

pub type SubscriberId = String;

/// Buffered, undelivered messages of one subscriber on one topic.
#[derive(Debug, Default)]
pub struct Subscription {
    buffer: VecDeque<Message>,
}

impl Subscription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffered messages.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when nothing is waiting to be polled.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Append a message, then apply the retention policy. Returns the number
    /// of messages evicted.
    pub fn push(
        &mut self,
        message: Message,
        policy: &RetentionPolicy,
        now: DateTime<Utc>,
    ) -> usize {
        self.buffer.push_back(message);
        let mut evicted = self.expire(policy, now);

        if let Some(max) = policy.max_messages {
            while self.buffer.len() > max {
                self.buffer.pop_front();
                evicted += 1;
            }
        }
        evicted
    }

    /// Drop messages older than the policy's TTL. Buffers are in publish
    /// order, so expired messages are always at the front.
    pub fn expire(&mut self, policy: &RetentionPolicy, now: DateTime<Utc>) -> usize {
        let Some(cutoff) = policy.expiry_cutoff(now) else {
            return 0;
        };

        let mut evicted = 0;
        while self
            .buffer
            .front()
            .is_some_and(|oldest| oldest.published < cutoff)
        {
            self.buffer.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Take every buffered message, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<Message> {
        Vec::from(std::mem::take(&mut self.buffer))
    }
}

/// A topic and the subscriptions registered on it.
#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    pub subscribers: HashMap<SubscriberId, Subscription>,
}

impl Topic {
    /// Create a new topic with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashMap::new(),
        }
    }

    /// Add a subscriber with an empty buffer. Returns `false` if it was
    /// already subscribed, in which case its buffer is left untouched.
    pub fn subscribe(&mut self, id: SubscriberId) -> bool {
        if self.subscribers.contains_key(&id) {
            return false;
        }
        self.subscribers.insert(id, Subscription::new());
        true
    }

    /// Remove a subscriber, discarding anything it had not polled yet.
    pub fn unsubscribe(&mut self, id: &str) -> bool {
        self.subscribers.remove(id).is_some()
    }

    /// Mutable access to one subscriber's buffer.
    pub fn subscription_mut(&mut self, id: &str) -> Option<&mut Subscription> {
        self.subscribers.get_mut(id)
    }

    /// True once the last subscriber has left.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Append a clone of `message` to every subscriber's buffer. Returns how
    /// many subscriptions received it and how many older messages were
    /// evicted along the way.
    pub fn fan_out(
        &mut self,
        message: &Message,
        policy: &RetentionPolicy,
        now: DateTime<Utc>,
    ) -> (usize, usize) {
        let mut evicted = 0;
        for subscription in self.subscribers.values_mut() {
            evicted += subscription.push(message.clone(), policy, now);
        }
        (self.subscribers.len(), evicted)
    }
}
