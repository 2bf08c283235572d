//! Buffer retention
//!
//! A subscriber that never polls would otherwise grow its buffer without
//! bound. `RetentionPolicy` caps every subscription buffer by count (oldest
//! messages are evicted first) and by age (messages older than the TTL are
//! dropped the next time the buffer is touched).

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::BrokerSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub max_messages: Option<usize>,
    pub ttl: Option<TimeDelta>,
}

impl RetentionPolicy {
    /// No count bound and no expiry.
    pub fn unbounded() -> Self {
        Self {
            max_messages: None,
            ttl: None,
        }
    }

    /// Build a policy from raw settings values, where `0` disables a bound.
    /// TTLs beyond what `TimeDelta` can hold saturate to `TimeDelta::MAX`.
    pub fn new(max_messages: usize, ttl_secs: u64) -> Self {
        let ttl = match ttl_secs {
            0 => None,
            secs => Some(
                i64::try_from(secs)
                    .ok()
                    .and_then(TimeDelta::try_seconds)
                    .unwrap_or(TimeDelta::MAX),
            ),
        };
        Self {
            max_messages: (max_messages > 0).then_some(max_messages),
            ttl,
        }
    }

    /// Oldest `published` stamp still retained at `now`.
    pub fn expiry_cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.ttl.and_then(|ttl| now.checked_sub_signed(ttl))
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(1000, 3600)
    }
}

impl From<&BrokerSettings> for RetentionPolicy {
    fn from(settings: &BrokerSettings) -> Self {
        Self::new(settings.max_buffered_messages, settings.message_ttl_secs)
    }
}
