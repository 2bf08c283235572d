//! Message definitions for the broker
//!
//! `Message` is both the buffered representation and the wire shape returned
//! to pollers: `{"message": "...", "published": "<RFC3339>"}`. The
//! `published` stamp is always taken from the server clock at publish time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "message")]
    pub content: String,
    pub published: DateTime<Utc>,
}

impl Message {
    pub fn new(content: impl Into<String>, published: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            published,
        }
    }
}
