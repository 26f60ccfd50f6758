use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sentiment::Sentiment;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Visitor,
    Assistant,
}

/// One entry of a conversation transcript. Never mutated once appended.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>, sentiment: Option<Sentiment>) -> Self {
        ChatMessage {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            created_at: Utc::now(),
            sentiment,
        }
    }

    pub fn visitor(text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self::new(Sender::Visitor, text, Some(sentiment))
    }

    /// Assistant lines are always tagged positive.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text, Some(Sentiment::Positive))
    }
}
