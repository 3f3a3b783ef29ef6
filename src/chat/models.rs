use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl ChatMessage {
    pub fn new(sender_id: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id,
            content,
            timestamp: Utc::now(),
            read: false,
        }
    }
}
