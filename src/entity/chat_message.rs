use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::employee::Dept;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub dept: Dept,
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tagged: Option<bool>,
}

impl ChatMessage {
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty() || !self.images.is_empty()
    }

    pub fn is_tagged(&self) -> bool {
        self.is_tagged.unwrap_or(false)
    }
}
