use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::chat_message::ChatMessage;
use super::issue_log::IssueLog;

/// One production order ("phiếu sản xuất") for a product run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    pub id: String,
    pub product_id: String,
    pub production_code: String,
    pub status: RecordStatus,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub logs: Vec<IssueLog>,
    #[serde(default)]
    pub chat: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    New,
    Pending,
    Completed,
}

impl RecordStatus {
    pub const ALL: [RecordStatus; 3] = [RecordStatus::New, RecordStatus::Pending, RecordStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::New => "new",
            RecordStatus::Pending => "pending",
            RecordStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<RecordStatus> {
        RecordStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ProductionRecord {
    pub fn find_log(&self, log_id: &str) -> Option<&IssueLog> {
        self.logs.iter().find(|log| log.id == log_id)
    }

    pub fn pending_logs(&self) -> impl Iterator<Item = &IssueLog> {
        self.logs.iter().filter(|log| log.is_pending())
    }

    pub fn unread_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.chat.iter().filter(|message| !message.is_read)
    }
}
