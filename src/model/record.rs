use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{ChatMessage, IssueLog, ProductionRecord, RecordStatus};

/// Partial update of a production record. Present fields replace the record's
/// field, absent fields are kept. `id` and `productId` are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<IssueLog>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<Vec<ChatMessage>>,
}

impl RecordPatch {
    pub fn status(status: RecordStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn touched(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = Some(at);
        self
    }

    pub fn with_production_code(mut self, code: &str) -> Self {
        self.production_code = Some(code.to_string());
        self
    }

    pub fn with_logs(mut self, logs: Vec<IssueLog>) -> Self {
        self.logs = Some(logs);
        self
    }

    pub fn with_chat(mut self, chat: Vec<ChatMessage>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &RecordPatch::default()
    }

    /// Shallow merge into a copy of `record`.
    pub fn merge_into(&self, record: &ProductionRecord) -> ProductionRecord {
        let mut merged = record.clone();
        if let Some(code) = &self.production_code {
            merged.production_code = code.clone();
        }
        if let Some(status) = self.status {
            merged.status = status;
        }
        if let Some(at) = self.last_updated {
            merged.last_updated = at;
        }
        if let Some(logs) = &self.logs {
            merged.logs = logs.clone();
        }
        if let Some(chat) = &self.chat {
            merged.chat = chat.clone();
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ProductionRecord {
        ProductionRecord {
            id: "r1".to_string(),
            product_id: "p1".to_string(),
            production_code: "LSX-1".to_string(),
            status: RecordStatus::New,
            last_updated: DateTime::parse_from_rfc3339("2023-11-20T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            logs: vec![],
            chat: vec![],
        }
    }

    #[test]
    fn empty_patch_keeps_every_field() {
        let patch = RecordPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.merge_into(&record()), record());
    }

    #[test]
    fn present_fields_replace_and_absent_fields_stay() {
        let patch = RecordPatch::status(RecordStatus::Completed).with_production_code("LSX-2");
        let merged = patch.merge_into(&record());

        assert_eq!(merged.status, RecordStatus::Completed);
        assert_eq!(merged.production_code, "LSX-2");
        assert_eq!(merged.last_updated, record().last_updated);
        assert_eq!(merged.id, "r1");
    }

    #[test]
    fn patch_deserializes_from_partial_json() {
        let patch: RecordPatch = serde_json::from_str(r#"{"status":"completed"}"#).unwrap();
        assert_eq!(patch, RecordPatch::status(RecordStatus::Completed));
    }
}
