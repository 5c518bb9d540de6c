use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::employee::Dept;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLog {
    pub id: String,
    pub date: NaiveDate,
    pub record_id: String,
    pub dept: Dept,
    pub error_content: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub fix_content: String,
    pub note: String,
    pub status: IssueStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Pending,
    Approved,
}

impl IssueLog {
    pub fn is_pending(&self) -> bool {
        self.status == IssueStatus::Pending
    }

    /// Status and both approval fields move together.
    pub fn approval_is_consistent(&self) -> bool {
        match self.status {
            IssueStatus::Pending => self.approved_by.is_none() && self.approved_at.is_none(),
            IssueStatus::Approved => self.approved_by.is_some() && self.approved_at.is_some(),
        }
    }

    pub fn approved(mut self, approver_id: &str, at: DateTime<Utc>) -> Self {
        self.status = IssueStatus::Approved;
        self.approved_by = Some(approver_id.to_string());
        self.approved_at = Some(at);
        self
    }
}
