//! Read-only figures derived from one snapshot.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::entity::{Dept, IssueLog, IssueStatus, ProductionRecord, RecordStatus};
use crate::store::RecordStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeptIssueCount {
    pub pending: usize,
    pub approved: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub customers: usize,
    pub products: usize,
    pub total_records: usize,
    pub new_records: usize,
    pub pending_records: usize,
    pub completed_records: usize,
    pub pending_approvals: usize,
    pub approved_logs: usize,
    pub issues_by_dept: BTreeMap<Dept, DeptIssueCount>,
    pub unread_messages: usize,
    pub tagged_messages: usize,
}

impl DashboardSummary {
    pub fn from_store(store: &RecordStore) -> Self {
        let mut summary = DashboardSummary {
            customers: store.customers().count(),
            products: store.products().count(),
            issues_by_dept: Dept::ALL
                .into_iter()
                .map(|dept| (dept, DeptIssueCount::default()))
                .collect(),
            ..Default::default()
        };

        for record in store.records() {
            summary.total_records += 1;
            match record.status {
                RecordStatus::New => summary.new_records += 1,
                RecordStatus::Pending => summary.pending_records += 1,
                RecordStatus::Completed => summary.completed_records += 1,
            }

            for log in &record.logs {
                let per_dept = summary.issues_by_dept.entry(log.dept).or_default();
                match log.status {
                    IssueStatus::Pending => {
                        summary.pending_approvals += 1;
                        per_dept.pending += 1;
                    }
                    IssueStatus::Approved => {
                        summary.approved_logs += 1;
                        per_dept.approved += 1;
                    }
                }
            }

            summary.unread_messages += record.unread_messages().count();
            summary.tagged_messages += record.chat.iter().filter(|m| m.is_tagged()).count();
        }

        summary
    }
}

/// The record's logs grouped by date, dates in order of first appearance.
pub fn logs_grouped_by_date(record: &ProductionRecord) -> Vec<(NaiveDate, Vec<&IssueLog>)> {
    let mut groups: Vec<(NaiveDate, Vec<&IssueLog>)> = Vec::new();
    for log in &record.logs {
        match groups.iter_mut().find(|(date, _)| *date == log.date) {
            Some((_, logs)) => logs.push(log),
            None => groups.push((log.date, vec![log])),
        }
    }
    groups
}
