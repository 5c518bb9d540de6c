//! In-memory customer → product → production record hierarchy.
//!
//! A [`RecordStore`] is an immutable snapshot. Writes return a new snapshot in
//! which every node on the path from the root to the changed record is a fresh
//! allocation, while untouched customers, products and records stay shared
//! with the previous snapshot. Anyone still holding the old value sees no
//! change.

pub mod invariants;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::entity::{ChatMessage, Customer, IssueLog, Product, ProductionRecord};
use crate::model::global_error::{AppError, ErrorCode};
use crate::model::record::RecordPatch;

/// What a write does when it cannot be applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePolicy {
    /// Return the snapshot unchanged.
    #[default]
    Lenient,
    /// Return the error.
    Strict,
}

impl FromStr for UpdatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(UpdatePolicy::Lenient),
            "strict" => Ok(UpdatePolicy::Strict),
            other => Err(format!("Unknown update policy '{}'. Must be one of: lenient, strict", other)),
        }
    }
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdatePolicy::Lenient => write!(f, "lenient"),
            UpdatePolicy::Strict => write!(f, "strict"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordStore {
    customers: Vec<Arc<Customer>>,
}

/// A record together with the product and customer that own it.
#[derive(Debug, Clone, Copy)]
pub struct RecordLocation<'a> {
    pub customer: &'a Customer,
    pub product: &'a Product,
    pub record: &'a ProductionRecord,
}

impl RecordStore {
    /// Build a store, rejecting any hierarchy that breaks an invariant.
    pub fn new(customers: Vec<Customer>) -> Result<Self, AppError> {
        let customers: Vec<Arc<Customer>> = customers.into_iter().map(Arc::new).collect();
        invariants::ensure(invariants::violations(&customers))?;

        let store = Self { customers };
        debug!(
            customers = store.customers.len(),
            records = store.records().count(),
            "record store built"
        );
        Ok(store)
    }

    // ------------------------------------------------------------------
    // reads
    // ------------------------------------------------------------------

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter().map(Arc::as_ref)
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.customers()
            .flat_map(|customer| customer.products.iter().map(Arc::as_ref))
    }

    pub fn records(&self) -> impl Iterator<Item = &ProductionRecord> {
        self.products()
            .flat_map(|product| product.records.iter().map(Arc::as_ref))
    }

    pub fn find_customer_by_id(&self, customer_id: &str) -> Option<&Customer> {
        self.customers().find(|customer| customer.id == customer_id)
    }

    /// Linear search through every customer's products. `None` means "no selection".
    pub fn find_product_by_id(&self, product_id: &str) -> Option<&Product> {
        self.customers()
            .find_map(|customer| customer.find_product(product_id))
    }

    pub fn find_record_by_id(&self, record_id: &str) -> Option<&ProductionRecord> {
        self.find_record_location(record_id).map(|location| location.record)
    }

    pub fn find_record_location(&self, record_id: &str) -> Option<RecordLocation<'_>> {
        let (ci, pi, ri) = self.locate(record_id)?;
        let customer = self.customers[ci].as_ref();
        let product = customer.products[pi].as_ref();
        let record = product.records[ri].as_ref();
        Some(RecordLocation {
            customer,
            product,
            record,
        })
    }

    /// Customer owning the given product, if any.
    pub fn owner_of_product(&self, product_id: &str) -> Option<&Customer> {
        self.customers()
            .find(|customer| customer.find_product(product_id).is_some())
    }

    fn locate(&self, record_id: &str) -> Option<(usize, usize, usize)> {
        self.customers.iter().enumerate().find_map(|(ci, customer)| {
            customer.products.iter().enumerate().find_map(|(pi, product)| {
                product
                    .records
                    .iter()
                    .position(|record| record.id == record_id)
                    .map(|ri| (ci, pi, ri))
            })
        })
    }

    // ------------------------------------------------------------------
    // writes
    // ------------------------------------------------------------------

    /// Merge `patch` into the record. Unknown id or a patch that would break an
    /// invariant: the snapshot comes back unchanged.
    pub fn update_record(&self, record_id: &str, patch: &RecordPatch) -> RecordStore {
        self.or_unchanged(self.try_update_record(record_id, patch))
    }

    #[instrument(skip(self, patch))]
    pub fn try_update_record(&self, record_id: &str, patch: &RecordPatch) -> Result<RecordStore, AppError> {
        let (ci, pi, ri) = self
            .locate(record_id)
            .ok_or_else(|| AppError::not_found(ErrorCode::RecordNotFound, record_id))?;

        let customer = &self.customers[ci];
        let product = &customer.products[pi];
        let before = &product.records[ri];
        let after = patch.merge_into(before);

        invariants::ensure(invariants::append_only_violations(before, &after))?;

        let mut next_product = Product::clone(product);
        next_product.records[ri] = Arc::new(after);

        let mut next_customer = Customer::clone(customer);
        next_customer.products[pi] = Arc::new(next_product);

        let mut customers = self.customers.clone();
        customers[ci] = Arc::new(next_customer);

        invariants::ensure(invariants::violations(&customers))?;

        info!(
            customer_id = %customer.id,
            product_id = %product.id,
            "production record updated"
        );
        Ok(RecordStore { customers })
    }

    /// Same as [`update_record`](Self::update_record) with `chat := chat ++ [message]`.
    pub fn append_chat_message(&self, record_id: &str, message: ChatMessage) -> RecordStore {
        self.or_unchanged(self.try_append_chat_message(record_id, message))
    }

    pub fn try_append_chat_message(&self, record_id: &str, message: ChatMessage) -> Result<RecordStore, AppError> {
        self.try_append_chat_messages(record_id, vec![message])
    }

    /// Appends several messages at once, in the given order.
    pub fn try_append_chat_messages(
        &self,
        record_id: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<RecordStore, AppError> {
        let record = self
            .find_record_by_id(record_id)
            .ok_or_else(|| AppError::not_found(ErrorCode::RecordNotFound, record_id))?;

        let mut chat = record.chat.clone();
        chat.extend(messages);

        self.try_update_record(record_id, &RecordPatch::default().with_chat(chat))
    }

    pub fn append_issue_log(&self, record_id: &str, log: IssueLog) -> RecordStore {
        self.or_unchanged(self.try_append_issue_log(record_id, log))
    }

    pub fn try_append_issue_log(&self, record_id: &str, log: IssueLog) -> Result<RecordStore, AppError> {
        let record = self
            .find_record_by_id(record_id)
            .ok_or_else(|| AppError::not_found(ErrorCode::RecordNotFound, record_id))?;

        let mut logs = record.logs.clone();
        logs.push(log);

        self.try_update_record(record_id, &RecordPatch::default().with_logs(logs))
    }

    pub fn approve_issue_log(
        &self,
        record_id: &str,
        log_id: &str,
        approver_id: &str,
        at: DateTime<Utc>,
    ) -> RecordStore {
        self.or_unchanged(self.try_approve_issue_log(record_id, log_id, approver_id, at))
    }

    /// Move a pending log to approved, setting `approvedBy` and `approvedAt` together.
    pub fn try_approve_issue_log(
        &self,
        record_id: &str,
        log_id: &str,
        approver_id: &str,
        at: DateTime<Utc>,
    ) -> Result<RecordStore, AppError> {
        let record = self
            .find_record_by_id(record_id)
            .ok_or_else(|| AppError::not_found(ErrorCode::RecordNotFound, record_id))?;

        let log = record
            .find_log(log_id)
            .ok_or_else(|| AppError::not_found(ErrorCode::IssueLogNotFound, log_id))?;

        if !log.is_pending() {
            return Err(AppError::with_detail(ErrorCode::AlreadyApproved, format!("id={}", log_id)));
        }

        let logs = record
            .logs
            .iter()
            .map(|existing| {
                if existing.id == log_id {
                    existing.clone().approved(approver_id, at)
                } else {
                    existing.clone()
                }
            })
            .collect();

        self.try_update_record(record_id, &RecordPatch::default().with_logs(logs))
    }

    /// Run a `try_` write under `policy`.
    pub fn apply<F>(&self, policy: UpdatePolicy, write: F) -> Result<RecordStore, AppError>
    where
        F: FnOnce(&RecordStore) -> Result<RecordStore, AppError>,
    {
        match (write(self), policy) {
            (Ok(next), _) => Ok(next),
            (Err(err), UpdatePolicy::Lenient) => Ok(self.or_unchanged(Err(err))),
            (Err(err), UpdatePolicy::Strict) => Err(err),
        }
    }

    fn or_unchanged(&self, result: Result<RecordStore, AppError>) -> RecordStore {
        match result {
            Ok(next) => next,
            Err(err) => {
                match err.code() {
                    ErrorCode::RecordNotFound | ErrorCode::IssueLogNotFound | ErrorCode::AlreadyApproved => {
                        debug!(error = %err, detail = ?err.detail(), "write skipped")
                    }
                    _ => warn!(error = %err, detail = ?err.detail(), "write refused"),
                }
                self.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Dept, IssueStatus, RecordStatus};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn at(ts: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
    }

    fn record(id: &str, product_id: &str) -> ProductionRecord {
        ProductionRecord {
            id: id.to_string(),
            product_id: product_id.to_string(),
            production_code: format!("LSX-{}", id),
            status: RecordStatus::New,
            last_updated: at("2023-11-20T10:30:00Z"),
            logs: vec![],
            chat: vec![],
        }
    }

    fn product(id: &str, customer_id: &str, records: Vec<ProductionRecord>) -> Product {
        Product {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            code: format!("SKU-{}", id),
            name: format!("Product {}", id),
            specs: BTreeMap::new(),
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    fn customer(id: &str, products: Vec<Product>) -> Customer {
        Customer {
            id: id.to_string(),
            name: format!("Customer {}", id),
            products: products.into_iter().map(Arc::new).collect(),
        }
    }

    fn store() -> RecordStore {
        RecordStore::new(vec![
            customer(
                "c1",
                vec![
                    product("p1", "c1", vec![record("r1", "p1"), record("r2", "p1")]),
                    product("p2", "c1", vec![record("r3", "p2")]),
                ],
            ),
            customer("c2", vec![product("p3", "c2", vec![record("r4", "p3")])]),
        ])
        .unwrap()
    }

    fn log(id: &str, record_id: &str) -> IssueLog {
        IssueLog {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2023, 11, 21).unwrap(),
            record_id: record_id.to_string(),
            dept: Dept::In,
            error_content: "Lệch màu".to_string(),
            images: vec![],
            fix_content: String::new(),
            note: String::new(),
            status: IssueStatus::Pending,
            approved_by: None,
            approved_at: None,
        }
    }

    fn message(id: &str) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            sender_id: "NV003".to_string(),
            sender_name: "Lê Văn In".to_string(),
            text: format!("message {}", id),
            images: vec![],
            timestamp: at("2023-11-21T08:00:00Z"),
            dept: Dept::In,
            is_read: false,
            is_tagged: None,
        }
    }

    #[test]
    fn test_rejects_mismatched_parent_reference() {
        let err = RecordStore::new(vec![customer("c1", vec![product("p1", "c9", vec![])])]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvariantViolation);
        assert!(err.detail().unwrap().contains("customerId c9"));
    }

    #[test]
    fn test_rejects_duplicate_record_ids_across_products() {
        let err = RecordStore::new(vec![customer(
            "c1",
            vec![
                product("p1", "c1", vec![record("r1", "p1")]),
                product("p2", "c1", vec![record("r1", "p2")]),
            ],
        )])
        .unwrap_err();
        assert!(err.detail().unwrap().contains("duplicate record id r1"));
    }

    #[test]
    fn test_rejects_half_approved_log() {
        let mut broken = log("l1", "r1");
        broken.approved_by = Some("NV001".to_string());
        let mut r1 = record("r1", "p1");
        r1.logs.push(broken);

        let err = RecordStore::new(vec![customer("c1", vec![product("p1", "c1", vec![r1])])]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvariantViolation);
    }

    #[test]
    fn test_find_record_location_reports_owners() {
        let store = store();
        let location = store.find_record_location("r3").unwrap();
        assert_eq!(location.customer.id, "c1");
        assert_eq!(location.product.id, "p2");
        assert_eq!(location.record.id, "r3");
        assert!(store.find_record_location("r9").is_none());
    }

    #[test]
    fn test_update_replaces_path_and_shares_siblings() {
        let before = store();
        let after = before.update_record("r1", &RecordPatch::status(RecordStatus::Completed));

        let old = before.find_record_location("r1").unwrap();
        let new = after.find_record_location("r1").unwrap();
        assert!(!std::ptr::eq(old.customer, new.customer));
        assert!(!std::ptr::eq(old.product, new.product));
        assert!(!std::ptr::eq(old.record, new.record));

        let shared_sibling = |store: &RecordStore| store.find_record_by_id("r2").unwrap() as *const _;
        assert_eq!(shared_sibling(&before), shared_sibling(&after));
        assert!(std::ptr::eq(
            before.find_product_by_id("p2").unwrap(),
            after.find_product_by_id("p2").unwrap()
        ));
        assert!(std::ptr::eq(
            before.find_customer_by_id("c2").unwrap(),
            after.find_customer_by_id("c2").unwrap()
        ));

        assert_eq!(before.find_record_by_id("r1").unwrap().status, RecordStatus::New);
        assert_eq!(after.find_record_by_id("r1").unwrap().status, RecordStatus::Completed);
    }

    #[test]
    fn test_unknown_record_is_silent_no_op() {
        let before = store();
        let after = before.update_record("missing", &RecordPatch::status(RecordStatus::Completed));
        assert_eq!(before, after);

        let err = before
            .try_update_record("missing", &RecordPatch::status(RecordStatus::Completed))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::RecordNotFound);
    }

    #[test]
    fn test_patch_with_foreign_log_is_refused() {
        let before = store();
        let patch = RecordPatch::default().with_logs(vec![log("l1", "r2")]);

        assert_eq!(before.update_record("r1", &patch), before);
        let err = before.try_update_record("r1", &patch).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvariantViolation);
    }

    #[test]
    fn test_patch_that_drops_chat_is_refused() {
        let before = store().append_chat_message("r1", message("m1"));
        let patch = RecordPatch::default().with_chat(vec![]);

        let err = before.try_update_record("r1", &patch).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvariantViolation);
        assert_eq!(before.update_record("r1", &patch), before);
    }

    /// r1 holding an approved `l1` followed by a pending `l2`.
    fn store_with_logs() -> RecordStore {
        store()
            .try_append_issue_log("r1", log("l1", "r1"))
            .and_then(|s| s.try_approve_issue_log("r1", "l1", "NV001", at("2023-11-21T09:00:00Z")))
            .and_then(|s| s.try_append_issue_log("r1", log("l2", "r1")))
            .unwrap()
    }

    fn assert_log_rewrite_refused(before: &RecordStore, logs: Vec<IssueLog>) {
        let patch = RecordPatch::default().with_logs(logs);

        let err = before.try_update_record("r1", &patch).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvariantViolation);
        assert_eq!(&before.update_record("r1", &patch), before);
    }

    #[test]
    fn test_removing_issue_logs_is_refused() {
        let before = store_with_logs();
        let logs = before.find_record_by_id("r1").unwrap().logs.clone();

        assert_log_rewrite_refused(&before, vec![]);
        assert_log_rewrite_refused(&before, logs[..1].to_vec());
        assert_log_rewrite_refused(&before, logs[1..].to_vec());
    }

    #[test]
    fn test_reordering_issue_logs_is_refused() {
        let before = store_with_logs();
        let mut logs = before.find_record_by_id("r1").unwrap().logs.clone();
        logs.reverse();

        assert_log_rewrite_refused(&before, logs);
    }

    #[test]
    fn test_unapproving_issue_log_is_refused() {
        let before = store_with_logs();
        let mut logs = before.find_record_by_id("r1").unwrap().logs.clone();
        logs[0].status = IssueStatus::Pending;
        logs[0].approved_by = None;
        logs[0].approved_at = None;

        assert_log_rewrite_refused(&before, logs);
    }

    #[test]
    fn test_editing_approved_issue_log_is_refused() {
        let before = store_with_logs();

        let mut approver_changed = before.find_record_by_id("r1").unwrap().logs.clone();
        approver_changed[0].approved_by = Some("NV003".to_string());
        assert_log_rewrite_refused(&before, approver_changed);

        let mut content_changed = before.find_record_by_id("r1").unwrap().logs.clone();
        content_changed[0].fix_content = "Sửa lại".to_string();
        assert_log_rewrite_refused(&before, content_changed);
    }

    #[test]
    fn test_approval_must_keep_log_content() {
        let before = store_with_logs();
        let mut logs = before.find_record_by_id("r1").unwrap().logs.clone();
        logs[1] = logs[1].clone().approved("NV001", at("2023-11-22T09:00:00Z"));
        logs[1].error_content = "Khác".to_string();

        assert_log_rewrite_refused(&before, logs);
    }

    #[test]
    fn test_appending_and_approving_via_patch_is_allowed() {
        let before = store_with_logs();
        let mut logs = before.find_record_by_id("r1").unwrap().logs.clone();
        logs[1] = logs[1].clone().approved("NV001", at("2023-11-22T09:00:00Z"));
        logs.push(log("l3", "r1"));

        let after = before
            .try_update_record("r1", &RecordPatch::default().with_logs(logs.clone()))
            .unwrap();
        assert_eq!(after.find_record_by_id("r1").unwrap().logs, logs);
    }

    #[test]
    fn test_duplicate_message_id_is_refused() {
        let before = store().append_chat_message("r1", message("m1"));
        let err = before.try_append_chat_message("r2", message("m1")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvariantViolation);
    }

    #[test]
    fn test_append_and_approve_issue_log() {
        let approved_at = at("2023-11-21T09:00:00Z");
        let store = store()
            .append_issue_log("r1", log("l1", "r1"))
            .approve_issue_log("r1", "l1", "NV001", approved_at);

        let logged = store.find_record_by_id("r1").unwrap().find_log("l1").unwrap();
        assert_eq!(logged.status, IssueStatus::Approved);
        assert_eq!(logged.approved_by.as_deref(), Some("NV001"));
        assert_eq!(logged.approved_at, Some(approved_at));
    }

    #[test]
    fn test_approving_twice_is_rejected_in_strict_mode() {
        let store = store()
            .append_issue_log("r1", log("l1", "r1"))
            .approve_issue_log("r1", "l1", "NV001", Utc::now());

        let err = store
            .try_approve_issue_log("r1", "l1", "NV001", Utc::now())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyApproved);

        let err = store
            .try_approve_issue_log("r1", "l404", "NV001", Utc::now())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::IssueLogNotFound);
    }

    #[test]
    fn test_apply_follows_policy() {
        let store = store();
        let write = |s: &RecordStore| s.try_update_record("missing", &RecordPatch::status(RecordStatus::Pending));

        assert_eq!(store.apply(UpdatePolicy::Lenient, write).unwrap(), store);
        let err = store.apply(UpdatePolicy::Strict, write).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RecordNotFound);
    }

    #[test]
    fn test_update_policy_parses() {
        assert_eq!("Strict".parse::<UpdatePolicy>().unwrap(), UpdatePolicy::Strict);
        assert_eq!(" lenient ".parse::<UpdatePolicy>().unwrap(), UpdatePolicy::Lenient);
        assert!("loose".parse::<UpdatePolicy>().is_err());
    }
}
