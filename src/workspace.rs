//! Application state between user events.
//!
//! The [`Workspace`] owns the current [`RecordStore`] snapshot together with
//! the session and the current selection. Each event handler reads the latest
//! snapshot, computes the next one and swaps it in before returning, so events
//! never interleave.

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{authenticate, RequireAdmin, RequireSession, Session};
use crate::entity::{ChatMessage, Customer, Employee, IssueLog, IssueStatus, Product, ProductionRecord, RecordStatus};
use crate::model::chat::extract_mentions;
use crate::model::global_error::{AppError, ErrorCode};
use crate::model::{IssueDraftRequest, LoginRequest, RecordPatch, SendMessageRequest, ViewTab};
use crate::store::{invariants, RecordStore, UpdatePolicy};

#[derive(Debug, Clone)]
pub struct Workspace {
    store: RecordStore,
    employees: Vec<Employee>,
    policy: UpdatePolicy,
    session: Option<Session>,
    active_tab: ViewTab,
    selected_customer_id: Option<String>,
    selected_product_id: Option<String>,
    selected_record_id: Option<String>,
}

impl Workspace {
    /// Fails when the employee list has empty or duplicate ids.
    pub fn new(store: RecordStore, employees: Vec<Employee>, policy: UpdatePolicy) -> Result<Self, AppError> {
        invariants::ensure(invariants::employee_violations(&employees))?;

        Ok(Self {
            store,
            employees,
            policy,
            session: None,
            active_tab: ViewTab::default(),
            selected_customer_id: None,
            selected_product_id: None,
            selected_record_id: None,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn active_tab(&self) -> ViewTab {
        self.active_tab
    }

    // ------------------------------------------------------------------
    // session
    // ------------------------------------------------------------------

    /// A failed login leaves every piece of state as it was. A successful one
    /// replaces any current session and drops its selection.
    pub fn login(&mut self, employee_id: &str) -> Result<&Session, AppError> {
        let session = authenticate(&self.employees, &LoginRequest::new(employee_id))?;
        self.clear_selection();
        self.active_tab = session.landing_tab();
        Ok(self.session.insert(session))
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!(employee_id = %session.employee_id(), "logout");
        }
        self.active_tab = ViewTab::Dashboard;
        self.clear_selection();
    }

    fn clear_selection(&mut self) {
        self.selected_customer_id = None;
        self.selected_product_id = None;
        self.selected_record_id = None;
    }

    pub fn set_tab(&mut self, tab: ViewTab) -> Result<(), AppError> {
        RequireSession::check(self.session.as_ref())?;
        self.active_tab = tab;
        Ok(())
    }

    // ------------------------------------------------------------------
    // selection
    // ------------------------------------------------------------------

    /// Selecting the expanded customer again collapses it.
    pub fn select_customer(&mut self, customer_id: &str) -> Result<Option<&Customer>, AppError> {
        RequireSession::check(self.session.as_ref())?;
        if self.store.find_customer_by_id(customer_id).is_none() {
            return Err(AppError::not_found(ErrorCode::CustomerNotFound, customer_id));
        }

        if self.selected_customer_id.as_deref() == Some(customer_id) {
            self.selected_customer_id = None;
            return Ok(None);
        }

        self.selected_customer_id = Some(customer_id.to_string());
        Ok(self.store.find_customer_by_id(customer_id))
    }

    /// Selects the product, its owner and its first record.
    pub fn select_product(&mut self, product_id: &str) -> Result<&Product, AppError> {
        RequireSession::check(self.session.as_ref())?;
        let product = self
            .store
            .find_product_by_id(product_id)
            .ok_or_else(|| AppError::not_found(ErrorCode::ProductNotFound, product_id))?;

        self.selected_record_id = product.first_record().map(|record| record.id.clone());
        self.selected_customer_id = self.store.owner_of_product(product_id).map(|c| c.id.clone());
        self.selected_product_id = Some(product_id.to_string());

        self.selected_product()
            .ok_or_else(|| AppError::not_found(ErrorCode::ProductNotFound, product_id))
    }

    /// The record must belong to the selected product.
    pub fn select_record(&mut self, record_id: &str) -> Result<&ProductionRecord, AppError> {
        RequireSession::check(self.session.as_ref())?;
        let belongs = self
            .selected_product()
            .and_then(|product| product.find_record(record_id))
            .is_some();
        if !belongs {
            return Err(AppError::not_found(ErrorCode::RecordNotFound, record_id));
        }

        self.selected_record_id = Some(record_id.to_string());
        self.selected_record()
            .ok_or_else(|| AppError::not_found(ErrorCode::RecordNotFound, record_id))
    }

    pub fn selected_customer(&self) -> Option<&Customer> {
        self.selected_customer_id
            .as_deref()
            .and_then(|id| self.store.find_customer_by_id(id))
    }

    /// Looked up in the current snapshot on every call.
    pub fn selected_product(&self) -> Option<&Product> {
        self.selected_product_id
            .as_deref()
            .and_then(|id| self.store.find_product_by_id(id))
    }

    pub fn selected_record(&self) -> Option<&ProductionRecord> {
        let record_id = self.selected_record_id.as_deref()?;
        self.selected_product()?.find_record(record_id)
    }

    fn require_selected_record(&self) -> Result<String, AppError> {
        self.selected_record()
            .map(|record| record.id.clone())
            .ok_or_else(|| AppError::new(ErrorCode::NoRecordSelected))
    }

    // ------------------------------------------------------------------
    // writes
    // ------------------------------------------------------------------

    /// Blank messages are ignored and yield `Ok(None)`.
    #[instrument(skip(self, request))]
    pub fn send_message(&mut self, request: SendMessageRequest) -> Result<Option<ChatMessage>, AppError> {
        let RequireSession(session) = RequireSession::check(self.session.as_ref())?;
        let record_id = self.require_selected_record()?;

        if request.is_blank() {
            return Ok(None);
        }
        request.validate()?;

        let tagged = extract_mentions(&request.text)
            .iter()
            .any(|handle| self.employees.iter().any(|employee| &employee.id == handle));

        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            sender_id: session.employee_id().to_string(),
            sender_name: session.employee().name.clone(),
            text: request.text,
            images: request.images,
            timestamp: Utc::now(),
            dept: session.dept(),
            is_read: false,
            is_tagged: tagged.then_some(true),
        };

        let appended = message.clone();
        self.commit(|store| store.try_append_chat_message(&record_id, appended))?;
        Ok(Some(message))
    }

    /// Store the draft as a pending issue log ("Lưu tạm").
    pub fn save_issue_draft(&mut self, draft: IssueDraftRequest) -> Result<IssueLog, AppError> {
        RequireSession::check(self.session.as_ref())?;
        let record_id = self.require_selected_record()?;
        draft.validate()?;

        let log = new_issue_log(&record_id, draft);
        let appended = log.clone();
        self.commit(|store| store.try_append_issue_log(&record_id, appended))?;
        Ok(log)
    }

    /// Store the draft already approved by the current admin ("Duyệt & Ghi sổ").
    pub fn approve_and_record(&mut self, draft: IssueDraftRequest) -> Result<IssueLog, AppError> {
        let RequireAdmin(admin) = RequireAdmin::check(self.session.as_ref())?;
        let approver_id = admin.employee_id().to_string();
        let record_id = self.require_selected_record()?;
        draft.validate()?;

        let log = new_issue_log(&record_id, draft).approved(&approver_id, Utc::now());
        let appended = log.clone();
        self.commit(|store| store.try_append_issue_log(&record_id, appended))?;
        Ok(log)
    }

    pub fn approve_issue(&mut self, log_id: &str) -> Result<(), AppError> {
        let RequireAdmin(admin) = RequireAdmin::check(self.session.as_ref())?;
        let approver_id = admin.employee_id().to_string();
        let record_id = self.require_selected_record()?;

        self.commit(|store| store.try_approve_issue_log(&record_id, log_id, &approver_id, Utc::now()))
    }

    pub fn set_record_status(&mut self, status: RecordStatus) -> Result<(), AppError> {
        RequireSession::check(self.session.as_ref())?;
        let record_id = self.require_selected_record()?;

        let patch = RecordPatch::status(status).touched(Utc::now());
        self.commit(|store| store.try_update_record(&record_id, &patch))
    }

    fn commit<F>(&mut self, write: F) -> Result<(), AppError>
    where
        F: FnOnce(&RecordStore) -> Result<RecordStore, AppError>,
    {
        self.store = self.store.apply(self.policy, write)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // notifications
    // ------------------------------------------------------------------

    /// Chat messages across all records that mention the logged-in employee.
    pub fn mentions_of_current_user(&self) -> Result<Vec<(&ProductionRecord, &ChatMessage)>, AppError> {
        let RequireSession(session) = RequireSession::check(self.session.as_ref())?;
        let handle = session.employee_id();

        Ok(self
            .store
            .records()
            .flat_map(|record| record.chat.iter().map(move |message| (record, message)))
            .filter(|(_, message)| extract_mentions(&message.text).iter().any(|m| m == handle))
            .collect())
    }
}

fn new_issue_log(record_id: &str, draft: IssueDraftRequest) -> IssueLog {
    IssueLog {
        id: Uuid::new_v4().to_string(),
        date: Utc::now().date_naive(),
        record_id: record_id.to_string(),
        dept: draft.dept,
        error_content: draft.error_content,
        images: draft.images,
        fix_content: draft.fix_content,
        note: draft.note,
        status: IssueStatus::Pending,
        approved_by: None,
        approved_at: None,
    }
}
