//! Line-oriented driver for a [`Workspace`], used by the binary.

use serde_json::json;
use std::io::Write;

use crate::dashboard::{logs_grouped_by_date, DashboardSummary};
use crate::entity::{Dept, RecordStatus};
use crate::model::global_error::{AppError, ValidationFieldError};
use crate::model::{IssueDraftRequest, SendMessageRequest, ViewTab};
use crate::workspace::Workspace;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login(String),
    Logout,
    WhoAmI,
    Tab(ViewTab),
    Customers,
    Customer(String),
    Product(String),
    Record(String),
    Show,
    Say(String),
    Status(RecordStatus),
    Draft(IssueDraftRequest),
    ApproveNew(IssueDraftRequest),
    Approve(String),
    Mentions,
    Dashboard,
    Help,
    Quit,
}

pub const HELP: &str = "\
login <id> | logout | whoami | tab <dashboard|customers|notifications|reports|employees|chat>
customers | customer <id> | product <id> | record <id> | show
say <text> | status <new|pending|completed>
draft <dept> | <error> | <fix> | approve-new <dept> | <error> | <fix> | approve <log id>
mentions | dashboard | help | quit";

fn invalid(field: &str, message: &str) -> AppError {
    AppError::ValidationError(vec![ValidationFieldError::new(field, message)])
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        Err(invalid(field, "required"))
    } else {
        Ok(value)
    }
}

fn parse_draft(rest: &str) -> Result<IssueDraftRequest, AppError> {
    let mut parts = rest.splitn(3, '|').map(str::trim);
    let dept = parts.next().unwrap_or_default();
    let dept = Dept::parse(dept).ok_or_else(|| invalid("dept", "unknown department"))?;
    let error_content = parts.next().unwrap_or_default();
    let fix_content = parts.next().unwrap_or_default();
    Ok(IssueDraftRequest::new(dept, error_content, fix_content))
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, AppError> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        let command = match verb.to_lowercase().as_str() {
            "login" => Command::Login(required("employeeId", rest)?.to_string()),
            "logout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "tab" => Command::Tab(ViewTab::parse(rest).ok_or_else(|| invalid("tab", "unknown tab"))?),
            "customers" => Command::Customers,
            "customer" => Command::Customer(required("customerId", rest)?.to_string()),
            "product" => Command::Product(required("productId", rest)?.to_string()),
            "record" => Command::Record(required("recordId", rest)?.to_string()),
            "show" => Command::Show,
            "say" => Command::Say(rest.to_string()),
            "status" => Command::Status(
                RecordStatus::parse(rest).ok_or_else(|| invalid("status", "expected new, pending or completed"))?,
            ),
            "draft" => Command::Draft(parse_draft(rest)?),
            "approve-new" => Command::ApproveNew(parse_draft(rest)?),
            "approve" => Command::Approve(required("logId", rest)?.to_string()),
            "mentions" => Command::Mentions,
            "dashboard" => Command::Dashboard,
            "help" | "" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(invalid("command", &format!("unknown command '{}'", other))),
        };
        Ok(command)
    }
}

/// Run one command; returns `false` once the loop should stop.
pub fn execute<W: Write>(workspace: &mut Workspace, command: Command, out: &mut W) -> anyhow::Result<bool> {
    let result = match command {
        Command::Quit => return Ok(false),
        Command::Help => Ok(json!(HELP)),
        Command::Login(id) => workspace.login(&id).map(|session| {
            json!({ "employee": session.to_response(), "tab": session.landing_tab().id() })
        }),
        Command::Logout => {
            workspace.logout();
            Ok(json!("logged out"))
        }
        Command::WhoAmI => Ok(json!(workspace.session().map(|s| s.to_response()))),
        Command::Tab(tab) => workspace.set_tab(tab).map(|_| json!({ "tab": tab.id(), "label": tab.label() })),
        Command::Customers => Ok(json!(workspace
            .store()
            .customers()
            .map(|c| json!({ "id": c.id, "name": c.name, "products": c.products.len() }))
            .collect::<Vec<_>>())),
        Command::Customer(id) => workspace.select_customer(&id).map(|customer| {
            json!(customer.map(|c| c
                .products
                .iter()
                .map(|p| json!({ "id": p.id, "code": p.code, "name": p.name }))
                .collect::<Vec<_>>()))
        }),
        Command::Product(id) => workspace.select_product(&id).map(|product| json!(product)),
        Command::Record(id) => workspace.select_record(&id).map(|record| json!(record)),
        Command::Show => Ok(json!(workspace.selected_record().map(|record| {
            let overview: Vec<_> = logs_grouped_by_date(record)
                .into_iter()
                .map(|(date, logs)| json!({ "date": date, "logs": logs }))
                .collect();
            json!({ "record": record, "overview": overview })
        }))),
        Command::Say(text) => workspace
            .send_message(SendMessageRequest::text(&text))
            .map(|message| json!(message)),
        Command::Status(status) => workspace.set_record_status(status).map(|_| json!({ "status": status })),
        Command::Draft(draft) => workspace.save_issue_draft(draft).map(|log| json!(log)),
        Command::ApproveNew(draft) => workspace.approve_and_record(draft).map(|log| json!(log)),
        Command::Approve(log_id) => workspace.approve_issue(&log_id).map(|_| json!({ "approved": log_id })),
        Command::Mentions => workspace.mentions_of_current_user().map(|mentions| {
            json!(mentions
                .into_iter()
                .map(|(record, message)| json!({ "recordId": record.id, "message": message }))
                .collect::<Vec<_>>())
        }),
        Command::Dashboard => Ok(json!(DashboardSummary::from_store(workspace.store()))),
    };

    match result {
        Ok(value) => writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?,
        Err(err) => writeln!(out, "{}", serde_json::to_string(&err.to_response())?)?,
    }
    Ok(true)
}
