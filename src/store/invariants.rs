//! Structural checks run on construction and on every write.

use std::collections::HashSet;
use std::sync::Arc;

use crate::entity::{Customer, Employee, IssueLog, ProductionRecord};
use crate::model::global_error::{AppError, ErrorCode};

/// Every violation found in the hierarchy, as human-readable lines.
pub fn violations(customers: &[Arc<Customer>]) -> Vec<String> {
    let mut found = Vec::new();
    let mut customer_ids = HashSet::new();
    let mut product_ids = HashSet::new();
    let mut record_ids = HashSet::new();
    let mut log_ids = HashSet::new();
    let mut message_ids = HashSet::new();

    for customer in customers {
        if !customer_ids.insert(customer.id.as_str()) {
            found.push(format!("duplicate customer id {}", customer.id));
        }

        for product in &customer.products {
            if !product_ids.insert(product.id.as_str()) {
                found.push(format!("duplicate product id {}", product.id));
            }
            if product.customer_id != customer.id {
                found.push(format!(
                    "product {} has customerId {} but belongs to {}",
                    product.id, product.customer_id, customer.id
                ));
            }

            for record in &product.records {
                if !record_ids.insert(record.id.as_str()) {
                    found.push(format!("duplicate record id {}", record.id));
                }
                if record.product_id != product.id {
                    found.push(format!(
                        "record {} has productId {} but belongs to {}",
                        record.id, record.product_id, product.id
                    ));
                }

                for log in &record.logs {
                    if !log_ids.insert(log.id.as_str()) {
                        found.push(format!("duplicate issue log id {}", log.id));
                    }
                    if log.record_id != record.id {
                        found.push(format!(
                            "issue log {} has recordId {} but belongs to {}",
                            log.id, log.record_id, record.id
                        ));
                    }
                    if !log.approval_is_consistent() {
                        found.push(format!(
                            "issue log {} is {:?} with approvedBy={:?} approvedAt={:?}",
                            log.id, log.status, log.approved_by, log.approved_at
                        ));
                    }
                }

                for message in &record.chat {
                    if !message_ids.insert(message.id.as_str()) {
                        found.push(format!("duplicate chat message id {}", message.id));
                    }
                }
            }
        }
    }

    found
}

/// Chat may only grow at the end. Logs may only grow at the end, and an
/// existing log may only change by moving from pending to approved.
pub fn append_only_violations(before: &ProductionRecord, after: &ProductionRecord) -> Vec<String> {
    let mut found = Vec::new();

    if after.chat.len() < before.chat.len() || after.chat[..before.chat.len()] != before.chat[..] {
        found.push(format!("chat of record {} dropped or reordered messages", before.id));
    }

    if after.logs.len() < before.logs.len() {
        found.push(format!("issue logs of record {} were removed", before.id));
        return found;
    }

    for (old, new) in before.logs.iter().zip(&after.logs) {
        if old == new {
            continue;
        }
        let approved_now =
            old.is_pending() && !new.is_pending() && old.id == new.id && same_content(old, new);
        if !approved_now {
            found.push(format!("issue log {} of record {} was rewritten", old.id, before.id));
        }
    }

    found
}

/// Employee ids are login credentials: non-empty and unique.
pub fn employee_violations(employees: &[Employee]) -> Vec<String> {
    let mut found = Vec::new();
    let mut ids = HashSet::new();

    for employee in employees {
        if employee.id.is_empty() {
            found.push(format!("employee {} has an empty id", employee.name));
        } else if !ids.insert(employee.id.as_str()) {
            found.push(format!("duplicate employee id {}", employee.id));
        }
    }
    found
}

fn same_content(old: &IssueLog, new: &IssueLog) -> bool {
    old.date == new.date
        && old.record_id == new.record_id
        && old.dept == new.dept
        && old.error_content == new.error_content
        && old.images == new.images
        && old.fix_content == new.fix_content
        && old.note == new.note
}

pub fn ensure(found: Vec<String>) -> Result<(), AppError> {
    if found.is_empty() {
        Ok(())
    } else {
        Err(AppError::with_detail(ErrorCode::InvariantViolation, found.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Dept, Role};
    use crate::seed;

    #[test]
    fn seed_employees_pass() {
        assert!(employee_violations(&seed::employees()).is_empty());
    }

    #[test]
    fn duplicate_and_empty_employee_ids_are_reported() {
        let mut employees = seed::employees();
        employees.push(Employee::new("NV003", "Lê Văn In 2", Dept::In, Role::User));
        employees.push(Employee::new("", "Không mã", Dept::Kho, Role::User));

        let found = employee_violations(&employees);
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|v| v.contains("duplicate employee id NV003")));
        assert!(found.iter().any(|v| v.contains("empty id")));
    }
}
