use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::entity::{Dept, Employee, Role};
use crate::model::auth::{EmployeeResponse, LoginRequest};
use crate::model::global_error::{AppError, ErrorCode};
use crate::model::view::ViewTab;

/// A logged-in employee.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    employee: Employee,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn employee(&self) -> &Employee {
        &self.employee
    }

    pub fn employee_id(&self) -> &str {
        &self.employee.id
    }

    pub fn role(&self) -> Role {
        self.employee.role
    }

    pub fn dept(&self) -> Dept {
        self.employee.dept
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn can_approve(&self) -> bool {
        self.employee.is_admin()
    }

    /// Admins start on the dashboard, everyone else goes straight to chat.
    pub fn landing_tab(&self) -> ViewTab {
        match self.employee.role {
            Role::Admin => ViewTab::Dashboard,
            Role::User => ViewTab::Chat,
        }
    }

    pub fn to_response(&self) -> EmployeeResponse {
        EmployeeResponse::from(&self.employee)
    }
}

/// Exact match of the employee id against the reference list. Input is not
/// trimmed; empty or unknown ids fail the same way.
#[instrument(skip(employees, request), fields(employee_id = %request.employee_id))]
pub fn authenticate(employees: &[Employee], request: &LoginRequest) -> Result<Session, AppError> {
    let employee = employees
        .iter()
        .find(|employee| !request.employee_id.is_empty() && employee.id == request.employee_id)
        .ok_or_else(|| {
            warn!("login rejected");
            AppError::new(ErrorCode::InvalidEmployeeId)
        })?;

    info!(role = %employee.role, dept = %employee.dept, "login accepted");

    Ok(Session {
        employee: employee.clone(),
        started_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn admin_login_yields_admin_session() {
        let session = authenticate(&seed::employees(), &LoginRequest::new("NV001")).unwrap();
        assert_eq!(session.role(), Role::Admin);
        assert_eq!(session.dept(), Dept::In);
        assert!(session.can_approve());
        assert_eq!(session.landing_tab(), ViewTab::Dashboard);
    }

    #[test]
    fn user_login_lands_on_chat() {
        let session = authenticate(&seed::employees(), &LoginRequest::new("NV002")).unwrap();
        assert_eq!(session.employee_id(), "NV002");
        assert!(!session.can_approve());
        assert_eq!(session.landing_tab(), ViewTab::Chat);
    }

    #[test]
    fn unknown_id_is_rejected() {
        let err = authenticate(&seed::employees(), &LoginRequest::new("NV999")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidEmployeeId);
    }

    #[test]
    fn match_is_case_sensitive() {
        let err = authenticate(&seed::employees(), &LoginRequest::new("nv001")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidEmployeeId);
    }

    #[test]
    fn padded_id_is_rejected() {
        for input in [" NV001 ", "NV001 ", "\tNV002"] {
            let err = authenticate(&seed::employees(), &LoginRequest::new(input)).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidEmployeeId, "input {:?}", input);
        }
    }

    #[test]
    fn empty_id_is_rejected_as_invalid_employee() {
        for input in ["", "   "] {
            let err = authenticate(&seed::employees(), &LoginRequest::new(input)).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidEmployeeId);
            assert_eq!(err.to_response().message, "Mã nhân viên không hợp lệ!");
        }
    }
}
