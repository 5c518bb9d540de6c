//! Session guards for workspace actions.
//!
//! Each guard borrows the current session and fails when the caller does not
//! meet the requirement, so the action body can assume it holds.

use crate::model::global_error::{AppError, ErrorCode};

use super::session::Session;

/// Any logged-in employee.
pub struct RequireSession<'a>(pub &'a Session);

impl<'a> RequireSession<'a> {
    pub fn check(session: Option<&'a Session>) -> Result<Self, AppError> {
        session
            .map(RequireSession)
            .ok_or_else(|| AppError::new(ErrorCode::NotLoggedIn))
    }
}

/// A logged-in admin.
pub struct RequireAdmin<'a>(pub &'a Session);

impl<'a> RequireAdmin<'a> {
    pub fn check(session: Option<&'a Session>) -> Result<Self, AppError> {
        let RequireSession(session) = RequireSession::check(session)?;
        if !session.can_approve() {
            return Err(AppError::with_detail(
                ErrorCode::NotEnoughPermission,
                format!("role {} cannot approve", session.role()),
            ));
        }
        Ok(RequireAdmin(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::authenticate;
    use crate::model::auth::LoginRequest;
    use crate::seed;

    #[test]
    fn missing_session_is_not_logged_in() {
        let err = RequireSession::check(None).err().unwrap();
        assert_eq!(err.code(), ErrorCode::NotLoggedIn);
    }

    #[test]
    fn user_is_not_admin() {
        let session = authenticate(&seed::employees(), &LoginRequest::new("NV004")).unwrap();
        assert!(RequireSession::check(Some(&session)).is_ok());
        let err = RequireAdmin::check(Some(&session)).err().unwrap();
        assert_eq!(err.code(), ErrorCode::NotEnoughPermission);
    }

    #[test]
    fn admin_passes_both_guards() {
        let session = authenticate(&seed::employees(), &LoginRequest::new("NV001")).unwrap();
        let RequireAdmin(admin) = RequireAdmin::check(Some(&session)).unwrap();
        assert_eq!(admin.employee_id(), "NV001");
    }
}
