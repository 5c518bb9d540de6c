use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    // input
    ValidationError,
    InvalidEmployeeId,

    // session / permission
    NotLoggedIn,
    NotEnoughPermission,

    // lookup
    CustomerNotFound,
    ProductNotFound,
    RecordNotFound,
    IssueLogNotFound,
    NoRecordSelected,

    // state
    AlreadyApproved,
    InvariantViolation,

    InternalError,
}

impl ErrorCode {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Dữ liệu không hợp lệ",
            ErrorCode::InvalidEmployeeId => "Mã nhân viên không hợp lệ!",

            ErrorCode::NotLoggedIn => "Vui lòng đăng nhập",
            ErrorCode::NotEnoughPermission => "Không đủ quyền thực hiện thao tác",

            ErrorCode::CustomerNotFound => "Không tìm thấy khách hàng",
            ErrorCode::ProductNotFound => "Không tìm thấy sản phẩm",
            ErrorCode::RecordNotFound => "Không tìm thấy phiếu sản xuất",
            ErrorCode::IssueLogNotFound => "Không tìm thấy nhật ký lỗi",
            ErrorCode::NoRecordSelected => "Chưa chọn phiếu sản xuất",

            ErrorCode::AlreadyApproved => "Nhật ký lỗi đã được duyệt",
            ErrorCode::InvariantViolation => "Dữ liệu vi phạm ràng buộc",

            ErrorCode::InternalError => "Lỗi hệ thống",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

impl ValidationFieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("{0}")]
    ApiError(ErrorCode, Option<String>),

    #[error("Dữ liệu không hợp lệ")]
    ValidationError(Vec<ValidationFieldError>),
}

impl AppError {
    pub fn new(code: ErrorCode) -> Self {
        AppError::ApiError(code, None)
    }

    pub fn with_detail(code: ErrorCode, detail: impl Into<String>) -> Self {
        AppError::ApiError(code, Some(detail.into()))
    }

    pub fn not_found(code: ErrorCode, id: &str) -> Self {
        AppError::with_detail(code, format!("id={}", id))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::ApiError(code, _) => *code,
            AppError::ValidationError(_) => ErrorCode::ValidationError,
        }
    }

    pub fn detail(&self) -> Option<String> {
        match self {
            AppError::ApiError(_, detail) => detail.clone(),
            AppError::ValidationError(errors) => Some(
                errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
        }
    }

    /// Body shown to the user, e.g. in a notice.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: format!("{:?}", self.code()),
            message: self.code().message().to_string(),
            detail: self.detail(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_employee_message_is_user_facing() {
        let err = AppError::new(ErrorCode::InvalidEmployeeId);
        assert_eq!(err.to_string(), "Mã nhân viên không hợp lệ!");
        assert_eq!(err.code(), ErrorCode::InvalidEmployeeId);
    }

    #[test]
    fn validation_error_joins_field_messages() {
        let err = AppError::ValidationError(vec![
            ValidationFieldError::new("employeeId", "required"),
            ValidationFieldError::new("text", "empty"),
        ]);
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.detail().as_deref(), Some("employeeId: required; text: empty"));
    }

    #[test]
    fn response_skips_missing_detail() {
        let body = serde_json::to_value(AppError::new(ErrorCode::NotLoggedIn).to_response()).unwrap();
        assert_eq!(body["code"], "NotLoggedIn");
        assert!(body.get("detail").is_none());
    }
}
