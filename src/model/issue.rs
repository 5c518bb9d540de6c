use serde::{Deserialize, Serialize};

use super::global_error::{AppError, ValidationFieldError};
use crate::entity::Dept;

/// Form contents of the approval tab: one defect and its remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDraftRequest {
    pub dept: Dept,
    pub error_content: String,
    #[serde(default)]
    pub fix_content: String,
    #[serde(default)]
    pub note: String,
    /// Usually images picked from the record's chat thread.
    #[serde(default)]
    pub images: Vec<String>,
}

impl IssueDraftRequest {
    pub fn new(dept: Dept, error_content: &str, fix_content: &str) -> Self {
        Self {
            dept,
            error_content: error_content.to_string(),
            fix_content: fix_content.to_string(),
            note: String::new(),
            images: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();

        if self.error_content.trim().is_empty() {
            errors.push(ValidationFieldError::new("errorContent", "Nội dung lỗi là bắt buộc"));
        }

        if self.images.iter().any(|image| image.trim().is_empty()) {
            errors.push(ValidationFieldError::new("images", "Đường dẫn ảnh trống"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::global_error::ErrorCode;

    #[test]
    fn draft_requires_error_content() {
        let draft = IssueDraftRequest::new(Dept::Song, "  ", "Điều chỉnh nhiệt độ");
        let err = draft.validate().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert!(err.detail().unwrap().contains("errorContent"));
    }

    #[test]
    fn fix_content_may_be_empty() {
        let draft = IssueDraftRequest::new(Dept::Kho, "Móp góc thùng", "");
        assert!(draft.validate().is_ok());
    }
}
