use serde::{Deserialize, Serialize};

use super::global_error::{AppError, ValidationFieldError};

/// Maximum length of a chat message body in characters.
pub const MAX_MESSAGE_LENGTH: usize = 4_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl SendMessageRequest {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            images: Vec::new(),
        }
    }

    /// A message with no text and no attachment is dropped, not rejected.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.images.is_empty()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();

        if self.text.chars().count() > MAX_MESSAGE_LENGTH {
            errors.push(ValidationFieldError::new(
                "text",
                format!("Tin nhắn vượt quá {} ký tự", MAX_MESSAGE_LENGTH),
            ));
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

/// Extract `@handle` mentions. `@` must start the text or follow a
/// non-alphanumeric character; the handle is ascii alphanumerics, `_` or `-`.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut mentions = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut prev: Option<char> = None;

    while let Some((i, c)) = chars.next() {
        if c == '@' && !prev.is_some_and(|p| p.is_alphanumeric()) {
            let start = i + 1;
            let mut end = start;
            while let Some(&(j, next)) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' || next == '-' {
                    end = j + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            if end > start {
                mentions.push(text[start..end].to_string());
            }
            prev = text[..end].chars().next_back();
            continue;
        }
        prev = Some(c);
    }

    mentions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_request_has_no_text_and_no_images() {
        assert!(SendMessageRequest::text("   ").is_blank());
        assert!(!SendMessageRequest::text("ok").is_blank());

        let image_only = SendMessageRequest {
            text: String::new(),
            images: vec!["https://picsum.photos/400/300?random=2".to_string()],
        };
        assert!(!image_only.is_blank());
    }

    #[test]
    fn oversized_message_fails_validation() {
        let request = SendMessageRequest::text(&"a".repeat(MAX_MESSAGE_LENGTH + 1));
        assert!(request.validate().is_err());
        assert!(SendMessageRequest::text("Hở nắp").validate().is_ok());
    }

    #[test]
    fn extracts_mentions_next_to_vietnamese_text() {
        let mentions = extract_mentions("@NV001 kiểm tra giúp, cc @NV004.");
        assert_eq!(mentions, vec!["NV001", "NV004"]);
    }

    #[test]
    fn ignores_email_like_at_signs() {
        assert!(extract_mentions("gửi admin@heineken.vn").is_empty());
        assert!(extract_mentions("@ lone").is_empty());
    }
}
