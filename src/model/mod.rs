pub mod auth;
pub mod chat;
pub mod global_error;
pub mod issue;
pub mod record;
pub mod view;

pub use auth::{EmployeeResponse, LoginRequest};
pub use chat::SendMessageRequest;
pub use global_error::{AppError, ErrorCode, ValidationFieldError};
pub use issue::IssueDraftRequest;
pub use record::RecordPatch;
pub use view::ViewTab;
