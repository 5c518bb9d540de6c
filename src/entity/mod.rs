pub mod chat_message;
pub mod customer;
pub mod employee;
pub mod issue_log;
pub mod product;
pub mod production_record;

pub use chat_message::ChatMessage;
pub use customer::Customer;
pub use employee::{Dept, Employee, Role};
pub use issue_log::{IssueLog, IssueStatus};
pub use product::Product;
pub use production_record::{ProductionRecord, RecordStatus};
