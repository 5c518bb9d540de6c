pub mod auth;
pub mod configuration;
pub mod console;
pub mod dashboard;
pub mod entity;
pub mod model;
pub mod seed;
pub mod store;
pub mod telemetry;
pub mod workspace;

pub use model::global_error::{AppError, ErrorCode};
pub use store::{RecordStore, UpdatePolicy};
pub use workspace::Workspace;
