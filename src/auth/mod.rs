pub mod guard;
pub mod session;

pub use guard::{RequireAdmin, RequireSession};
pub use session::{authenticate, Session};
