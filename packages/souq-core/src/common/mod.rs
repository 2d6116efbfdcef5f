// Common types and utilities shared across the client core

pub mod session;
pub mod types;

pub use session::{CurrentUser, SessionContext};
pub use types::*;
