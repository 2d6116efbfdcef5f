pub mod forms;
pub mod identifier;

pub use forms::{RecoveryDraft, SignupDraft};
pub use identifier::{Identifier, IdentifierKind};
