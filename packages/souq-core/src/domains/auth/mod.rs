//! Auth domain - OTP-based identity verification and password recovery.
//!
//! Two interactive workflows run through [`orchestrator::AuthFlow`]:
//! new-account signup with phone verification, and forgot-password with
//! identifier verification. A third, smaller flow covers phone-number
//! changes. Everything network-bound goes through the Base* collaborator
//! traits in kernel/.

pub mod actions;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod session;
pub mod username;

pub use errors::AuthError;
pub use models::{Identifier, IdentifierKind, RecoveryDraft, SignupDraft};
pub use orchestrator::{AuthFlow, FlowState};
pub use session::{AttemptState, Channel, Purpose, VerificationSession, MAX_FAILED_ATTEMPTS};
