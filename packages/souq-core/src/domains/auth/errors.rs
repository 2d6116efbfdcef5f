use thiserror::Error;

/// Errors surfaced by the verification and recovery workflows.
///
/// Every collaborator failure is mapped into one of these at the workflow
/// boundary; raw backend/vendor error text never reaches the caller. Each
/// variant carries a user-displayable message via [`AuthError::user_message`].
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed identifier or form field; detected locally, no network call.
    #[error("invalid identifier format: {0}")]
    InvalidFormat(String),

    /// The entered code is shorter than the channel requires.
    #[error("verification code incomplete: expected {expected} digits")]
    IncompleteCode { expected: usize },

    /// Signup gate: an account already exists for this identifier.
    #[error("account already exists for this identifier")]
    AlreadyExists,

    /// Recovery gate: no account exists for this identifier.
    #[error("no account exists for this identifier")]
    NotFound,

    /// The OTP could not be sent.
    #[error("failed to dispatch verification code: {0}")]
    DispatchFailed(#[source] anyhow::Error),

    /// The vendor or backend did not accept the entered code.
    #[error("verification code invalid or expired")]
    InvalidOrExpiredCode,

    /// The code could not be checked at all (vendor outage or transport
    /// fault). Does not spend a verification attempt.
    #[error("verification service unavailable: {0}")]
    VerificationUnavailable(#[source] anyhow::Error),

    /// The session is locked after too many failed verification attempts.
    #[error("too many failed verification attempts")]
    TooManyAttempts,

    /// Existence lookup failed (transport or backend fault, not "not found").
    #[error("account lookup failed: {0}")]
    LookupFailed(#[source] anyhow::Error),

    /// Account creation/update/reset failed after a successful verification.
    #[error("account mutation failed: {0}")]
    MutationFailed(#[source] anyhow::Error),

    /// Unique username derivation gave up after exhausting its attempts.
    #[error("could not derive a unique username")]
    NameGenerationExhausted,
}

impl AuthError {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidFormat(_) => "Please check the phone number or email you entered.",
            AuthError::IncompleteCode { .. } => "Please fill in the complete verification code.",
            AuthError::AlreadyExists => {
                "This phone number or email is already registered. Please use another."
            }
            AuthError::NotFound => "No account was found for this phone number or email.",
            AuthError::DispatchFailed(_) => {
                "We could not send the verification code. Please try again."
            }
            AuthError::InvalidOrExpiredCode => "Verification failed. Please try again.",
            AuthError::VerificationUnavailable(_) => {
                "We could not check your code right now. Please try again."
            }
            AuthError::TooManyAttempts => {
                "Too many failed attempts. Please restart the verification."
            }
            AuthError::LookupFailed(_) => "Something went wrong. Please try again.",
            AuthError::MutationFailed(_) => {
                "We could not complete your request. Please try again."
            }
            AuthError::NameGenerationExhausted => {
                "We could not complete your request. Please try again."
            }
        }
    }
}
