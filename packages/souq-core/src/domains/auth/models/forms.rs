//! Form drafts carried across workflow steps.
//!
//! Each workflow has its own draft variant with explicit required fields,
//! validated at the boundary before the next step runs. The signup draft is
//! consumed exactly once, by account creation after a verified OTP.

use crate::domains::auth::errors::AuthError;
use crate::domains::auth::models::{Identifier, IdentifierKind};

/// New-account form: all fields required, passwords must match.
#[derive(Debug, Clone)]
pub struct SignupDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl SignupDraft {
    /// Validate the draft and produce the canonical identifiers.
    ///
    /// Runs entirely locally; the caller only proceeds to existence checks
    /// and dispatch once this passes.
    pub fn validate(&self, country_code: &str) -> Result<(Identifier, Identifier), AuthError> {
        if self.name.trim().is_empty()
            || self.phone.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.password_confirmation.is_empty()
        {
            return Err(AuthError::InvalidFormat("missing required field".to_string()));
        }

        if self.password != self.password_confirmation {
            return Err(AuthError::InvalidFormat("passwords do not match".to_string()));
        }

        let phone = Identifier::normalize(&self.phone, IdentifierKind::Phone, country_code)?;
        let email = Identifier::normalize(&self.email, IdentifierKind::Email, country_code)?;
        Ok((phone, email))
    }
}

/// Password-recovery form: a single identifier of a declared kind.
#[derive(Debug, Clone)]
pub struct RecoveryDraft {
    pub value: String,
    pub kind: IdentifierKind,
}

impl RecoveryDraft {
    pub fn validate(&self, country_code: &str) -> Result<Identifier, AuthError> {
        if self.value.trim().is_empty() {
            return Err(AuthError::InvalidFormat("missing identifier".to_string()));
        }
        Identifier::normalize(&self.value, self.kind, country_code)
    }
}
