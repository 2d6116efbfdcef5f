//! VerificationSession - the in-memory record of one OTP challenge.
//!
//! Created when a code is dispatched, discarded on success or when the
//! containing flow is dropped. Never persisted.

use crate::domains::auth::models::{Identifier, IdentifierKind};

/// Failed verification attempts allowed before the session locks.
pub const MAX_FAILED_ATTEMPTS: u8 = 5;

/// Workflow context deciding the delivery channel and code length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    NewAccountCreation,
    PasswordReset,
    PhoneUpdate,
}

/// Which external channel carries the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Phone-OTP vendor; 4-digit codes, keyed by phone number.
    Vendor,
    /// Backend-issued phone token; 6-digit codes, redeemed with a user id.
    BackendPhone,
    /// Backend-issued email token; 6-digit codes, user id re-derived from
    /// the identifier at verification time.
    BackendEmail,
}

impl Channel {
    pub fn required_code_len(&self) -> usize {
        match self {
            // Vendor constraint: the SMS vendor issues 4-digit codes,
            // backend tokens are 6 digits.
            Channel::Vendor => 4,
            Channel::BackendPhone | Channel::BackendEmail => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    AwaitingCode,
    Verifying,
    Verified,
    Failed,
}

#[derive(Debug)]
pub struct VerificationSession {
    identifier: Identifier,
    purpose: Purpose,
    /// Opaque id from the dispatcher, where the channel issues one. A
    /// re-dispatch replaces it; the prior handle is dead from then on.
    correlation_handle: Option<String>,
    state: AttemptState,
    resend_used: bool,
    failed_attempts: u8,
}

impl VerificationSession {
    pub fn new(identifier: Identifier, purpose: Purpose) -> Self {
        Self {
            identifier,
            purpose,
            correlation_handle: None,
            state: AttemptState::AwaitingCode,
            resend_used: false,
            failed_attempts: 0,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn correlation_handle(&self) -> Option<&str> {
        self.correlation_handle.as_deref()
    }

    /// Store the handle from a (re)dispatch, invalidating any prior one.
    pub fn set_correlation_handle(&mut self, handle: Option<String>) {
        self.correlation_handle = handle;
    }

    pub fn channel(&self) -> Channel {
        match (self.purpose, self.identifier.kind()) {
            (Purpose::NewAccountCreation | Purpose::PhoneUpdate, _) => Channel::Vendor,
            (Purpose::PasswordReset, IdentifierKind::Phone) => Channel::BackendPhone,
            (Purpose::PasswordReset, IdentifierKind::Email) => Channel::BackendEmail,
        }
    }

    pub fn required_code_len(&self) -> usize {
        self.channel().required_code_len()
    }

    /// Claim the single resend. Returns false (and changes nothing) once the
    /// resend has already been used.
    pub fn try_use_resend(&mut self) -> bool {
        if self.resend_used {
            return false;
        }
        self.resend_used = true;
        true
    }

    pub fn resend_used(&self) -> bool {
        self.resend_used
    }

    pub fn begin_verify(&mut self) {
        self.state = AttemptState::Verifying;
    }

    pub fn mark_verified(&mut self) {
        self.state = AttemptState::Verified;
    }

    /// Record a rejected code. Returns to AwaitingCode until the attempt
    /// budget is spent, then locks the session.
    pub fn record_failure(&mut self) -> AttemptState {
        self.failed_attempts += 1;
        self.state = if self.failed_attempts >= MAX_FAILED_ATTEMPTS {
            AttemptState::Failed
        } else {
            AttemptState::AwaitingCode
        };
        self.state
    }

    pub fn failed_attempts(&self) -> u8 {
        self.failed_attempts
    }
}
