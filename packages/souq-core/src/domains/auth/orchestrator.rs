//! Flow orchestrator - sequences normalization, existence gating, dispatch,
//! verification, and the final account mutation for one interactive flow.
//!
//! State machine:
//!   Idle → AwaitingIdentifier → Dispatching → AwaitingCode → Verifying
//!        → Verified → Mutating → Done | Failed
//!
//! One orchestrator instance backs one screen. Events arriving in a state
//! that does not accept them are no-ops (the UI analog is a disabled
//! button), which also gives the at-most-once mutation guarantee under
//! repeated "continue" taps. `Done` and `Failed` are terminal; `restart`
//! returns to `Idle`.

use std::sync::Arc;
use tracing::{debug, info};

use crate::domains::auth::actions;
use crate::domains::auth::errors::AuthError;
use crate::domains::auth::models::{RecoveryDraft, SignupDraft};
use crate::domains::auth::session::{Purpose, VerificationSession};
use crate::kernel::ClientDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    AwaitingIdentifier,
    Dispatching,
    AwaitingCode,
    Verifying,
    Verified,
    Mutating,
    Done,
    Failed,
}

pub struct AuthFlow {
    deps: Arc<ClientDeps>,
    purpose: Purpose,
    state: FlowState,
    session: Option<VerificationSession>,
    /// Signup form held until verification succeeds, then consumed exactly
    /// once by account creation.
    pending_signup: Option<SignupDraft>,
    /// Re-authentication proof for the phone-update flow.
    phone_update_password: Option<String>,
    /// Set while a network-bound transition is in flight; re-entrant
    /// submissions are rejected as no-ops.
    busy: bool,
}

impl AuthFlow {
    /// New-account workflow: phone verification, then account creation.
    pub fn signup(deps: Arc<ClientDeps>) -> Self {
        Self::new(deps, Purpose::NewAccountCreation)
    }

    /// Forgot-password workflow: identifier verification, then a recovery
    /// password reset.
    pub fn recovery(deps: Arc<ClientDeps>) -> Self {
        Self::new(deps, Purpose::PasswordReset)
    }

    /// Phone-change workflow for an already-authenticated account.
    pub fn phone_update(deps: Arc<ClientDeps>, password: String) -> Self {
        let mut flow = Self::new(deps, Purpose::PhoneUpdate);
        flow.phone_update_password = Some(password);
        flow
    }

    fn new(deps: Arc<ClientDeps>, purpose: Purpose) -> Self {
        Self {
            deps,
            purpose,
            state: FlowState::Idle,
            session: None,
            pending_signup: None,
            phone_update_password: None,
            busy: false,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// The screen opened; accept form input.
    pub fn open(&mut self) {
        if self.state == FlowState::Idle {
            self.state = FlowState::AwaitingIdentifier;
        }
    }

    /// Restart from scratch after a terminal state.
    pub fn restart(&mut self) {
        self.state = FlowState::Idle;
        self.session = None;
        self.pending_signup = None;
        self.busy = false;
    }

    fn accepts(&self, state: FlowState) -> bool {
        !self.busy && self.state == state
    }

    /// Submit the signup form: validate locally, gate on non-existence of
    /// both identifiers, then dispatch the phone code.
    pub async fn submit_signup(&mut self, draft: SignupDraft) -> Result<(), AuthError> {
        if self.purpose != Purpose::NewAccountCreation || !self.accepts(FlowState::AwaitingIdentifier)
        {
            debug!(state = ?self.state, "signup submission ignored");
            return Ok(());
        }
        self.busy = true;
        let result = self.do_submit_signup(draft).await;
        self.busy = false;
        result
    }

    async fn do_submit_signup(&mut self, draft: SignupDraft) -> Result<(), AuthError> {
        // Local validation first; nothing leaves the device until it passes.
        let (phone, email) = draft.validate(&self.deps.country_code)?;

        if actions::identifier_exists(&self.deps, &phone).await? {
            return Err(AuthError::AlreadyExists);
        }
        if actions::identifier_exists(&self.deps, &email).await? {
            return Err(AuthError::AlreadyExists);
        }

        self.state = FlowState::Dispatching;
        let mut session = VerificationSession::new(phone, self.purpose);
        match actions::dispatch_code(&self.deps, &mut session).await {
            Ok(()) => {
                self.session = Some(session);
                self.pending_signup = Some(draft);
                self.state = FlowState::AwaitingCode;
                Ok(())
            }
            Err(e) => {
                // Recoverable: the user may correct the form and retry.
                self.state = FlowState::AwaitingIdentifier;
                Err(e)
            }
        }
    }

    /// Submit a recovery or phone-update identifier. Recovery requires the
    /// account to exist; phone update requires the new number to be free.
    pub async fn submit_identifier(&mut self, draft: RecoveryDraft) -> Result<(), AuthError> {
        if self.purpose == Purpose::NewAccountCreation || !self.accepts(FlowState::AwaitingIdentifier)
        {
            debug!(state = ?self.state, "identifier submission ignored");
            return Ok(());
        }
        self.busy = true;
        let result = self.do_submit_identifier(draft).await;
        self.busy = false;
        result
    }

    async fn do_submit_identifier(&mut self, draft: RecoveryDraft) -> Result<(), AuthError> {
        let identifier = draft.validate(&self.deps.country_code)?;

        let exists = actions::identifier_exists(&self.deps, &identifier).await?;
        match self.purpose {
            // Recovery must target a real account.
            Purpose::PasswordReset if !exists => return Err(AuthError::NotFound),
            // A phone number can only be bound to one account.
            Purpose::PhoneUpdate if exists => return Err(AuthError::AlreadyExists),
            _ => {}
        }

        self.state = FlowState::Dispatching;
        let mut session = VerificationSession::new(identifier, self.purpose);
        match actions::dispatch_code(&self.deps, &mut session).await {
            Ok(()) => {
                self.session = Some(session);
                self.state = FlowState::AwaitingCode;
                Ok(())
            }
            Err(e) => {
                self.state = FlowState::AwaitingIdentifier;
                Err(e)
            }
        }
    }

    /// Re-send the code. Permitted once per session; a second request is a
    /// no-op that performs no vendor call.
    pub async fn resend(&mut self) -> Result<(), AuthError> {
        if !self.accepts(FlowState::AwaitingCode) {
            return Ok(());
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        if !session.try_use_resend() {
            debug!("resend already used; ignoring");
            return Ok(());
        }

        self.busy = true;
        let result = actions::dispatch_code(&self.deps, session).await;
        self.busy = false;
        // State stays AwaitingCode either way; the resend is consumed even
        // when dispatch fails.
        result
    }

    /// Submit the entered code; on success the purpose's mutation runs
    /// exactly once and the flow reaches `Done`.
    pub async fn submit_code(&mut self, code: &str) -> Result<(), AuthError> {
        if !self.accepts(FlowState::AwaitingCode) {
            debug!(state = ?self.state, "code submission ignored");
            return Ok(());
        }
        self.busy = true;
        let result = self.do_submit_code(code).await;
        self.busy = false;
        result
    }

    async fn do_submit_code(&mut self, code: &str) -> Result<(), AuthError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        // Length gate is local; the verifier is never called for an
        // incomplete code and the state does not change.
        let expected = session.required_code_len();
        if code.len() < expected {
            return Err(AuthError::IncompleteCode { expected });
        }

        self.state = FlowState::Verifying;
        match actions::verify_code(&self.deps, session, code).await {
            Ok(()) => {}
            Err(AuthError::TooManyAttempts) => {
                self.state = FlowState::Failed;
                return Err(AuthError::TooManyAttempts);
            }
            Err(e) => {
                self.state = FlowState::AwaitingCode;
                return Err(e);
            }
        }

        self.state = FlowState::Verified;
        info!(purpose = ?self.purpose, "identity verified");

        match self.purpose {
            Purpose::NewAccountCreation => self.mutate_signup().await,
            Purpose::PhoneUpdate => self.mutate_phone_update().await,
            // Recovery needs the new password; the caller continues with
            // `complete_recovery`.
            Purpose::PasswordReset => Ok(()),
        }
    }

    async fn mutate_signup(&mut self) -> Result<(), AuthError> {
        self.state = FlowState::Mutating;

        // Taking the draft makes the mutation unrepeatable even if the
        // flow were driven again.
        let Some(draft) = self.pending_signup.take() else {
            self.state = FlowState::Failed;
            return Err(AuthError::MutationFailed(anyhow::anyhow!(
                "signup draft already consumed"
            )));
        };
        let Some(session) = self.session.take() else {
            self.state = FlowState::Failed;
            return Err(AuthError::MutationFailed(anyhow::anyhow!(
                "verification session missing"
            )));
        };

        match actions::create_account(&self.deps, draft, session.identifier()).await {
            Ok(_) => {
                self.state = FlowState::Done;
                Ok(())
            }
            Err(e) => {
                // No rollback of the verification; the user restarts.
                self.state = FlowState::Failed;
                Err(e)
            }
        }
    }

    async fn mutate_phone_update(&mut self) -> Result<(), AuthError> {
        self.state = FlowState::Mutating;

        let Some(session) = self.session.take() else {
            self.state = FlowState::Failed;
            return Err(AuthError::MutationFailed(anyhow::anyhow!(
                "verification session missing"
            )));
        };
        let password = self.phone_update_password.clone().unwrap_or_default();

        match actions::update_phone_number(&self.deps, session.identifier(), &password).await {
            Ok(()) => {
                self.state = FlowState::Done;
                Ok(())
            }
            Err(e) => {
                self.state = FlowState::Failed;
                Err(e)
            }
        }
    }

    /// Finish the recovery flow with the user's new password. Only valid in
    /// `Verified`; runs the reset exactly once.
    pub async fn complete_recovery(&mut self, new_password: &str) -> Result<(), AuthError> {
        if self.purpose != Purpose::PasswordReset || !self.accepts(FlowState::Verified) {
            debug!(state = ?self.state, "recovery completion ignored");
            return Ok(());
        }
        self.busy = true;
        let result = self.do_complete_recovery(new_password).await;
        self.busy = false;
        result
    }

    async fn do_complete_recovery(&mut self, new_password: &str) -> Result<(), AuthError> {
        self.state = FlowState::Mutating;
        self.session = None;

        match actions::reset_password_recovered(&self.deps, new_password).await {
            Ok(()) => {
                self.state = FlowState::Done;
                Ok(())
            }
            Err(e) => {
                self.state = FlowState::Failed;
                Err(e)
            }
        }
    }
}
