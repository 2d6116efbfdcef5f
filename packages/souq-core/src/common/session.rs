//! Session context - the current authenticated identity.
//!
//! Injected explicitly into whatever needs it rather than living in a global;
//! lifecycle is load → (sign_in | sign_out) → clear.

use anyhow::Result;
use tracing::info;

use crate::common::types::{AccountInfo, Document, ProfileDetails};
use crate::kernel::ClientDeps;

/// The signed-in user as seen by the client: backend account plus the
/// marketplace user document.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub account: AccountInfo,
    pub user_doc: Document,
}

impl CurrentUser {
    pub fn user_name(&self) -> &str {
        self.user_doc.get_str("userName").unwrap_or_default()
    }

    /// Deserialize the profile details blob, if present.
    pub fn details(&self) -> Option<ProfileDetails> {
        let blob = self
            .user_doc
            .data
            .get("Details")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|v| v.as_str())?;
        serde_json::from_str(blob).ok()
    }
}

/// Holder for the current session, shared by screens that need the identity.
#[derive(Default)]
pub struct SessionContext {
    current: Option<CurrentUser>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&CurrentUser> {
        self.current.as_ref()
    }

    pub fn set(&mut self, user: CurrentUser) {
        self.current = Some(user);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Load the current user from the backend session, if one exists.
    pub async fn load(&mut self, deps: &ClientDeps) -> Result<Option<&CurrentUser>> {
        let Some(account) = deps.auth.current_account().await? else {
            self.current = None;
            return Ok(None);
        };

        let user_doc = deps.store.lookup("$id", &account.id).await?;
        self.current = user_doc.map(|user_doc| CurrentUser { account, user_doc });
        Ok(self.current.as_ref())
    }

    /// Establish an email/password session and load the user behind it.
    pub async fn sign_in(&mut self, deps: &ClientDeps, email: &str, password: &str) -> Result<()> {
        deps.auth.start_session(email, password).await?;
        info!(email = %email, "session established");
        self.load(deps).await?;
        Ok(())
    }

    /// Terminate the backend session and drop the in-memory identity.
    pub async fn sign_out(&mut self, deps: &ClientDeps) -> Result<()> {
        deps.auth.end_session().await?;
        self.clear();
        info!("session terminated");
        Ok(())
    }
}
