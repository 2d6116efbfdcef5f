// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. Workflow rules
// (existence gating, resend limits, code-length checks) live in domain code
// that uses these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAccountStore)

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::common::types::{AccountInfo, Document};

// =============================================================================
// Account Store (document database, users collection)
// =============================================================================

#[async_trait]
pub trait BaseAccountStore: Send + Sync {
    /// Point lookup by an indexed field. `Ok(None)` means "no such document";
    /// transport and backend faults are errors.
    async fn lookup(&self, field: &str, value: &str) -> Result<Option<Document>>;

    /// Create a document with the given id and fields.
    async fn create(&self, id: &str, data: Value) -> Result<Document>;

    /// Partial update of an existing document.
    async fn update(&self, id: &str, data: Value) -> Result<Document>;
}

// =============================================================================
// Auth Service (backend account/session API)
// =============================================================================

#[async_trait]
pub trait BaseAuthService: Send + Sync {
    /// Allocate a new durable identity. Returns the new account id.
    async fn create_account(&self, email: &str, password: &str, name: &str) -> Result<String>;

    /// Establish an email/password session for subsequent calls.
    async fn start_session(&self, email: &str, password: &str) -> Result<()>;

    /// Send a one-time code to an email address. Verification later re-derives
    /// the account from the identifier, so no handle is returned.
    async fn send_email_code(&self, email: &str) -> Result<()>;

    /// Send a one-time code to a phone number. Returns the backend-issued
    /// user id used to redeem the code.
    async fn send_phone_code(&self, phone: &str) -> Result<String>;

    /// Redeem a one-time code for a session.
    async fn redeem_session(&self, user_id: &str, code: &str) -> Result<()>;

    /// Change the password of the current session's account. `old` is
    /// required for the authenticated path and absent for the recovery path.
    async fn change_password(&self, new: &str, old: Option<&str>) -> Result<()>;

    /// Rebind the account's phone number; the current password is required
    /// as re-authentication proof.
    async fn rebind_phone(&self, phone: &str, password: &str) -> Result<()>;

    /// Fetch the account behind the current session, if any.
    async fn current_account(&self) -> Result<Option<AccountInfo>>;

    /// Terminate the current session.
    async fn end_session(&self) -> Result<()>;
}

// =============================================================================
// OTP Vendor (external SMS verification service)
// =============================================================================

#[async_trait]
pub trait BaseOtpVendor: Send + Sync {
    /// Send a fresh code to `phone` (canonical international form). Not
    /// idempotent: every call sends a new message.
    async fn send_otp(&self, phone: &str) -> Result<()>;

    /// Check a user-entered code. `Ok(false)` means the vendor rejected the
    /// code (wrong or expired); `Err` means the check itself could not be
    /// performed and says nothing about the code.
    async fn verify_otp(&self, phone: &str, code: &str) -> Result<bool>;
}

// =============================================================================
// Object Store (file storage for profile images)
// =============================================================================

#[async_trait]
pub trait BaseObjectStore: Send + Sync {
    /// Upload a file and return its id.
    async fn put_file(&self, bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<String>;

    /// Public view URL for an uploaded file.
    fn file_url(&self, file_id: &str) -> String;

    /// URL of a generated initials avatar for a display name.
    fn initials_avatar_url(&self, name: &str) -> String;
}
