//! Existence check and OTP dispatch.

use tracing::{error, info};

use crate::domains::auth::errors::AuthError;
use crate::domains::auth::models::Identifier;
use crate::domains::auth::session::{Channel, VerificationSession};
use crate::kernel::ClientDeps;

/// Point lookup: does an account exist for this canonical identifier?
///
/// "Not found" is `Ok(false)`; only transport/backend faults are errors.
pub async fn identifier_exists(
    deps: &ClientDeps,
    identifier: &Identifier,
) -> Result<bool, AuthError> {
    let found = deps
        .store
        .lookup(identifier.field_name(), identifier.value())
        .await
        .map_err(|e| {
            error!(field = identifier.field_name(), "existence lookup failed: {e:#}");
            AuthError::LookupFailed(e)
        })?;
    Ok(found.is_some())
}

/// Send a one-time code over the session's channel and store the correlation
/// handle where the channel issues one.
///
/// Not idempotent: every call sends a new message, and a re-dispatch
/// invalidates the prior handle. The caller decides when dispatch is
/// permitted (first send or the single resend).
pub async fn dispatch_code(
    deps: &ClientDeps,
    session: &mut VerificationSession,
) -> Result<(), AuthError> {
    let identifier = session.identifier().value().to_string();

    let handle = match session.channel() {
        Channel::Vendor => {
            deps.otp_vendor.send_otp(&identifier).await.map_err(|e| {
                error!("vendor OTP dispatch failed: {e:#}");
                AuthError::DispatchFailed(e)
            })?;
            None
        }
        Channel::BackendPhone => {
            let user_id = deps.auth.send_phone_code(&identifier).await.map_err(|e| {
                error!("phone token dispatch failed: {e:#}");
                AuthError::DispatchFailed(e)
            })?;
            Some(user_id)
        }
        Channel::BackendEmail => {
            deps.auth.send_email_code(&identifier).await.map_err(|e| {
                error!("email token dispatch failed: {e:#}");
                AuthError::DispatchFailed(e)
            })?;
            None
        }
    };

    session.set_correlation_handle(handle);
    info!(channel = ?session.channel(), "verification code dispatched");
    Ok(())
}
