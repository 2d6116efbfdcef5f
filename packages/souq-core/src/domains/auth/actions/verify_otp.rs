//! OTP verification against the session's channel.

use tracing::{info, warn};

use crate::domains::auth::errors::AuthError;
use crate::domains::auth::session::{AttemptState, Channel, VerificationSession};
use crate::kernel::ClientDeps;

/// Confirm a user-entered code.
///
/// The code-length gate runs first and never touches the network. A rejected
/// code returns the session to `AwaitingCode` until the attempt budget is
/// spent, at which point the session locks. On success the session is marked
/// `Verified`, authorizing exactly one account mutation.
pub async fn verify_code(
    deps: &ClientDeps,
    session: &mut VerificationSession,
    code: &str,
) -> Result<(), AuthError> {
    let expected = session.required_code_len();
    if code.len() < expected {
        return Err(AuthError::IncompleteCode { expected });
    }

    session.begin_verify();

    let accepted = match session.channel() {
        // Rejection spends an attempt; a vendor outage surfaces as its own
        // error before the budget is touched.
        Channel::Vendor => deps
            .otp_vendor
            .verify_otp(session.identifier().value(), code)
            .await
            .map_err(AuthError::VerificationUnavailable)?,
        Channel::BackendPhone => {
            let user_id = match session.correlation_handle() {
                Some(handle) => handle.to_string(),
                None => resolve_user_id(deps, session).await?,
            };
            deps.auth.redeem_session(&user_id, code).await.is_ok()
        }
        Channel::BackendEmail => {
            // No caller-visible handle for email tokens; re-derive the
            // account from the identifier.
            let user_id = resolve_user_id(deps, session).await?;
            deps.auth.redeem_session(&user_id, code).await.is_ok()
        }
    };

    if !accepted {
        let state = session.record_failure();
        warn!(
            attempts = session.failed_attempts(),
            "verification code rejected"
        );
        return Err(if state == AttemptState::Failed {
            AuthError::TooManyAttempts
        } else {
            AuthError::InvalidOrExpiredCode
        });
    }

    session.mark_verified();
    info!(channel = ?session.channel(), "verification succeeded");
    Ok(())
}

/// Look up the account id behind the session's identifier.
async fn resolve_user_id(
    deps: &ClientDeps,
    session: &VerificationSession,
) -> Result<String, AuthError> {
    let identifier = session.identifier();
    let doc = deps
        .store
        .lookup(identifier.field_name(), identifier.value())
        .await
        .map_err(AuthError::LookupFailed)?
        .ok_or(AuthError::NotFound)?;
    Ok(doc.id)
}
