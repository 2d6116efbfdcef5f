//! Account mutations - each invoked exactly once after a verified OTP,
//! never speculatively.

use serde_json::json;
use tracing::{error, info};

use crate::common::types::{Document, ProfileDetails};
use crate::domains::auth::errors::AuthError;
use crate::domains::auth::models::{Identifier, SignupDraft};
use crate::domains::auth::username::generate_unique_username;
use crate::kernel::ClientDeps;

/// Create a durable account from a verified signup draft.
///
/// Consumes the draft: backend identity, unique username, session, user
/// document, then the verified phone number is bound to the account.
pub async fn create_account(
    deps: &ClientDeps,
    draft: SignupDraft,
    phone: &Identifier,
) -> Result<Document, AuthError> {
    let user_id = deps
        .auth
        .create_account(&draft.email, &draft.password, &draft.name)
        .await
        .map_err(|e| {
            error!("account creation failed: {e:#}");
            AuthError::MutationFailed(e)
        })?;

    let user_name = generate_unique_username(deps.store.as_ref(), &draft.name).await?;
    let avatar_url = deps.objects.initials_avatar_url(&user_name);

    deps.auth
        .start_session(&draft.email, &draft.password)
        .await
        .map_err(AuthError::MutationFailed)?;

    let details = ProfileDetails::initial(&draft.name, &avatar_url, &draft.password);
    let details_blob =
        serde_json::to_string(&details).map_err(|e| AuthError::MutationFailed(e.into()))?;

    let doc = deps
        .store
        .create(
            &user_id,
            json!({
                "userName": user_name,
                "email": draft.email,
                "phone": phone.value(),
                "Details": [details_blob],
            }),
        )
        .await
        .map_err(|e| {
            error!("user document creation failed: {e:#}");
            AuthError::MutationFailed(e)
        })?;

    deps.auth
        .rebind_phone(phone.value(), &draft.password)
        .await
        .map_err(AuthError::MutationFailed)?;

    info!(user_id = %doc.id, "account created");
    Ok(doc)
}

/// Rebind a verified phone number to the authenticated account; the current
/// password is required as re-authentication proof.
pub async fn update_phone_number(
    deps: &ClientDeps,
    phone: &Identifier,
    password: &str,
) -> Result<(), AuthError> {
    deps.auth
        .rebind_phone(phone.value(), password)
        .await
        .map_err(|e| {
            error!("phone rebind failed: {e:#}");
            AuthError::MutationFailed(e)
        })?;
    info!("phone number updated");
    Ok(())
}

/// Password change from account settings: the old password is known.
pub async fn reset_password_authenticated(
    deps: &ClientDeps,
    new_password: &str,
    old_password: &str,
) -> Result<(), AuthError> {
    deps.auth
        .change_password(new_password, Some(old_password))
        .await
        .map_err(|e| {
            error!("authenticated password reset failed: {e:#}");
            AuthError::MutationFailed(e)
        })?;
    info!("password changed");
    Ok(())
}

/// Recovery password change: driven purely by the session the verified OTP
/// established, no old password needed.
pub async fn reset_password_recovered(
    deps: &ClientDeps,
    new_password: &str,
) -> Result<(), AuthError> {
    deps.auth
        .change_password(new_password, None)
        .await
        .map_err(|e| {
            error!("recovery password reset failed: {e:#}");
            AuthError::MutationFailed(e)
        })?;
    info!("password reset via recovery");
    Ok(())
}
