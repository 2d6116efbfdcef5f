//! Profile mutations: avatar replacement and details updates.
//!
//! These run against an authenticated session; the profile blob keeps the
//! same serialized shape the account mutator wrote at signup.

use anyhow::Result;
use serde_json::json;
use tracing::info;

use crate::common::types::ProfileDetails;
use crate::kernel::ClientDeps;

/// Upload a new profile image and point the user's details blob at it.
/// Returns the public URL of the uploaded file.
pub async fn update_avatar(
    deps: &ClientDeps,
    user_id: &str,
    mut details: ProfileDetails,
    bytes: Vec<u8>,
    file_name: &str,
    mime: &str,
) -> Result<String> {
    let file_id = deps.objects.put_file(bytes, file_name, mime).await?;
    let url = deps.objects.file_url(&file_id);

    details.image_url = url.clone();
    update_details(deps, user_id, &details).await?;

    info!(%user_id, "profile image updated");
    Ok(url)
}

/// Persist the profile details blob on the user document.
pub async fn update_details(
    deps: &ClientDeps,
    user_id: &str,
    details: &ProfileDetails,
) -> Result<()> {
    let blob = serde_json::to_string(details)?;
    deps.store
        .update(user_id, json!({ "Details": [blob] }))
        .await?;
    Ok(())
}
