//! Unique username derivation.
//!
//! The display name is transliterated to ASCII (Arabic script is common
//! here), lowercased, stripped of whitespace, and then made unique against
//! the users collection by appending numeric suffixes. The suffix search is
//! capped; after that one random token is tried before giving up.

use tracing::warn;

use crate::domains::auth::errors::AuthError;
use crate::kernel::BaseAccountStore;

/// Numeric-suffix candidates tried before falling back to a random token.
const MAX_SUFFIX_ATTEMPTS: u32 = 50;

/// Map one Arabic character to its Latin transliteration.
fn transliterate_char(c: char) -> Option<&'static str> {
    Some(match c {
        'ا' | 'أ' | 'آ' | 'ٱ' | 'ى' => "a",
        'ب' => "b",
        'ت' | 'ط' => "t",
        'ث' => "th",
        'ج' => "j",
        'ح' | 'ه' | 'ة' => "h",
        'خ' => "kh",
        'د' | 'ض' => "d",
        'ذ' => "dh",
        'ر' => "r",
        'ز' | 'ظ' => "z",
        'س' | 'ص' => "s",
        'ش' => "sh",
        'ع' => "a",
        'غ' => "gh",
        'ف' => "f",
        'ق' => "q",
        'ك' => "k",
        'ل' => "l",
        'م' => "m",
        'ن' => "n",
        'و' | 'ؤ' => "w",
        'ي' | 'ئ' => "y",
        'إ' => "i",
        'ء' | 'ّ' | 'ْ' | 'ً' | 'ٌ' | 'ٍ' | 'ٓ' => "",
        'َ' => "a",
        'ُ' => "u",
        'ِ' => "i",
        '٠' => "0",
        '١' => "1",
        '٢' => "2",
        '٣' => "3",
        '٤' => "4",
        '٥' => "5",
        '٦' => "6",
        '٧' => "7",
        '٨' => "8",
        '٩' => "9",
        _ => return None,
    })
}

fn is_arabic(c: char) -> bool {
    matches!(c,
        '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' | '\u{08A0}'..='\u{08FF}')
}

/// Transliterate Arabic script to Latin; other characters pass through.
pub fn transliterate(name: &str) -> String {
    name.chars()
        .map(|c| {
            if is_arabic(c) {
                transliterate_char(c).unwrap_or("").to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}

/// The lowercase, whitespace-free base all candidates start from.
pub fn base_username(name: &str) -> String {
    transliterate(name)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

async fn username_taken(store: &dyn BaseAccountStore, candidate: &str) -> Result<bool, AuthError> {
    let found = store
        .lookup("userName", candidate)
        .await
        .map_err(AuthError::LookupFailed)?;
    Ok(found.is_some())
}

/// Derive a username no existing user document holds.
///
/// Tries `base`, `base1` .. `base50`, then one random token suffix. Fails
/// with `NameGenerationExhausted` if even that collides.
pub async fn generate_unique_username(
    store: &dyn BaseAccountStore,
    name: &str,
) -> Result<String, AuthError> {
    let base = base_username(name);

    if !username_taken(store, &base).await? {
        return Ok(base);
    }

    for counter in 1..=MAX_SUFFIX_ATTEMPTS {
        let candidate = format!("{}{}", base, counter);
        if !username_taken(store, &candidate).await? {
            return Ok(candidate);
        }
    }

    // Collision-resistant fallback: one random token attempt.
    let token = uuid::Uuid::new_v4().simple().to_string();
    let candidate = format!("{}{}", base, &token[..8]);
    if !username_taken(store, &candidate).await? {
        return Ok(candidate);
    }

    warn!(%base, "username generation exhausted its attempts");
    Err(AuthError::NameGenerationExhausted)
}
