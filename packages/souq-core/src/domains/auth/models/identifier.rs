//! Identifier - a phone number or email address addressing an account.
//!
//! Phone numbers are stored in one canonical international form
//! (country-code prefix + 9 local digits); emails are used as entered after
//! a minimal shape check. All comparison happens on canonical values.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domains::auth::errors::AuthError;

lazy_static! {
    /// Local phone numbers are exactly 9 digits before the prefix is applied.
    static ref LOCAL_PHONE_RE: Regex = Regex::new(r"^[0-9]{9}$").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierKind {
    Phone,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identifier {
    /// Canonical international phone number, e.g. `+966512345678`.
    Phone(String),
    /// Email address as entered (trimmed).
    Email(String),
}

impl Identifier {
    /// Canonicalize raw user input. Pure; no network access.
    ///
    /// Phones: whitespace is stripped, then the input must either match the
    /// 9-digit local pattern (the prefix is applied) or already be in the
    /// canonical form for `country_code` (idempotence). Emails: trimmed and
    /// required to contain `@`.
    pub fn normalize(
        raw: &str,
        kind: IdentifierKind,
        country_code: &str,
    ) -> Result<Self, AuthError> {
        match kind {
            IdentifierKind::Phone => {
                let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

                if let Some(local) = digits.strip_prefix(country_code) {
                    if LOCAL_PHONE_RE.is_match(local) {
                        return Ok(Identifier::Phone(digits));
                    }
                }

                if LOCAL_PHONE_RE.is_match(&digits) {
                    Ok(Identifier::Phone(format!("{}{}", country_code, digits)))
                } else {
                    Err(AuthError::InvalidFormat(raw.to_string()))
                }
            }
            IdentifierKind::Email => {
                let email = raw.trim();
                if email.contains('@') {
                    Ok(Identifier::Email(email.to_string()))
                } else {
                    Err(AuthError::InvalidFormat(raw.to_string()))
                }
            }
        }
    }

    pub fn kind(&self) -> IdentifierKind {
        match self {
            Identifier::Phone(_) => IdentifierKind::Phone,
            Identifier::Email(_) => IdentifierKind::Email,
        }
    }

    /// The canonical value sent to collaborators.
    pub fn value(&self) -> &str {
        match self {
            Identifier::Phone(v) | Identifier::Email(v) => v,
        }
    }

    /// Name of the users-collection field this identifier is stored in.
    pub fn field_name(&self) -> &'static str {
        match self {
            Identifier::Phone(_) => "phone",
            Identifier::Email(_) => "email",
        }
    }
}
