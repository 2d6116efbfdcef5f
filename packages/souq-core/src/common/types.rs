use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document returned by the backend's document database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Collection-specific fields.
    #[serde(flatten)]
    pub data: serde_json::Value,
}

impl Document {
    /// Fetch a string field from the document body.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }
}

/// The account behind an authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(rename = "$id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// Profile fields persisted as one serialized blob on the user document.
///
/// Field names match the backend collection schema; they are part of the
/// stored format and cannot be renamed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDetails {
    pub name: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "Rates")]
    pub rates: String,
    #[serde(rename = "birthDay")]
    pub birth_day: String,
    pub gender: String,
    pub address: String,
    pub views: String,
    pub password: String,
}

impl ProfileDetails {
    /// Initial profile for a freshly created account.
    pub fn initial(name: &str, image_url: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            image_url: image_url.to_string(),
            rates: "0".to_string(),
            birth_day: String::new(),
            gender: String::new(),
            address: String::new(),
            views: "0".to_string(),
            password: password.to_string(),
        }
    }
}
