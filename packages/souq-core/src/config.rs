use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_endpoint: String,
    pub backend_project_id: String,
    pub database_id: String,
    pub users_collection_id: String,
    pub storage_bucket_id: String,
    pub authentica_api_key: String,
    pub authentica_sender_name: Option<String>,
    /// International dialing prefix applied to local phone numbers.
    pub country_code: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            backend_endpoint: env::var("BACKEND_ENDPOINT")
                .context("BACKEND_ENDPOINT must be set")?,
            backend_project_id: env::var("BACKEND_PROJECT_ID")
                .context("BACKEND_PROJECT_ID must be set")?,
            database_id: env::var("BACKEND_DATABASE_ID")
                .context("BACKEND_DATABASE_ID must be set")?,
            users_collection_id: env::var("BACKEND_USERS_COLLECTION_ID")
                .context("BACKEND_USERS_COLLECTION_ID must be set")?,
            storage_bucket_id: env::var("BACKEND_STORAGE_BUCKET_ID")
                .context("BACKEND_STORAGE_BUCKET_ID must be set")?,
            authentica_api_key: env::var("AUTHENTICA_API_KEY")
                .context("AUTHENTICA_API_KEY must be set")?,
            authentica_sender_name: env::var("AUTHENTICA_SENDER_NAME").ok(),
            country_code: env::var("COUNTRY_CODE").unwrap_or_else(|_| "+966".to_string()),
        })
    }
}
