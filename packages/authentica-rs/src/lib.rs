// Minimal client for the Authentica OTP API (https://api.authentica.sa).
// Covers the two endpoints this app needs: sending an OTP over SMS and
// checking a user-entered code.

pub mod models;

use reqwest::{header, Client};

use crate::models::{SendOtpResponse, VerifyOtpResponse};

const BASE_URL: &str = "https://api.authentica.sa/api/sdk/v1";

#[derive(Debug, thiserror::Error)]
pub enum AuthenticaError {
    #[error("request to Authentica failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentica returned an error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The code did not match a pending verification or has expired.
    #[error("OTP rejected")]
    Rejected,
}

#[derive(Debug, Clone)]
pub struct AuthenticaOptions {
    /// Static bearer credential, sent as `X-Authorization`.
    pub api_key: String,
    /// Optional registered sender name shown in the SMS.
    pub sender_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthenticaService {
    options: AuthenticaOptions,
    client: Client,
    base_url: String,
}

impl AuthenticaService {
    pub fn new(options: AuthenticaOptions) -> Self {
        Self {
            options,
            client: Client::new(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (used by tests pointing at a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            "application/json"
                .parse()
                .expect("header value should parse correctly"),
        );
        if let Ok(key) = self.options.api_key.parse() {
            headers.insert("X-Authorization", key);
        }
        headers
    }

    /// Request that a new OTP be sent to `phone` over SMS.
    ///
    /// `phone` must already be in canonical international form (`+966...`).
    /// Every call sends a fresh message; the vendor invalidates any code it
    /// previously issued for the same number.
    pub async fn send_otp(&self, phone: &str) -> Result<SendOtpResponse, AuthenticaError> {
        let url = format!("{}/send-otp", self.base_url);

        let mut body = serde_json::json!({ "phone": phone, "method": "sms" });
        if let Some(sender) = &self.options.sender_name {
            body["sender_name"] = serde_json::Value::String(sender.clone());
        }

        let response = self
            .client
            .post(url)
            .headers(self.headers())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthenticaError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<SendOtpResponse>().await?)
    }

    /// Check a user-entered code against the pending OTP for `phone`.
    ///
    /// Returns `Ok(())` only when the vendor accepts the code. A mismatch or
    /// an expired code yields `AuthenticaError::Rejected`.
    pub async fn verify_otp(&self, phone: &str, otp: &str) -> Result<(), AuthenticaError> {
        let url = format!("{}/verifyOTP", self.base_url);

        let response = self
            .client
            .post(url)
            .headers(self.headers())
            .json(&serde_json::json!({ "phone": phone, "otp": otp }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The vendor answers 4xx for wrong/expired codes; 5xx is a fault
            // on its side and says nothing about the code.
            if status.is_client_error() {
                return Err(AuthenticaError::Rejected);
            }
            let body = response.text().await.unwrap_or_default();
            return Err(AuthenticaError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result = response.json::<VerifyOtpResponse>().await?;
        if result.accepted() {
            Ok(())
        } else {
            Err(AuthenticaError::Rejected)
        }
    }
}
