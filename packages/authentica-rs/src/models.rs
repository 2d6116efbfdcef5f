use serde::Deserialize;

/// Response body of `POST /send-otp`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendOtpResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body of `POST /verifyOTP`.
///
/// The API signals acceptance either with `success: true` or with a
/// `status: "approved"` field depending on the SDK version; accept both.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl VerifyOtpResponse {
    pub fn accepted(&self) -> bool {
        self.success == Some(true) || self.status.as_deref() == Some("approved")
    }
}
