//! Client dependencies for workflows (using traits for testability)
//!
//! This module provides the central dependency container handed to all domain
//! workflows. All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use authentica::{AuthenticaError, AuthenticaService};
use std::sync::Arc;

use crate::config::Config;
use crate::kernel::backend::BackendClient;
use crate::kernel::{BaseAccountStore, BaseAuthService, BaseObjectStore, BaseOtpVendor};

// =============================================================================
// AuthenticaService Adapter (implements BaseOtpVendor trait)
// =============================================================================

/// Wrapper around AuthenticaService that implements the BaseOtpVendor trait
pub struct AuthenticaAdapter(pub Arc<AuthenticaService>);

impl AuthenticaAdapter {
    pub fn new(service: Arc<AuthenticaService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseOtpVendor for AuthenticaAdapter {
    async fn send_otp(&self, phone: &str) -> Result<()> {
        self.0
            .send_otp(phone)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn verify_otp(&self, phone: &str, code: &str) -> Result<bool> {
        // A rejected code is a normal outcome that spends an attempt; vendor
        // outages and transport faults must not.
        match self.0.verify_otp(phone, code).await {
            Ok(()) => Ok(true),
            Err(AuthenticaError::Rejected) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// ClientDeps
// =============================================================================

/// Client dependencies accessible to workflows (using traits for testability)
#[derive(Clone)]
pub struct ClientDeps {
    pub store: Arc<dyn BaseAccountStore>,
    pub auth: Arc<dyn BaseAuthService>,
    pub otp_vendor: Arc<dyn BaseOtpVendor>,
    pub objects: Arc<dyn BaseObjectStore>,
    /// Dialing prefix applied by identifier normalization.
    pub country_code: String,
}

impl ClientDeps {
    pub fn new(
        store: Arc<dyn BaseAccountStore>,
        auth: Arc<dyn BaseAuthService>,
        otp_vendor: Arc<dyn BaseOtpVendor>,
        objects: Arc<dyn BaseObjectStore>,
        country_code: String,
    ) -> Self {
        Self {
            store,
            auth,
            otp_vendor,
            objects,
            country_code,
        }
    }

    /// Wire up production dependencies from configuration.
    pub fn from_config(config: &Config) -> Self {
        let backend = Arc::new(BackendClient::new(config));
        let vendor = Arc::new(AuthenticaService::new(authentica::AuthenticaOptions {
            api_key: config.authentica_api_key.clone(),
            sender_name: config.authentica_sender_name.clone(),
        }));

        Self {
            store: backend.clone(),
            auth: backend.clone(),
            otp_vendor: Arc::new(AuthenticaAdapter::new(vendor)),
            objects: backend,
            country_code: config.country_code.clone(),
        }
    }
}
