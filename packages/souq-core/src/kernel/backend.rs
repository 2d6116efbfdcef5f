//! Backend-as-a-service REST client.
//!
//! One reqwest client covering the three backend surfaces the app uses:
//! the document database (users collection), the account/session API, and
//! object storage. Implements the Base* collaborator traits so domain code
//! never sees HTTP.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Mutex;
use tracing::{debug, error};

use crate::common::types::{AccountInfo, Document};
use crate::config::Config;
use crate::kernel::{BaseAccountStore, BaseAuthService, BaseObjectStore};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Error body shape returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(rename = "$id")]
    id: String,
    #[serde(default)]
    secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "userId")]
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct FileResponse {
    #[serde(rename = "$id")]
    id: String,
}

pub struct BackendClient {
    client: Client,
    endpoint: String,
    project_id: String,
    database_id: String,
    users_collection_id: String,
    bucket_id: String,
    /// Session secret captured from the last session-producing call.
    session: Mutex<Option<String>>,
}

impl BackendClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.backend_endpoint.trim_end_matches('/').to_string(),
            project_id: config.backend_project_id.clone(),
            database_id: config.database_id.clone(),
            users_collection_id: config.users_collection_id.clone(),
            bucket_id: config.storage_bucket_id.clone(),
            session: Mutex::new(None),
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.users_collection_id
        )
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id)
            .header(header::ACCEPT, "application/json");
        if let Some(secret) = self.session.lock().expect("session lock poisoned").as_deref() {
            req = req.header("X-Appwrite-Session", secret);
        }
        req
    }

    fn remember_session(&self, session: &SessionResponse) {
        let secret = session.secret.clone().unwrap_or_else(|| session.id.clone());
        *self.session.lock().expect("session lock poisoned") = Some(secret);
    }

    fn forget_session(&self) {
        *self.session.lock().expect("session lock poisoned") = None;
    }

    /// Send a request and decode the JSON body, mapping non-2xx responses to
    /// `BackendError::Api` with the backend's own message.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|b| b.message)
                .unwrap_or_default();
            error!(status = status.as_u16(), %message, "backend call failed");
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    /// Like `execute`, for endpoints whose response body we discard (some
    /// answer 204 with no body at all).
    async fn execute_unit(&self, req: RequestBuilder) -> Result<(), BackendError> {
        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|b| b.message)
                .unwrap_or_default();
            error!(status = status.as_u16(), %message, "backend call failed");
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Account store (document database)
// =============================================================================

#[async_trait]
impl BaseAccountStore for BackendClient {
    async fn lookup(&self, field: &str, value: &str) -> Result<Option<Document>> {
        let query = format!(r#"equal("{}", ["{}"])"#, field, value);
        debug!(%field, "document lookup");
        let list: DocumentList = self
            .execute(
                self.request(Method::GET, self.documents_url())
                    .query(&[("queries[]", query.as_str())]),
            )
            .await?;
        Ok(list.documents.into_iter().next())
    }

    async fn create(&self, id: &str, data: Value) -> Result<Document> {
        let doc: Document = self
            .execute(
                self.request(Method::POST, self.documents_url())
                    .json(&json!({ "documentId": id, "data": data })),
            )
            .await?;
        Ok(doc)
    }

    async fn update(&self, id: &str, data: Value) -> Result<Document> {
        let url = format!("{}/{}", self.documents_url(), id);
        let doc: Document = self
            .execute(
                self.request(Method::PATCH, url)
                    .json(&json!({ "data": data })),
            )
            .await?;
        Ok(doc)
    }
}

// =============================================================================
// Auth service (account/session API)
// =============================================================================

#[async_trait]
impl BaseAuthService for BackendClient {
    async fn create_account(&self, email: &str, password: &str, name: &str) -> Result<String> {
        let url = format!("{}/account", self.endpoint);
        let account: AccountInfo = self
            .execute(self.request(Method::POST, url).json(&json!({
                "userId": "unique()",
                "email": email,
                "password": password,
                "name": name,
            })))
            .await?;
        Ok(account.id)
    }

    async fn start_session(&self, email: &str, password: &str) -> Result<()> {
        let url = format!("{}/account/sessions/email", self.endpoint);
        let session: SessionResponse = self
            .execute(
                self.request(Method::POST, url)
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;
        self.remember_session(&session);
        Ok(())
    }

    async fn send_email_code(&self, email: &str) -> Result<()> {
        let url = format!("{}/account/tokens/email", self.endpoint);
        let _: TokenResponse = self
            .execute(
                self.request(Method::POST, url)
                    .json(&json!({ "userId": "unique()", "email": email })),
            )
            .await?;
        Ok(())
    }

    async fn send_phone_code(&self, phone: &str) -> Result<String> {
        let url = format!("{}/account/tokens/phone", self.endpoint);
        let token: TokenResponse = self
            .execute(
                self.request(Method::POST, url)
                    .json(&json!({ "userId": "unique()", "phone": phone })),
            )
            .await?;
        Ok(token.user_id)
    }

    async fn redeem_session(&self, user_id: &str, code: &str) -> Result<()> {
        let url = format!("{}/account/sessions/token", self.endpoint);
        let session: SessionResponse = self
            .execute(
                self.request(Method::POST, url)
                    .json(&json!({ "userId": user_id, "secret": code })),
            )
            .await?;
        self.remember_session(&session);
        Ok(())
    }

    async fn change_password(&self, new: &str, old: Option<&str>) -> Result<()> {
        let url = format!("{}/account/password", self.endpoint);
        let mut body = json!({ "password": new });
        if let Some(old) = old {
            body["oldPassword"] = Value::String(old.to_string());
        }
        self.execute_unit(self.request(Method::PATCH, url).json(&body))
            .await?;
        Ok(())
    }

    async fn rebind_phone(&self, phone: &str, password: &str) -> Result<()> {
        let url = format!("{}/account/phone", self.endpoint);
        self.execute_unit(
            self.request(Method::PATCH, url)
                .json(&json!({ "phone": phone, "password": password })),
        )
        .await?;
        Ok(())
    }

    async fn current_account(&self) -> Result<Option<AccountInfo>> {
        let url = format!("{}/account", self.endpoint);
        match self.execute::<AccountInfo>(self.request(Method::GET, url)).await {
            Ok(account) => Ok(Some(account)),
            Err(BackendError::Api { status, .. })
                if status == StatusCode::UNAUTHORIZED.as_u16() =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn end_session(&self) -> Result<()> {
        let url = format!("{}/account/sessions/current", self.endpoint);
        self.execute_unit(self.request(Method::DELETE, url)).await?;
        self.forget_session();
        Ok(())
    }
}

// =============================================================================
// Object storage
// =============================================================================

#[async_trait]
impl BaseObjectStore for BackendClient {
    async fn put_file(&self, bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<String> {
        let url = format!("{}/storage/buckets/{}/files", self.endpoint, self.bucket_id);
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new()
            .text("fileId", "unique()")
            .part("file", part);
        let file: FileResponse = self
            .execute(self.request(Method::POST, url).multipart(form))
            .await?;
        Ok(file.id)
    }

    fn file_url(&self, file_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/view?project={}",
            self.endpoint, self.bucket_id, file_id, self.project_id
        )
    }

    fn initials_avatar_url(&self, name: &str) -> String {
        format!(
            "{}/avatars/initials?name={}&project={}",
            self.endpoint,
            urlencoding::encode(name),
            self.project_id
        )
    }
}
