// Shared test fixtures: mock collaborators that record calls and return
// programmable results.
//
// Not every test binary uses every helper.
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use souq_core::common::types::{AccountInfo, Document};
use souq_core::kernel::{
    BaseAccountStore, BaseAuthService, BaseObjectStore, BaseOtpVendor, ClientDeps,
};

// =============================================================================
// Mock Account Store
// =============================================================================

pub struct MockAccountStore {
    documents: Mutex<Vec<Document>>,
    pub lookup_calls: Mutex<Vec<(String, String)>>,
    pub create_calls: Mutex<Vec<(String, Value)>>,
    pub update_calls: Mutex<Vec<(String, Value)>>,
    fail_lookups: Mutex<bool>,
}

impl MockAccountStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            lookup_calls: Mutex::new(Vec::new()),
            create_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            fail_lookups: Mutex::new(false),
        }
    }

    /// Seed a user document with the given indexed fields.
    pub fn with_document(self, id: &str, data: Value) -> Self {
        self.documents.lock().unwrap().push(Document {
            id: id.to_string(),
            created_at: None,
            data,
        });
        self
    }

    pub fn fail_lookups(&self) {
        *self.fail_lookups.lock().unwrap() = true;
    }

    pub fn lookup_count(&self) -> usize {
        self.lookup_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseAccountStore for MockAccountStore {
    async fn lookup(&self, field: &str, value: &str) -> Result<Option<Document>> {
        self.lookup_calls
            .lock()
            .unwrap()
            .push((field.to_string(), value.to_string()));
        if *self.fail_lookups.lock().unwrap() {
            anyhow::bail!("simulated store outage");
        }
        let docs = self.documents.lock().unwrap();
        Ok(docs
            .iter()
            .find(|d| {
                if field == "$id" {
                    d.id == value
                } else {
                    d.data.get(field).and_then(|v| v.as_str()) == Some(value)
                }
            })
            .cloned())
    }

    async fn create(&self, id: &str, data: Value) -> Result<Document> {
        self.create_calls
            .lock()
            .unwrap()
            .push((id.to_string(), data.clone()));
        let doc = Document {
            id: id.to_string(),
            created_at: None,
            data,
        };
        self.documents.lock().unwrap().push(doc.clone());
        Ok(doc)
    }

    async fn update(&self, id: &str, data: Value) -> Result<Document> {
        self.update_calls
            .lock()
            .unwrap()
            .push((id.to_string(), data.clone()));
        Ok(Document {
            id: id.to_string(),
            created_at: None,
            data,
        })
    }
}

// =============================================================================
// Mock Auth Service
// =============================================================================

pub struct MockAuthService {
    pub create_account_calls: Mutex<Vec<(String, String, String)>>,
    pub start_session_calls: Mutex<Vec<String>>,
    pub email_code_calls: Mutex<Vec<String>>,
    pub phone_code_calls: Mutex<Vec<String>>,
    pub redeem_calls: Mutex<Vec<(String, String)>>,
    pub change_password_calls: Mutex<Vec<(String, Option<String>)>>,
    pub rebind_phone_calls: Mutex<Vec<(String, String)>>,
    /// Code accepted by `redeem_session`; anything else is rejected.
    accepted_code: Mutex<Option<String>>,
    fail_phone_dispatch: Mutex<bool>,
}

impl MockAuthService {
    pub fn new() -> Self {
        Self {
            create_account_calls: Mutex::new(Vec::new()),
            start_session_calls: Mutex::new(Vec::new()),
            email_code_calls: Mutex::new(Vec::new()),
            phone_code_calls: Mutex::new(Vec::new()),
            redeem_calls: Mutex::new(Vec::new()),
            change_password_calls: Mutex::new(Vec::new()),
            rebind_phone_calls: Mutex::new(Vec::new()),
            accepted_code: Mutex::new(None),
            fail_phone_dispatch: Mutex::new(false),
        }
    }

    pub fn accept_code(&self, code: &str) {
        *self.accepted_code.lock().unwrap() = Some(code.to_string());
    }

    pub fn fail_phone_dispatch(&self) {
        *self.fail_phone_dispatch.lock().unwrap() = true;
    }
}

#[async_trait]
impl BaseAuthService for MockAuthService {
    async fn create_account(&self, email: &str, password: &str, name: &str) -> Result<String> {
        self.create_account_calls.lock().unwrap().push((
            email.to_string(),
            password.to_string(),
            name.to_string(),
        ));
        Ok("acct-1".to_string())
    }

    async fn start_session(&self, email: &str, _password: &str) -> Result<()> {
        self.start_session_calls
            .lock()
            .unwrap()
            .push(email.to_string());
        Ok(())
    }

    async fn send_email_code(&self, email: &str) -> Result<()> {
        self.email_code_calls.lock().unwrap().push(email.to_string());
        Ok(())
    }

    async fn send_phone_code(&self, phone: &str) -> Result<String> {
        if *self.fail_phone_dispatch.lock().unwrap() {
            anyhow::bail!("simulated token dispatch failure");
        }
        self.phone_code_calls.lock().unwrap().push(phone.to_string());
        Ok("handle-1".to_string())
    }

    async fn redeem_session(&self, user_id: &str, code: &str) -> Result<()> {
        self.redeem_calls
            .lock()
            .unwrap()
            .push((user_id.to_string(), code.to_string()));
        if self.accepted_code.lock().unwrap().as_deref() == Some(code) {
            Ok(())
        } else {
            anyhow::bail!("code rejected")
        }
    }

    async fn change_password(&self, new: &str, old: Option<&str>) -> Result<()> {
        self.change_password_calls
            .lock()
            .unwrap()
            .push((new.to_string(), old.map(|s| s.to_string())));
        Ok(())
    }

    async fn rebind_phone(&self, phone: &str, password: &str) -> Result<()> {
        self.rebind_phone_calls
            .lock()
            .unwrap()
            .push((phone.to_string(), password.to_string()));
        Ok(())
    }

    async fn current_account(&self) -> Result<Option<AccountInfo>> {
        Ok(None)
    }

    async fn end_session(&self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Mock OTP Vendor
// =============================================================================

pub struct MockOtpVendor {
    pub send_calls: Mutex<Vec<String>>,
    pub verify_calls: Mutex<Vec<(String, String)>>,
    accepted_code: Mutex<Option<String>>,
    fail_dispatch: Mutex<bool>,
    fail_verify: Mutex<bool>,
}

impl MockOtpVendor {
    pub fn new() -> Self {
        Self {
            send_calls: Mutex::new(Vec::new()),
            verify_calls: Mutex::new(Vec::new()),
            accepted_code: Mutex::new(None),
            fail_dispatch: Mutex::new(false),
            fail_verify: Mutex::new(false),
        }
    }

    pub fn accept_code(&self, code: &str) {
        *self.accepted_code.lock().unwrap() = Some(code.to_string());
    }

    pub fn fail_dispatch(&self) {
        *self.fail_dispatch.lock().unwrap() = true;
    }

    /// Make `verify_otp` fail as a transport fault (not a rejection).
    pub fn fail_verify(&self) {
        *self.fail_verify.lock().unwrap() = true;
    }

    pub fn restore_verify(&self) {
        *self.fail_verify.lock().unwrap() = false;
    }

    pub fn send_count(&self) -> usize {
        self.send_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseOtpVendor for MockOtpVendor {
    async fn send_otp(&self, phone: &str) -> Result<()> {
        if *self.fail_dispatch.lock().unwrap() {
            anyhow::bail!("simulated vendor outage");
        }
        self.send_calls.lock().unwrap().push(phone.to_string());
        Ok(())
    }

    async fn verify_otp(&self, phone: &str, code: &str) -> Result<bool> {
        if *self.fail_verify.lock().unwrap() {
            anyhow::bail!("simulated vendor outage");
        }
        self.verify_calls
            .lock()
            .unwrap()
            .push((phone.to_string(), code.to_string()));
        Ok(self.accepted_code.lock().unwrap().as_deref() == Some(code))
    }
}

// =============================================================================
// Mock Object Store
// =============================================================================

pub struct MockObjectStore {
    pub put_calls: Mutex<Vec<String>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            put_calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BaseObjectStore for MockObjectStore {
    async fn put_file(&self, _bytes: Vec<u8>, file_name: &str, _mime: &str) -> Result<String> {
        self.put_calls.lock().unwrap().push(file_name.to_string());
        Ok("file-1".to_string())
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("https://storage.test/{}", file_id)
    }

    fn initials_avatar_url(&self, name: &str) -> String {
        format!("https://avatars.test/{}", name)
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct TestDeps {
    pub deps: Arc<ClientDeps>,
    pub store: Arc<MockAccountStore>,
    pub auth: Arc<MockAuthService>,
    pub vendor: Arc<MockOtpVendor>,
    pub objects: Arc<MockObjectStore>,
}

pub fn test_deps_with_store(store: MockAccountStore) -> TestDeps {
    // Respect RUST_LOG when tests run with --nocapture; try_init() keeps
    // repeated harness construction from panicking.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let store = Arc::new(store);
    let auth = Arc::new(MockAuthService::new());
    let vendor = Arc::new(MockOtpVendor::new());
    let objects = Arc::new(MockObjectStore::new());

    let deps = Arc::new(ClientDeps::new(
        store.clone(),
        auth.clone(),
        vendor.clone(),
        objects.clone(),
        "+966".to_string(),
    ));

    TestDeps {
        deps,
        store,
        auth,
        vendor,
        objects,
    }
}

pub fn test_deps() -> TestDeps {
    test_deps_with_store(MockAccountStore::new())
}
