//! Recovery and phone-update workflow tests: existence gating, backend
//! channels, lockout, and the terminal password reset.

mod common;

use common::{test_deps, test_deps_with_store, MockAccountStore};
use serde_json::json;
use souq_core::domains::auth::{
    AuthError, AuthFlow, FlowState, IdentifierKind, RecoveryDraft, MAX_FAILED_ATTEMPTS,
};

fn email_draft() -> RecoveryDraft {
    RecoveryDraft {
        value: "a@x.com".to_string(),
        kind: IdentifierKind::Email,
    }
}

fn phone_draft() -> RecoveryDraft {
    RecoveryDraft {
        value: "512345678".to_string(),
        kind: IdentifierKind::Phone,
    }
}

fn seeded_store() -> MockAccountStore {
    MockAccountStore::new().with_document(
        "user-9",
        json!({ "email": "a@x.com", "phone": "+966512345678" }),
    )
}

#[tokio::test]
async fn unknown_identifier_blocks_recovery_before_dispatch() {
    let t = test_deps();
    let mut flow = AuthFlow::recovery(t.deps.clone());
    flow.open();

    let err = flow.submit_identifier(email_draft()).await.unwrap_err();
    assert!(matches!(err, AuthError::NotFound));
    assert_eq!(flow.state(), FlowState::AwaitingIdentifier);
    assert!(t.auth.email_code_calls.lock().unwrap().is_empty());
    assert!(t.auth.phone_code_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn email_recovery_wrong_code_then_resend_still_available() {
    let t = test_deps_with_store(seeded_store());
    t.auth.accept_code("123456");

    let mut flow = AuthFlow::recovery(t.deps.clone());
    flow.open();
    flow.submit_identifier(email_draft()).await.unwrap();
    assert_eq!(
        *t.auth.email_code_calls.lock().unwrap(),
        vec!["a@x.com".to_string()]
    );

    // Mismatched 6-digit code: back to AwaitingCode, resend still unused.
    let err = flow.submit_code("000000").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidOrExpiredCode));
    assert_eq!(flow.state(), FlowState::AwaitingCode);

    flow.resend().await.unwrap();
    assert_eq!(t.auth.email_code_calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn email_recovery_end_to_end() {
    let t = test_deps_with_store(seeded_store());
    t.auth.accept_code("123456");

    let mut flow = AuthFlow::recovery(t.deps.clone());
    flow.open();
    flow.submit_identifier(email_draft()).await.unwrap();
    flow.submit_code("123456").await.unwrap();
    assert_eq!(flow.state(), FlowState::Verified);

    // The email channel has no handle; the account id is re-derived from
    // the identifier before redemption.
    let redeems = t.auth.redeem_calls.lock().unwrap();
    assert_eq!(
        *redeems,
        vec![("user-9".to_string(), "123456".to_string())]
    );
    drop(redeems);

    flow.complete_recovery("newsecret").await.unwrap();
    assert_eq!(flow.state(), FlowState::Done);

    let changes = t.auth.change_password_calls.lock().unwrap();
    assert_eq!(*changes, vec![("newsecret".to_string(), None)]);
}

#[tokio::test]
async fn phone_recovery_uses_backend_token_and_handle() {
    let t = test_deps_with_store(seeded_store());
    t.auth.accept_code("654321");

    let mut flow = AuthFlow::recovery(t.deps.clone());
    flow.open();
    flow.submit_identifier(phone_draft()).await.unwrap();
    assert_eq!(
        *t.auth.phone_code_calls.lock().unwrap(),
        vec!["+966512345678".to_string()]
    );

    // 6-digit gate for the backend channel.
    let err = flow.submit_code("6543").await.unwrap_err();
    assert!(matches!(err, AuthError::IncompleteCode { expected: 6 }));

    flow.submit_code("654321").await.unwrap();
    assert_eq!(flow.state(), FlowState::Verified);

    // Redemption used the dispatcher's correlation handle.
    let redeems = t.auth.redeem_calls.lock().unwrap();
    assert_eq!(
        *redeems,
        vec![("handle-1".to_string(), "654321".to_string())]
    );
}

#[tokio::test]
async fn session_locks_after_too_many_failures() {
    let t = test_deps_with_store(seeded_store());
    t.auth.accept_code("123456");

    let mut flow = AuthFlow::recovery(t.deps.clone());
    flow.open();
    flow.submit_identifier(email_draft()).await.unwrap();

    for _ in 0..(MAX_FAILED_ATTEMPTS - 1) {
        let err = flow.submit_code("000000").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidOrExpiredCode));
        assert_eq!(flow.state(), FlowState::AwaitingCode);
    }

    let err = flow.submit_code("000000").await.unwrap_err();
    assert!(matches!(err, AuthError::TooManyAttempts));
    assert_eq!(flow.state(), FlowState::Failed);

    // Locked flow ignores further codes, even the correct one.
    flow.submit_code("123456").await.unwrap();
    assert_eq!(flow.state(), FlowState::Failed);

    // Only a restart returns the flow to the beginning.
    flow.restart();
    flow.open();
    assert_eq!(flow.state(), FlowState::AwaitingIdentifier);
}

#[tokio::test]
async fn recovery_reset_runs_at_most_once() {
    let t = test_deps_with_store(seeded_store());
    t.auth.accept_code("123456");

    let mut flow = AuthFlow::recovery(t.deps.clone());
    flow.open();
    flow.submit_identifier(email_draft()).await.unwrap();
    flow.submit_code("123456").await.unwrap();

    flow.complete_recovery("newsecret").await.unwrap();
    flow.complete_recovery("newsecret").await.unwrap();
    flow.complete_recovery("other").await.unwrap();

    assert_eq!(t.auth.change_password_calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn backend_dispatch_failure_is_recoverable() {
    let t = test_deps_with_store(seeded_store());
    t.auth.fail_phone_dispatch();

    let mut flow = AuthFlow::recovery(t.deps.clone());
    flow.open();

    let err = flow.submit_identifier(phone_draft()).await.unwrap_err();
    assert!(matches!(err, AuthError::DispatchFailed(_)));
    assert_eq!(flow.state(), FlowState::AwaitingIdentifier);
}

#[tokio::test]
async fn phone_update_requires_free_number_and_rebinds() {
    let t = test_deps();
    t.vendor.accept_code("4321");

    let mut flow = AuthFlow::phone_update(t.deps.clone(), "secret1".to_string());
    flow.open();
    flow.submit_identifier(phone_draft()).await.unwrap();

    // Vendor channel: 4-digit code.
    flow.submit_code("4321").await.unwrap();
    assert_eq!(flow.state(), FlowState::Done);

    let rebinds = t.auth.rebind_phone_calls.lock().unwrap();
    assert_eq!(
        *rebinds,
        vec![("+966512345678".to_string(), "secret1".to_string())]
    );
}

#[tokio::test]
async fn phone_update_rejects_taken_number() {
    let t = test_deps_with_store(seeded_store());

    let mut flow = AuthFlow::phone_update(t.deps.clone(), "secret1".to_string());
    flow.open();

    let err = flow.submit_identifier(phone_draft()).await.unwrap_err();
    assert!(matches!(err, AuthError::AlreadyExists));
    assert_eq!(t.vendor.send_count(), 0);
}
