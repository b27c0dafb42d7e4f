use super::*;
use crate::web::http::tests::ScriptedTransport;
use crate::web::storage::tests::MemoryStorage;
use producer_point_shared::EntityId;

const KEY: &str = "token";
const SIGN_IN_OK: &str =
    r#"{"token":"jwt-1","user":{"id":1,"name":"Ana","email":"ana@example.com"}}"#;
const ME_OK: &str = r#"{"id":1,"name":"Ana","email":"ana@example.com"}"#;

fn api(transport: &ScriptedTransport) -> ProducerPointApi<ScriptedTransport> {
    ProducerPointApi::new("http://api.test", transport.clone())
}

fn ana() -> User {
    User {
        id: EntityId::new("1"),
        name: "Ana".into(),
        email: "ana@example.com".into(),
    }
}

// =========================================================
// authenticate / resume / forget
// =========================================================

#[tokio::test]
async fn test_authenticate_persists_token() {
    let transport = ScriptedTransport::new().respond(200, SIGN_IN_OK);
    let store = MemoryStorage::new();

    let session = authenticate(&api(&transport), &store, KEY, " ana@example.com ", "pw")
        .await
        .unwrap();

    assert_eq!(session.token, "jwt-1");
    assert_eq!(session.user, ana());
    assert_eq!(store.get(KEY).as_deref(), Some("jwt-1"));
}

#[tokio::test]
async fn test_authenticate_rejects_blank_fields_without_request() {
    let transport = ScriptedTransport::new();
    let store = MemoryStorage::new();

    let err = authenticate(&api(&transport), &store, KEY, "  ", "")
        .await
        .unwrap_err();

    let AuthError::Invalid(fields) = err else {
        panic!("expected field errors, got {err:?}");
    };
    assert!(fields.get("email").is_some());
    assert!(fields.get("password").is_some());
    assert_eq!(transport.sent_count(), 0);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_bad_credentials_and_network_errors_look_the_same() {
    let transport = ScriptedTransport::new().respond(401, "").fail("offline");
    let store = MemoryStorage::new();
    let api = api(&transport);

    let denied = authenticate(&api, &store, KEY, "ana@example.com", "wrong")
        .await
        .unwrap_err();
    let offline = authenticate(&api, &store, KEY, "ana@example.com", "pw")
        .await
        .unwrap_err();

    assert_eq!(denied.user_message(), SIGN_IN_FAILED);
    assert_eq!(offline.user_message(), SIGN_IN_FAILED);
    assert_eq!(store.get(KEY), None);
}

#[tokio::test]
async fn test_resume_with_valid_token() {
    let transport = ScriptedTransport::new().respond(200, ME_OK);
    let store = MemoryStorage::new().with_item(KEY, "jwt-1");

    let session = resume(&api(&transport), &store, KEY).await.unwrap();
    assert_eq!(session.token, "jwt-1");
    assert_eq!(session.user, ana());
    assert_eq!(
        transport.last_sent().unwrap().header("Authorization"),
        Some("Bearer jwt-1")
    );
}

#[tokio::test]
async fn test_resume_discards_expired_token() {
    let transport = ScriptedTransport::new().respond(401, "");
    let store = MemoryStorage::new().with_item(KEY, "stale");

    assert_eq!(resume(&api(&transport), &store, KEY).await, None);
    assert_eq!(store.get(KEY), None);
}

#[tokio::test]
async fn test_resume_without_token_makes_no_request() {
    let transport = ScriptedTransport::new();
    let store = MemoryStorage::new();

    assert_eq!(resume(&api(&transport), &store, KEY).await, None);
    assert_eq!(transport.sent_count(), 0);
}

#[test]
fn test_forget_removes_token() {
    let store = MemoryStorage::new().with_item(KEY, "jwt-1");
    forget(&store, KEY);
    assert_eq!(store.get(KEY), None);
}

// =========================================================
// AuthState transitions
// =========================================================

fn restored_anonymous() -> AuthState {
    let mut state = AuthState::default();
    state.finish_restore(None);
    state
}

#[test]
fn test_state_starts_restoring() {
    let state = AuthState::default();
    assert_eq!(state.status(), AuthStatus::Restoring);
    assert_eq!(restored_anonymous().status(), AuthStatus::Anonymous);
}

#[tokio::test]
async fn test_successful_sign_in_creates_session_once_and_targets_home() {
    let transport = ScriptedTransport::new().respond(200, SIGN_IN_OK);
    let store = MemoryStorage::new();
    let mut state = restored_anonymous();

    assert!(state.begin_sign_in());
    assert!(state.is_loading);
    // Double submit while the first request is in flight is ignored
    assert!(!state.begin_sign_in());

    let result = authenticate(&api(&transport), &store, KEY, "ana@example.com", "pw").await;
    let target = state.finish_sign_in(result);

    assert_eq!(target, Some(AppRoute::Home));
    assert_eq!(state.status(), AuthStatus::Authenticated);
    assert_eq!(state.user(), Some(&ana()));
    assert!(!state.is_loading);
    assert_eq!(transport.sent_count(), 1);
}

#[tokio::test]
async fn test_failed_sign_in_leaves_session_absent_with_error() {
    let transport = ScriptedTransport::new().respond(403, "");
    let store = MemoryStorage::new();
    let mut state = restored_anonymous();

    assert!(state.begin_sign_in());
    let result = authenticate(&api(&transport), &store, KEY, "ana@example.com", "bad").await;
    let target = state.finish_sign_in(result);

    assert_eq!(target, None);
    assert_eq!(state.status(), AuthStatus::Anonymous);
    assert_eq!(state.error.as_deref(), Some(SIGN_IN_FAILED));
    assert!(!state.is_loading);

    // A new attempt clears the previous error
    assert!(state.begin_sign_in());
    assert_eq!(state.error, None);
}

#[test]
fn test_late_restore_does_not_override_fresh_sign_in() {
    let mut state = AuthState::default();
    state.finish_sign_in(Ok(Session {
        token: "fresh".into(),
        user: ana(),
    }));
    state.finish_restore(None);

    assert_eq!(state.session.as_ref().unwrap().token, "fresh");
    assert_eq!(state.status(), AuthStatus::Authenticated);
}

#[test]
fn test_late_restore_after_sign_out_is_discarded() {
    let mut state = AuthState::default();
    state.finish_sign_in(Ok(Session {
        token: "fresh".into(),
        user: ana(),
    }));
    state.clear();
    state.finish_restore(Some(Session {
        token: "old".into(),
        user: ana(),
    }));

    assert_eq!(state.status(), AuthStatus::Anonymous);
    assert_eq!(state.session, None);
}

#[test]
fn test_clear_signs_out() {
    let mut state = AuthState::default();
    state.finish_restore(Some(Session {
        token: "jwt-1".into(),
        user: ana(),
    }));
    assert_eq!(state.status(), AuthStatus::Authenticated);

    state.clear();
    assert_eq!(state.status(), AuthStatus::Anonymous);
    assert_eq!(state.user(), None);
}
