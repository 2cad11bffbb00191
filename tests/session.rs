mod common;

use cinelist::api::{ApiClient, Transport};
use cinelist::domain::{Credentials, Registration, Role, Session, ValidationError};
use cinelist::session::{self, RegisterOutcome, SessionStore};
use cinelist::storage::{JsonKeyValueStore, KeyValueStore, MemoryStore, TOKEN_KEY};
use cinelist::CinelistError;
use common::{ana, client, logged_in, FakeBackend, Fault, PASSWORD, TOKEN};
use std::sync::Arc;

fn persistent_client(backend: &Arc<FakeBackend>, store: impl KeyValueStore + 'static) -> ApiClient {
    let transport: Arc<dyn Transport> = Arc::clone(backend) as Arc<dyn Transport>;
    ApiClient::new(transport, SessionStore::persistent(store))
}

fn store_with_token(token: &str) -> MemoryStore {
    let mut store = MemoryStore::default();
    store.set_item(TOKEN_KEY, token).unwrap();
    store
}

#[tokio::test]
async fn login_populates_and_persists_session() {
    let backend = FakeBackend::new();
    let api = persistent_client(&backend, MemoryStore::default());

    let user = session::login(&api, &Credentials::new("ana@mail.com", PASSWORD)).await.unwrap();
    assert_eq!(user, ana());
    assert_eq!(api.session().token().as_deref(), Some(TOKEN));
    assert_eq!(api.session().persisted_token().as_deref(), Some(TOKEN));

    let login = &backend.calls()[0];
    assert!(login.bearer.is_none());
    assert_eq!(login.body.as_ref().unwrap()["email"], "ana@mail.com");
}

#[tokio::test]
async fn bad_credentials_are_rejected_not_expired() {
    let backend = FakeBackend::new();
    let api = client(&backend);

    let err = session::login(&api, &Credentials::new("ana", "wrong-password"))
        .await
        .unwrap_err();
    assert!(matches!(err, CinelistError::Rejected { status: 401, ref message } if message == "Invalid credentials"));
    assert!(!api.session().is_authenticated());
}

#[tokio::test]
async fn blank_credentials_never_reach_the_server() {
    let backend = FakeBackend::new();
    let api = client(&backend);

    let err = session::login(&api, &Credentials::new("  ", PASSWORD)).await.unwrap_err();
    assert!(matches!(err, CinelistError::Validation(ValidationError::MissingCredentials)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn logout_wipes_memory_and_storage() {
    let backend = FakeBackend::new();
    let api = persistent_client(&backend, MemoryStore::default());
    session::login(&api, &Credentials::new("ana", PASSWORD)).await.unwrap();

    session::logout(api.session());
    assert!(api.session().get().is_none());
    assert!(api.session().persisted_token().is_none());

    session::logout(api.session());
    assert!(api.session().get().is_none());
}

#[tokio::test]
async fn restore_reads_profile_with_persisted_token() {
    let backend = FakeBackend::new();
    let api = persistent_client(&backend, store_with_token(TOKEN));

    let user = session::restore(&api).await.unwrap();
    assert_eq!(user, Some(ana()));
    assert_eq!(api.session().user(), Some(ana()));
    assert_eq!(backend.call_keys(), vec!["GET /users/profile"]);
    assert_eq!(backend.calls()[0].bearer.as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn restore_without_token_makes_no_call() {
    let backend = FakeBackend::new();
    let api = persistent_client(&backend, MemoryStore::default());

    assert_eq!(session::restore(&api).await.unwrap(), None);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn restore_with_revoked_token_wipes_it() {
    let backend = FakeBackend::new();
    let api = persistent_client(&backend, store_with_token("tok-revoked"));

    assert_eq!(session::restore(&api).await.unwrap(), None);
    assert!(api.session().persisted_token().is_none());
}

#[tokio::test]
async fn restore_keeps_token_on_network_failure() {
    let backend = FakeBackend::new();
    backend.fail("GET /users/profile", Fault::Network);
    let api = persistent_client(&backend, store_with_token(TOKEN));

    let err = session::restore(&api).await.unwrap_err();
    assert!(matches!(err, CinelistError::Transport(_)));
    assert_eq!(api.session().persisted_token().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn session_survives_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let backend = FakeBackend::new();

    let first = persistent_client(&backend, JsonKeyValueStore::open(path.clone()).unwrap());
    session::login(&first, &Credentials::new("ana", PASSWORD)).await.unwrap();
    drop(first);

    let second = persistent_client(&backend, JsonKeyValueStore::open(path).unwrap());
    assert_eq!(session::restore(&second).await.unwrap(), Some(ana()));
}

#[tokio::test]
async fn any_authentication_failure_clears_the_session() {
    let backend = FakeBackend::new();
    let api = logged_in(&backend);

    backend.expire_tokens();
    assert!(api.watchlist().await.unwrap_err().is_auth_expired());
    assert!(api.session().get().is_none());

    backend.clear_calls();
    assert!(api.seenlist().await.unwrap_err().is_auth_expired());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn token_is_read_at_call_time() {
    let backend = FakeBackend::new();
    let api = client(&backend);
    let observer = api.clone();

    api.session().set(Session::new(TOKEN.to_string(), ana()));
    observer.profile().await.unwrap();
    assert_eq!(backend.calls()[0].bearer.as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn registration_without_token_asks_for_login() {
    let backend = FakeBackend::new();
    let api = client(&backend);
    let form = Registration {
        username: "bo".into(),
        email: "bo@mail.com".into(),
        password: "hunter22".into(),
        role: Role::Critic,
    };

    assert_eq!(
        session::register(&api, &form).await.unwrap(),
        RegisterOutcome::LoginRequired
    );
    assert!(!api.session().is_authenticated());

    let user = session::login(&api, &Credentials::new("bo@mail.com", "hunter22")).await.unwrap();
    assert_eq!(user.role, Role::Critic);
}

#[tokio::test]
async fn registration_with_token_logs_in() {
    let backend = FakeBackend::new();
    backend.issue_token_on_register();
    let api = client(&backend);
    let form = Registration {
        username: "bo".into(),
        email: "bo@mail.com".into(),
        password: "hunter22".into(),
        role: Role::User,
    };

    match session::register(&api, &form).await.unwrap() {
        RegisterOutcome::LoggedIn(user) => assert_eq!(user.username, "bo"),
        other => panic!("expected login, got {other:?}"),
    }
    assert_eq!(
        backend.call_keys(),
        vec!["POST /users/register", "GET /users/profile"]
    );
}

#[tokio::test]
async fn invalid_registration_makes_no_call() {
    let backend = FakeBackend::new();
    let api = client(&backend);
    let form = Registration {
        username: "bo".into(),
        email: "not-an-email".into(),
        password: "hunter22".into(),
        role: Role::User,
    };

    let err = session::register(&api, &form).await.unwrap_err();
    assert!(matches!(err, CinelistError::Validation(ValidationError::InvalidEmail)));
    assert!(backend.calls().is_empty());
}
