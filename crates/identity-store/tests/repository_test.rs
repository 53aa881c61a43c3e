//! Repository tests: table routing, scan wrappers, decode and fault
//! paths of the data access layer.

use std::sync::Arc;

use mockall::predicate::{always, eq};
use serde_json::json;
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::AppError;
use docstore::{Document, DocumentStore, MemoryStore, MockDocumentStore, StoreError};
use domain::{Claim, LoginInfo, UserRecord};
use identity_store::repository::entities::user::attr;
use identity_store::{DataAccess, StoreConfig};

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn create_test_user(name: &str) -> UserRecord {
    UserRecord::new(name).unwrap()
}

fn data_with_engine() -> (Arc<MemoryStore>, DataAccess) {
    let engine = Arc::new(MemoryStore::new());
    let data = DataAccess::new(engine.clone(), StoreConfig::default());
    (engine, data)
}

#[tokio::test]
async fn test_save_is_an_upsert() {
    let (_, data) = data_with_engine();
    let cancellation = CancellationToken::new();

    let mut user = create_test_user("Alice");
    assert_ok!(data.save_user(&user, &cancellation).await);

    user.email = Some("alice@example.com".to_string());
    assert_ok!(data.save_user(&user, &cancellation).await);

    let found = data
        .get_user_by_id(&user.id, &cancellation)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn test_get_user_by_attribute_scans_the_named_attribute() {
    let (_, data) = data_with_engine();
    let cancellation = CancellationToken::new();

    let mut user = create_test_user("Alice");
    user.normalized_email = Some("ALICE@EXAMPLE.COM".to_string());
    assert_ok!(data.save_user(&user, &cancellation).await);

    let found = data
        .get_user_by_attribute(attr::NORMALIZED_EMAIL, "ALICE@EXAMPLE.COM", &cancellation)
        .await
        .unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    let miss = data
        .get_user_by_attribute(attr::NORMALIZED_EMAIL, "BOB@EXAMPLE.COM", &cancellation)
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn test_get_users_by_role_scans_membership_lists() {
    let (_, data) = data_with_engine();
    let cancellation = CancellationToken::new();

    let mut alice = create_test_user("Alice");
    alice.add_to_role("ADMIN");
    assert_ok!(data.save_user(&alice, &cancellation).await);

    let mut bob = create_test_user("Bob");
    bob.add_to_role("ADMIN");
    bob.add_to_role("EDITOR");
    assert_ok!(data.save_user(&bob, &cancellation).await);

    let carol = create_test_user("Carol");
    assert_ok!(data.save_user(&carol, &cancellation).await);

    let members = data.get_users_by_role("ADMIN", &cancellation).await.unwrap();
    let mut ids: Vec<String> = members.into_iter().map(|u| u.id).collect();
    ids.sort();
    let mut expected = vec![alice.id, bob.id];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_login_lookup_matches_pair_at_any_index() {
    let (_, data) = data_with_engine();
    let cancellation = CancellationToken::new();

    let mut user = create_test_user("Alice");
    user.add_login(LoginInfo::new("github", "gh-1", "GitHub"));
    user.add_login(LoginInfo::new("google", "go-1", "Google"));
    assert_ok!(data.save_user(&user, &cancellation).await);

    let found = data
        .get_user_by_login("google", "go-1", &cancellation)
        .await
        .unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
}

#[tokio::test]
async fn test_claim_lookup_requires_the_exact_pair() {
    let (_, data) = data_with_engine();
    let cancellation = CancellationToken::new();

    let mut user = create_test_user("Alice");
    user.add_claim(Claim::new("color", "blue"));
    user.add_claim(Claim::new("shape", "round"));
    assert_ok!(data.save_user(&user, &cancellation).await);

    let exact = data
        .get_users_by_claim(&Claim::new("shape", "round"), &cancellation)
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);

    let crossed = data
        .get_users_by_claim(&Claim::new("shape", "blue"), &cancellation)
        .await
        .unwrap();
    assert!(crossed.is_empty());
}

#[tokio::test]
async fn test_mistyped_attribute_fails_to_decode() {
    init_tracing();
    let (engine, data) = data_with_engine();
    let cancellation = CancellationToken::new();

    let document: Document = json!({
        "id": "u-1",
        "user_name": "Alice",
        "normalized_user_name": "ALICE",
        "concurrency_stamp": "c-stamp",
        "security_stamp": "s-stamp",
        "email_confirmed": false,
        "phone_number_confirmed": false,
        "two_factor_enabled": false,
        "lockout_enabled": false,
        "access_failed_count": "not-a-number",
    })
    .as_object()
    .cloned()
    .unwrap();
    engine
        .put(&StoreConfig::default().users_table, "u-1", document)
        .await
        .unwrap();

    let result = data.get_user_by_id("u-1", &cancellation).await;
    assert!(matches!(result.unwrap_err(), AppError::Decode(_)));
}

#[tokio::test]
async fn test_storage_fault_propagates_from_delete() {
    init_tracing();
    let mut mock = MockDocumentStore::new();
    mock.expect_delete()
        .returning(|_, _| Err(StoreError::io("connection reset")));
    let data = DataAccess::new(Arc::new(mock), StoreConfig::default());

    let cancellation = CancellationToken::new();
    let user = create_test_user("Alice");
    let result = data.delete_user(&user, &cancellation).await;
    assert!(matches!(result.unwrap_err(), AppError::Storage(_)));
}

#[tokio::test]
async fn test_cancellation_is_checked_per_call() {
    let mock = MockDocumentStore::new();
    let data = DataAccess::new(Arc::new(mock), StoreConfig::default());

    let cancellation = CancellationToken::new();
    cancellation.cancel();

    let user = create_test_user("Alice");
    let result = data.save_user(&user, &cancellation).await;
    assert!(matches!(result.unwrap_err(), AppError::Cancelled));

    let result = data.get_role_by_name("ADMINS", &cancellation).await;
    assert!(matches!(result.unwrap_err(), AppError::Cancelled));
}

#[tokio::test]
async fn test_tables_come_from_config() {
    let mut mock = MockDocumentStore::new();
    mock.expect_put()
        .with(eq("identity_users"), always(), always())
        .returning(|_, _, _| Ok(()));
    let config = StoreConfig {
        users_table: "identity_users".to_string(),
        roles_table: "identity_roles".to_string(),
    };
    let data = DataAccess::new(Arc::new(mock), config);

    let cancellation = CancellationToken::new();
    let user = create_test_user("Alice");
    assert_ok!(data.save_user(&user, &cancellation).await);
}
