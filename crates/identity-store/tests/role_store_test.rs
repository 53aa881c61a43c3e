//! Role store end-to-end tests against the in-memory engine.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use common::AppError;
use docstore::{MemoryStore, MockDocumentStore};
use domain::{Claim, RoleRecord, UserRecord};
use identity_store::store::{RoleClaimStore, RoleStore, UserRoleStore, UserStore};
use identity_store::{DocumentRoleStore, DocumentUserStore, StoreConfig};

fn create_test_role(name: &str) -> RoleRecord {
    RoleRecord::new(name).unwrap()
}

fn store() -> DocumentRoleStore {
    DocumentRoleStore::new(Arc::new(MemoryStore::new()), StoreConfig::default())
}

#[tokio::test]
async fn test_create_then_find_by_id_round_trips_record() {
    let store = store();
    let cancellation = CancellationToken::new();

    let mut role = create_test_role("Admins");
    role.add_claim(Claim::new("scope", "users"));
    role.add_claim(Claim::new("scope", "roles"));
    store.create(&role, &cancellation).await.unwrap();

    let found = store.find_by_id(&role.id, &cancellation).await.unwrap();
    assert_eq!(found, Some(role));
}

#[tokio::test]
async fn test_find_by_name_matches_normalized_form_exactly() {
    let store = store();
    let cancellation = CancellationToken::new();

    let role = create_test_role("Admins");
    store.create(&role, &cancellation).await.unwrap();

    let found = store.find_by_name("ADMINS", &cancellation).await.unwrap();
    assert_eq!(found.map(|r| r.id), Some(role.id));

    let miss = store.find_by_name("admins", &cancellation).await.unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = store();
    let cancellation = CancellationToken::new();

    let role = create_test_role("Admins");
    store.create(&role, &cancellation).await.unwrap();

    store.delete(&role, &cancellation).await.unwrap();
    store.delete(&role, &cancellation).await.unwrap();

    let found = store.find_by_id(&role.id, &cancellation).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_rename_is_a_two_step_flow() {
    let store = store();
    let cancellation = CancellationToken::new();

    let mut role = create_test_role("Admins");
    store
        .set_role_name(&mut role, "Managers", &cancellation)
        .await
        .unwrap();

    // The normalized form does not move until it is set explicitly
    assert_eq!(
        store.role_name(&role, &cancellation).await.unwrap(),
        "Managers"
    );
    assert_eq!(
        store
            .normalized_role_name(&role, &cancellation)
            .await
            .unwrap(),
        "ADMINS"
    );

    store
        .set_normalized_role_name(&mut role, "MANAGERS", &cancellation)
        .await
        .unwrap();
    assert_eq!(
        store
            .normalized_role_name(&role, &cancellation)
            .await
            .unwrap(),
        "MANAGERS"
    );
}

#[tokio::test]
async fn test_empty_names_are_rejected() {
    let store = store();
    let cancellation = CancellationToken::new();

    let mut role = create_test_role("Admins");

    let result = store.set_role_name(&mut role, "", &cancellation).await;
    assert!(matches!(result.unwrap_err(), AppError::InvalidArgument(_)));

    let result = store
        .set_normalized_role_name(&mut role, "", &cancellation)
        .await;
    assert!(matches!(result.unwrap_err(), AppError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_claims_edit_and_persist() {
    let store = store();
    let cancellation = CancellationToken::new();

    let mut role = create_test_role("Admins");
    let claim = Claim::new("scope", "users");
    store
        .add_claim(&mut role, claim.clone(), &cancellation)
        .await
        .unwrap();
    store.create(&role, &cancellation).await.unwrap();

    let found = store
        .find_by_id(&role.id, &cancellation)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        store.claims(&found, &cancellation).await.unwrap(),
        vec![claim.clone()]
    );

    store
        .remove_claim(&mut role, &claim, &cancellation)
        .await
        .unwrap();
    store.update(&role, &cancellation).await.unwrap();

    let found = store
        .find_by_id(&role.id, &cancellation)
        .await
        .unwrap()
        .unwrap();
    assert!(found.claims.is_empty());
}

#[tokio::test]
async fn test_deleting_role_leaves_memberships_in_place() {
    let engine = Arc::new(MemoryStore::new());
    let roles = DocumentRoleStore::new(engine.clone(), StoreConfig::default());
    let users = DocumentUserStore::new(engine.clone(), StoreConfig::default());
    let cancellation = CancellationToken::new();

    let role = create_test_role("Admins");
    roles.create(&role, &cancellation).await.unwrap();

    let mut user = UserRecord::new("Alice").unwrap();
    users
        .add_to_role(&mut user, "ADMINS", &cancellation)
        .await
        .unwrap();
    users.create(&user, &cancellation).await.unwrap();

    roles.delete(&role, &cancellation).await.unwrap();

    // Membership is denormalized onto the user and survives the role
    assert!(roles
        .find_by_name("ADMINS", &cancellation)
        .await
        .unwrap()
        .is_none());
    let members = users.users_in_role("ADMINS", &cancellation).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, user.id);
}

#[tokio::test]
async fn test_cancelled_token_short_circuits_before_io() {
    let mock = MockDocumentStore::new();
    let store = DocumentRoleStore::new(Arc::new(mock), StoreConfig::default());

    let cancellation = CancellationToken::new();
    cancellation.cancel();

    let role = create_test_role("Admins");
    let result = store.create(&role, &cancellation).await;
    assert!(matches!(result.unwrap_err(), AppError::Cancelled));

    let result = store.find_by_name("ADMINS", &cancellation).await;
    assert!(matches!(result.unwrap_err(), AppError::Cancelled));
}
