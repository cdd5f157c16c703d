//! Integration tests for the admin client and the user directory store.

use std::sync::atomic::Ordering;

use pet_haven_admin::api::AdminClient;
use pet_haven_admin::config::BackendConfig;
use pet_haven_admin::store::UserDirectory;
use pet_haven_core::UserId;
use pet_haven_integration_tests::{FailureModes, STUB_TOKEN, StubBackend};

fn client_for(stub: &StubBackend) -> AdminClient {
    AdminClient::new(&BackendConfig {
        base_url: stub.base_url(),
    })
}

async fn loaded_directory(api: &AdminClient) -> UserDirectory {
    let directory = UserDirectory::new();
    directory
        .refresh(api, STUB_TOKEN, false)
        .await
        .expect("directory refresh");
    directory
}

#[tokio::test]
async fn directory_search_filters_name_and_email() {
    let stub = StubBackend::spawn(FailureModes::default()).await;
    let api = client_for(&stub);
    let directory = loaded_directory(&api).await;

    assert_eq!(directory.len().await, 3);

    let hits = directory.search("priya").await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Priya Shah");

    // empty query is the whole directory
    assert_eq!(directory.search("").await.len(), 3);
}

#[tokio::test]
async fn ban_flips_exactly_one_user() {
    let stub = StubBackend::spawn(FailureModes::default()).await;
    let api = client_for(&stub);
    let directory = loaded_directory(&api).await;

    directory
        .ban(&api, STUB_TOKEN, &UserId::new("u1"), Some("spam listings"))
        .await
        .expect("ban");

    let users = directory.search("").await;
    for user in &users {
        if user.id.as_str() == "u1" {
            assert!(user.is_banned());
            assert_eq!(user.ban_info.reason.as_deref(), Some("spam listings"));
        } else {
            assert!(!user.is_banned(), "{} should be untouched", user.name);
        }
    }

    assert_eq!(stub.counters().ban_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_ban_rolls_the_directory_back() {
    let stub = StubBackend::spawn(FailureModes {
        fail_ban: true,
        ..Default::default()
    })
    .await;
    let api = client_for(&stub);
    let directory = loaded_directory(&api).await;

    let before = directory.search("").await;

    let err = directory
        .ban(&api, STUB_TOKEN, &UserId::new("u1"), Some("spam listings"))
        .await
        .expect_err("ban should fail");
    assert!(!err.user_message().is_empty());

    // the optimistic flip was rolled back; the copy equals the snapshot
    let after = directory.search("").await;
    assert_eq!(before, after);
    assert!(after.iter().all(|user| !user.is_banned()));
}

#[tokio::test]
async fn unban_restores_the_clean_ban_state() {
    let stub = StubBackend::spawn(FailureModes::default()).await;
    let api = client_for(&stub);
    let directory = loaded_directory(&api).await;

    let id = UserId::new("u1");
    directory
        .ban(&api, STUB_TOKEN, &id, Some("spam listings"))
        .await
        .expect("ban");
    directory
        .unban(&api, STUB_TOKEN, &id)
        .await
        .expect("unban");

    let users = directory.search("").await;
    let user = users
        .iter()
        .find(|user| user.id == id)
        .expect("user present");
    assert!(!user.is_banned());
    assert!(user.ban_info.reason.is_none());
}

#[tokio::test]
async fn delete_issues_exactly_one_request_and_removes_one_record() {
    let stub = StubBackend::spawn(FailureModes::default()).await;
    let api = client_for(&stub);
    let directory = loaded_directory(&api).await;

    directory
        .delete(&api, STUB_TOKEN, &UserId::new("u3"))
        .await
        .expect("delete");

    assert_eq!(stub.counters().delete_user_calls.load(Ordering::SeqCst), 1);
    assert_eq!(directory.len().await, 2);
    assert!(
        directory
            .search("")
            .await
            .iter()
            .all(|user| user.id.as_str() != "u3")
    );
}

#[tokio::test]
async fn login_rejects_non_admin_roles_via_session_model() {
    let stub = StubBackend::spawn(FailureModes::default()).await;
    let api = client_for(&stub);

    let adopter = api
        .login("dana@example.com", pet_haven_integration_tests::STUB_PASSWORD)
        .await
        .expect("login");
    assert!(pet_haven_admin::models::CurrentAdmin::from_user(&adopter.user).is_none());

    let admin = api
        .login("priya@example.com", pet_haven_integration_tests::STUB_PASSWORD)
        .await
        .expect("login");
    assert!(pet_haven_admin::models::CurrentAdmin::from_user(&admin.user).is_some());
}
