//! Integration tests for the site's backend client against the stub.

use pet_haven_core::PetStatus;
use pet_haven_integration_tests::{FailureModes, STUB_OTP, STUB_PASSWORD, StubBackend};
use pet_haven_site::api::{ApiError, Client};
use pet_haven_site::config::BackendConfig;

fn client_for(stub: &StubBackend) -> Client {
    Client::new(&BackendConfig {
        base_url: stub.base_url(),
    })
}

#[tokio::test]
async fn all_pets_decodes_the_list_envelope() {
    let stub = StubBackend::spawn(FailureModes::default()).await;
    let client = client_for(&stub);

    let pets = client.all_pets().await.expect("pets fetch");
    assert_eq!(pets.len(), 3);

    let biscuit = &pets[0];
    assert_eq!(biscuit.name, "Golden Retriever");
    assert_eq!(biscuit.status, PetStatus::Available);
    assert_eq!(
        biscuit.adoption_fee.expect("fee present").to_string(),
        "$85.00"
    );

    // locked listing comes through with its recorded reason
    let rex = &pets[2];
    assert!(rex.is_locked);
    assert!(!rex.is_visible());
    assert_eq!(rex.lock_reason.as_deref(), Some("listing under review"));
}

#[tokio::test]
async fn failed_pet_fetch_is_a_status_error() {
    let stub = StubBackend::spawn(FailureModes {
        fail_pets: true,
        ..Default::default()
    })
    .await;
    let client = client_for(&stub);

    let err = client.all_pets().await.expect_err("fetch should fail");
    assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 500));
    // and the message shown to people doesn't leak the status line
    assert!(!err.user_message().contains("500"));
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let stub = StubBackend::spawn(FailureModes::default()).await;
    let client = client_for(&stub);

    let auth = client
        .login("dana@example.com", STUB_PASSWORD)
        .await
        .expect("login");

    assert!(!auth.token.is_empty());
    assert_eq!(auth.user.name, "Dana Reeves");
    assert!(!auth.user.is_banned());
}

#[tokio::test]
async fn wrong_password_is_a_rejection_with_backend_message() {
    let stub = StubBackend::spawn(FailureModes::default()).await;
    let client = client_for(&stub);

    let err = client
        .login("dana@example.com", "wrong")
        .await
        .expect_err("login should fail");

    match err {
        ApiError::Rejected(rejection) => {
            assert_eq!(rejection.message, "Invalid email or password");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn banned_account_surfaces_the_recorded_reason() {
    let stub = StubBackend::spawn(FailureModes::default()).await;
    let client = client_for(&stub);

    let err = client
        .login("banned@example.com", STUB_PASSWORD)
        .await
        .expect_err("login should fail");

    match err {
        ApiError::Banned { reason } => assert_eq!(reason.as_deref(), Some("spam listings")),
        other => panic!("expected Banned, got {other:?}"),
    }
}

#[tokio::test]
async fn reset_otp_round_trip_against_stub() {
    let stub = StubBackend::spawn(FailureModes::default()).await;
    let client = client_for(&stub);

    client
        .send_reset_otp("dana@example.com")
        .await
        .expect("send otp");

    // wrong code is a rejection, right code verifies
    assert!(
        client
            .verify_reset_otp("dana@example.com", "000000")
            .await
            .is_err()
    );
    client
        .verify_reset_otp("dana@example.com", STUB_OTP)
        .await
        .expect("verify otp");

    client
        .reset_password("dana@example.com", STUB_OTP, "new-password-1")
        .await
        .expect("reset password");
}
