use chrono::{Duration, Utc};

use lockbox_vault::domain::types::{ClientType, DeviceHints, DeviceSource};
use lockbox_vault::error::VaultServiceError;
use lockbox_vault::usecase::auth::{ValidateTokenInput, ValidateTokenUseCase};

use crate::helpers::{MockDeviceRepo, MockSessionPort, MockUserRepo, test_user};

fn extension_input(user_id: &str, token: &str) -> ValidateTokenInput {
    ValidateTokenInput {
        explicit_user_id: None,
        header_user_id: Some(user_id.to_owned()),
        query_user_id: None,
        authorization: Some(format!("Bearer {token}")),
        request_source: Some("extension".to_owned()),
        device: DeviceHints {
            browser: Some("Chrome".to_owned()),
            os: Some("Windows".to_owned()),
            device_name: None,
        },
    }
}

// ── Extension branch ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_accept_matching_unexpired_extension_token() {
    let now = Utc::now();
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::new(vec![test_user("u1", "u1@example.com")]).with_token(
            "u1",
            "tok-1",
            now + Duration::days(1),
        ),
        sessions: MockSessionPort::rejecting(),
        devices: MockDeviceRepo::empty(),
    };

    let auth = usecase.execute(extension_input("u1", "tok-1"), now).await.unwrap();
    assert_eq!(auth.user_id, "u1");
    assert_eq!(auth.client_type, ClientType::Extension);
}

#[tokio::test]
async fn should_reject_mutated_token_as_invalid() {
    let now = Utc::now();
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::empty().with_token("u1", "tok-1", now + Duration::days(1)),
        sessions: MockSessionPort::rejecting(),
        devices: MockDeviceRepo::empty(),
    };

    // Single-character mutation of the stored token.
    let result = usecase.execute(extension_input("u1", "tok-2"), now).await;
    assert!(
        matches!(result, Err(VaultServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_when_no_token_stored() {
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::empty(),
        sessions: MockSessionPort::rejecting(),
        devices: MockDeviceRepo::empty(),
    };

    let result = usecase.execute(extension_input("u1", "tok-1"), Utc::now()).await;
    assert!(
        matches!(result, Err(VaultServiceError::NoToken)),
        "expected NoToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_accept_token_one_second_before_expiry() {
    let now = Utc::now();
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::empty().with_token("u1", "tok-1", now + Duration::seconds(1)),
        sessions: MockSessionPort::rejecting(),
        devices: MockDeviceRepo::empty(),
    };

    let auth = usecase.execute(extension_input("u1", "tok-1"), now).await.unwrap();
    assert_eq!(auth.user_id, "u1");
}

#[tokio::test]
async fn should_reject_token_at_and_after_expiry() {
    let now = Utc::now();
    for expires_at in [now, now - Duration::seconds(1)] {
        let usecase = ValidateTokenUseCase {
            users: MockUserRepo::empty().with_token("u1", "tok-1", expires_at),
            sessions: MockSessionPort::rejecting(),
            devices: MockDeviceRepo::empty(),
        };
        let result = usecase.execute(extension_input("u1", "tok-1"), now).await;
        assert!(
            matches!(result, Err(VaultServiceError::TokenExpired)),
            "expected TokenExpired at {expires_at}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_require_a_user_id_from_some_source() {
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::empty(),
        sessions: MockSessionPort::rejecting(),
        devices: MockDeviceRepo::empty(),
    };

    let mut input = extension_input("u1", "tok-1");
    input.header_user_id = Some("   ".to_owned());
    let result = usecase.execute(input, Utc::now()).await;
    assert!(
        matches!(result, Err(VaultServiceError::MissingUserId)),
        "expected MissingUserId, got {result:?}"
    );
}

#[tokio::test]
async fn should_prefer_header_user_id_over_query() {
    let now = Utc::now();
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::empty().with_token("header-user", "tok-1", now + Duration::days(1)),
        sessions: MockSessionPort::rejecting(),
        devices: MockDeviceRepo::empty(),
    };

    let mut input = extension_input("header-user", "tok-1");
    input.query_user_id = Some("query-user".to_owned());
    let auth = usecase.execute(input, now).await.unwrap();
    assert_eq!(auth.user_id, "header-user");
}

// ── Web branch ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_accept_web_session_with_matching_subject() {
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::empty(),
        sessions: MockSessionPort::new("sess-1", "u1"),
        devices: MockDeviceRepo::empty(),
    };

    let mut input = extension_input("u1", "sess-1");
    input.request_source = Some("web".to_owned());
    let auth = usecase.execute(input, Utc::now()).await.unwrap();
    assert_eq!(auth.client_type, ClientType::Web);
}

#[tokio::test]
async fn should_reject_web_session_with_mismatched_subject() {
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::empty(),
        sessions: MockSessionPort::new("sess-1", "someone-else"),
        devices: MockDeviceRepo::empty(),
    };

    let mut input = extension_input("u1", "sess-1");
    input.request_source = Some("web".to_owned());
    let result = usecase.execute(input, Utc::now()).await;
    assert!(
        matches!(result, Err(VaultServiceError::InvalidSession)),
        "expected InvalidSession, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_web_session_token() {
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::empty(),
        sessions: MockSessionPort::rejecting(),
        devices: MockDeviceRepo::empty(),
    };

    let mut input = extension_input("u1", "sess-1");
    input.request_source = Some("web".to_owned());
    let result = usecase.execute(input, Utc::now()).await;
    assert!(matches!(result, Err(VaultServiceError::InvalidSession)));
}

// ── Device tracking side effect ──────────────────────────────────────────────

#[tokio::test]
async fn should_track_device_after_successful_auth() {
    let now = Utc::now();
    let devices = MockDeviceRepo::empty();
    let handle = devices.devices_handle();
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::empty().with_token("u1", "tok-1", now + Duration::days(1)),
        sessions: MockSessionPort::rejecting(),
        devices,
    };

    usecase.execute(extension_input("u1", "tok-1"), now).await.unwrap();

    let devices = handle.lock().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].browser, "Chrome");
    assert_eq!(devices[0].os, "Windows");
    assert_eq!(devices[0].source, DeviceSource::Extension);
    assert!(devices[0].session_active);
}

#[tokio::test]
async fn should_not_track_device_when_auth_fails() {
    let devices = MockDeviceRepo::empty();
    let handle = devices.devices_handle();
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::empty(),
        sessions: MockSessionPort::rejecting(),
        devices,
    };

    let _ = usecase.execute(extension_input("u1", "tok-1"), Utc::now()).await;
    assert!(handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_classify_device_as_unknown_without_source_header() {
    let now = Utc::now();
    let devices = MockDeviceRepo::empty();
    let handle = devices.devices_handle();
    let usecase = ValidateTokenUseCase {
        users: MockUserRepo::empty().with_token("u1", "tok-1", now + Duration::days(1)),
        sessions: MockSessionPort::rejecting(),
        devices,
    };

    let mut input = extension_input("u1", "tok-1");
    input.request_source = None;
    usecase.execute(input, now).await.unwrap();

    let devices = handle.lock().unwrap();
    assert_eq!(devices[0].source, DeviceSource::Unknown);
}
