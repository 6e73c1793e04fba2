use chrono::{Duration, Utc};

use lockbox_vault::domain::types::DeviceHints;
use lockbox_vault::error::VaultServiceError;
use lockbox_vault::usecase::auth::ValidateTokenUseCase;
use lockbox_vault::usecase::security::{SecurityGate, SecurityHeaderValues};

use crate::helpers::{MockDeviceRepo, MockSessionPort, MockUserRepo};

fn gate_with_token(
    user_id: &str,
    token: &str,
) -> SecurityGate<MockUserRepo, MockSessionPort, MockDeviceRepo> {
    SecurityGate {
        validator: ValidateTokenUseCase {
            users: MockUserRepo::empty().with_token(user_id, token, Utc::now() + Duration::days(1)),
            sessions: MockSessionPort::rejecting(),
            devices: MockDeviceRepo::empty(),
        },
    }
}

fn headers_for(user_id: &str, token: &str) -> SecurityHeaderValues {
    SecurityHeaderValues {
        authorization: Some(format!("Bearer {token}")),
        timestamp: Some(Utc::now().to_rfc3339()),
        nonce: Some("nonce-1".to_owned()),
        signature: Some("c2lnbmF0dXJl".to_owned()),
        user_id: Some(user_id.to_owned()),
        request_source: Some("extension".to_owned()),
        device: DeviceHints::default(),
    }
}

#[tokio::test]
async fn should_pass_gate_with_complete_headers_and_valid_token() {
    let gate = gate_with_token("u1", "tok-1");
    let auth = gate
        .check(&headers_for("u1", "tok-1"), None, Utc::now())
        .await
        .unwrap();
    assert_eq!(auth.user_id, "u1");
}

#[tokio::test]
async fn should_short_circuit_on_missing_header_before_token_check() {
    let gate = gate_with_token("u1", "tok-1");
    let mut headers = headers_for("u1", "tok-1");
    headers.signature = None;
    let result = gate.check(&headers, None, Utc::now()).await;
    assert!(
        matches!(result, Err(VaultServiceError::MissingHeader("X-Signature"))),
        "expected MissingHeader, got {result:?}"
    );
}

#[tokio::test]
async fn should_accept_timestamp_at_299_999_ms_skew() {
    let now = Utc::now();
    let gate = gate_with_token("u1", "tok-1");
    let mut headers = headers_for("u1", "tok-1");
    headers.timestamp = Some((now - Duration::milliseconds(299_999)).to_rfc3339());
    assert!(gate.check(&headers, None, now).await.is_ok());
}

#[tokio::test]
async fn should_reject_timestamp_at_300_001_ms_skew() {
    let now = Utc::now();
    let gate = gate_with_token("u1", "tok-1");
    let mut headers = headers_for("u1", "tok-1");
    headers.timestamp = Some((now - Duration::milliseconds(300_001)).to_rfc3339());
    let result = gate.check(&headers, None, now).await;
    assert!(matches!(result, Err(VaultServiceError::StaleTimestamp)));
}

#[tokio::test]
async fn should_fall_back_to_query_user_id_when_header_absent() {
    let gate = gate_with_token("u1", "tok-1");
    let mut headers = headers_for("ignored", "tok-1");
    headers.user_id = Some("ignored".to_owned());
    // Header wins over query; drop the header to exercise the query path.
    let mut headers_no_uid = headers.clone();
    headers_no_uid.user_id = None;
    let result = gate.check(&headers_no_uid, Some("u1"), Utc::now()).await;
    // X-User-ID is a required header, so its absence fails the gate even
    // though the query could identify the user.
    assert!(matches!(
        result,
        Err(VaultServiceError::MissingHeader("X-User-ID"))
    ));
}

#[tokio::test]
async fn should_propagate_token_errors_through_the_gate() {
    let gate = gate_with_token("u1", "tok-1");
    let result = gate
        .check(&headers_for("u1", "wrong-token"), None, Utc::now())
        .await;
    assert!(
        matches!(result, Err(VaultServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}
