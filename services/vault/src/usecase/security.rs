use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};

use crate::domain::repository::{DeviceRepository, SessionPort, UserRepository};
use crate::domain::types::{AuthContext, DeviceHints};
use crate::error::VaultServiceError;
use crate::usecase::auth::{ValidateTokenInput, ValidateTokenUseCase};

/// Maximum allowed distance between `X-Timestamp` and server time.
pub const REPLAY_WINDOW_MS: i64 = 300_000;

/// Raw security header values collected from a request. Presence is
/// enforced here, not in the extractor, so the checks stay unit testable.
#[derive(Debug, Clone, Default)]
pub struct SecurityHeaderValues {
    pub authorization: Option<String>,
    pub timestamp: Option<String>,
    pub nonce: Option<String>,
    pub signature: Option<String>,
    pub user_id: Option<String>,
    pub request_source: Option<String>,
    pub device: DeviceHints,
}

/// Validate header presence, the replay window, and signature
/// well-formedness. Cryptographic signature verification is an extension
/// point; only structure is checked here.
pub fn verify_request_headers(
    headers: &SecurityHeaderValues,
    now: DateTime<Utc>,
) -> Result<(), VaultServiceError> {
    let required: [(&'static str, Option<&str>); 5] = [
        ("Authorization", headers.authorization.as_deref()),
        ("X-Timestamp", headers.timestamp.as_deref()),
        ("X-Nonce", headers.nonce.as_deref()),
        ("X-Signature", headers.signature.as_deref()),
        ("X-User-ID", headers.user_id.as_deref()),
    ];
    for (name, value) in required {
        if value.is_none_or(|v| v.is_empty()) {
            return Err(VaultServiceError::MissingHeader(name));
        }
    }

    let raw_ts = headers.timestamp.as_deref().unwrap_or_default();
    let ts = DateTime::parse_from_rfc3339(raw_ts)
        .map_err(|_| VaultServiceError::MalformedTimestamp)?
        .with_timezone(&Utc);
    let skew_ms = (now - ts).num_milliseconds().abs();
    if skew_ms > REPLAY_WINDOW_MS {
        return Err(VaultServiceError::StaleTimestamp);
    }

    let signature = headers.signature.as_deref().unwrap_or_default();
    if BASE64.decode(signature).is_err() {
        return Err(VaultServiceError::InvalidSignature);
    }

    Ok(())
}

/// The single entry check every protected endpoint passes: header contract,
/// replay window, then delegation to the token validator.
pub struct SecurityGate<U, S, D> {
    pub validator: ValidateTokenUseCase<U, S, D>,
}

impl<U, S, D> SecurityGate<U, S, D>
where
    U: UserRepository,
    S: SessionPort,
    D: DeviceRepository,
{
    pub async fn check(
        &self,
        headers: &SecurityHeaderValues,
        query_user_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthContext, VaultServiceError> {
        verify_request_headers(headers, now)?;
        self.validator
            .execute(
                ValidateTokenInput {
                    explicit_user_id: None,
                    header_user_id: headers.user_id.clone(),
                    query_user_id: query_user_id.map(str::to_owned),
                    authorization: headers.authorization.clone(),
                    request_source: headers.request_source.clone(),
                    device: headers.device.clone(),
                },
                now,
            )
            .await
    }
}
