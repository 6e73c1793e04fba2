use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::repository::{DeviceRepository, SessionPort, UserRepository};
use crate::domain::types::{
    AuthContext, ClientType, Device, DeviceHints, DeviceSource, strip_bearer,
};
use crate::error::VaultServiceError;

pub struct ValidateTokenInput {
    /// User id supplied directly by the caller (takes priority).
    pub explicit_user_id: Option<String>,
    /// `X-User-ID` header value.
    pub header_user_id: Option<String>,
    /// `userId` query parameter.
    pub query_user_id: Option<String>,
    /// Raw `Authorization` header value.
    pub authorization: Option<String>,
    /// `X-Request-Source` header value (`web` / `extension`).
    pub request_source: Option<String>,
    pub device: DeviceHints,
}

/// Dual-mode identity check: web clients are verified against the identity
/// provider's session, extension clients against the stored bearer token.
pub struct ValidateTokenUseCase<U, S, D> {
    pub users: U,
    pub sessions: S,
    pub devices: D,
}

impl<U, S, D> ValidateTokenUseCase<U, S, D>
where
    U: UserRepository,
    S: SessionPort,
    D: DeviceRepository,
{
    pub async fn execute(
        &self,
        input: ValidateTokenInput,
        now: DateTime<Utc>,
    ) -> Result<AuthContext, VaultServiceError> {
        let user_id = [
            input.explicit_user_id,
            input.header_user_id,
            input.query_user_id,
        ]
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_owned())
        .find(|s| !s.is_empty())
        .ok_or(VaultServiceError::MissingUserId)?;

        let token = input
            .authorization
            .as_deref()
            .map(strip_bearer)
            .filter(|t| !t.is_empty())
            .ok_or(VaultServiceError::NoToken)?;

        let client_type = ClientType::from_header(input.request_source.as_deref());

        match client_type {
            ClientType::Web => {
                // The session subject must match the claimed user id exactly.
                match self.sessions.subject(token).await? {
                    Some(subject) if subject == user_id => {}
                    _ => return Err(VaultServiceError::InvalidSession),
                }
            }
            ClientType::Extension => {
                let stored = self
                    .users
                    .get_token(&user_id)
                    .await?
                    .ok_or(VaultServiceError::NoToken)?;
                if stored.expires_at <= now {
                    return Err(VaultServiceError::TokenExpired);
                }
                if stored.token != token {
                    return Err(VaultServiceError::InvalidToken);
                }
            }
        }

        // Only after successful authentication; failures stay side-effect-free.
        self.track_device(&user_id, input.request_source.as_deref(), &input.device, now)
            .await;

        Ok(AuthContext {
            user_id,
            client_type,
        })
    }

    /// Best-effort trust update. Never surfaces an error to the caller.
    async fn track_device(
        &self,
        user_id: &str,
        request_source: Option<&str>,
        hints: &DeviceHints,
        now: DateTime<Utc>,
    ) {
        let source = request_source
            .map(DeviceSource::from_str)
            .unwrap_or(DeviceSource::Unknown);
        let device = Device {
            id: Uuid::new_v4(),
            user_id: user_id.to_owned(),
            device_name: hints.device_name.clone(),
            browser: hints.browser.clone().unwrap_or_else(|| "Unknown".to_owned()),
            os: hints.os.clone().unwrap_or_else(|| "Unknown".to_owned()),
            source,
            last_active: now,
            session_active: true,
        };
        if let Err(e) = self.devices.upsert(&device).await {
            tracing::warn!(error = %e, user_id, "device trust update failed");
        }
    }
}
