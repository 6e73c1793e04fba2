use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Vault service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum VaultServiceError {
    #[error("user id could not be determined")]
    MissingUserId,
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),
    #[error("malformed request timestamp")]
    MalformedTimestamp,
    #[error("request timestamp outside allowed window")]
    StaleTimestamp,
    #[error("invalid request signature")]
    InvalidSignature,
    #[error("no stored token for user")]
    NoToken,
    #[error("stored token has expired")]
    TokenExpired,
    #[error("token does not match stored token")]
    InvalidToken,
    #[error("session does not belong to user")]
    InvalidSession,
    #[error("invalid webhook secret")]
    InvalidWebhookSecret,
    #[error("missing data")]
    MissingData,
    #[error("{0}")]
    Validation(String),
    #[error("credential not found")]
    CredentialNotFound,
    #[error("credential already exists")]
    CredentialExists,
    #[error("settings not found")]
    SettingsNotFound,
    #[error("recipient not found")]
    RecipientNotFound,
    #[error("recipient has no public key")]
    RecipientHasNoKey,
    #[error("user not found")]
    UserNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl VaultServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingUserId => "MISSING_USER_ID",
            Self::MissingHeader(_) => "MISSING_HEADER",
            Self::MalformedTimestamp => "MALFORMED_TIMESTAMP",
            Self::StaleTimestamp => "STALE_TIMESTAMP",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::NoToken => "NO_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidSession => "INVALID_SESSION",
            Self::InvalidWebhookSecret => "INVALID_WEBHOOK_SECRET",
            Self::MissingData => "MISSING_DATA",
            Self::Validation(_) => "VALIDATION",
            Self::CredentialNotFound => "CREDENTIAL_NOT_FOUND",
            Self::CredentialExists => "CREDENTIAL_EXISTS",
            Self::SettingsNotFound => "SETTINGS_NOT_FOUND",
            Self::RecipientNotFound => "RECIPIENT_NOT_FOUND",
            Self::RecipientHasNoKey => "RECIPIENT_HAS_NO_KEY",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for VaultServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingUserId
            | Self::MissingHeader(_)
            | Self::MalformedTimestamp
            | Self::StaleTimestamp
            | Self::InvalidSignature
            | Self::NoToken
            | Self::TokenExpired
            | Self::InvalidWebhookSecret => StatusCode::UNAUTHORIZED,
            Self::InvalidToken | Self::InvalidSession => StatusCode::FORBIDDEN,
            Self::MissingData | Self::Validation(_) | Self::RecipientHasNoKey => {
                StatusCode::BAD_REQUEST
            }
            Self::CredentialNotFound
            | Self::SettingsNotFound
            | Self::RecipientNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::CredentialExists => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
