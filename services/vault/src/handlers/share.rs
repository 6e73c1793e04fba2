use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::types::CredentialKind;
use crate::error::VaultServiceError;
use crate::handlers::extract::SecurityHeaders;
use crate::state::AppState;
use crate::usecase::share::{ShareCredentialsInput, ShareCredentialsUseCase, ShareItem};

#[derive(Deserialize)]
pub struct ShareItemRequest {
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub user: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub recipient_email: String,
    pub items: Vec<ShareItemRequest>,
    /// `keys` or `passwords`. Absent defaults to passwords.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// ── POST /share ──────────────────────────────────────────────────────────────

pub async fn post_share(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Json(body): Json<ShareRequest>,
) -> Result<Json<Value>, VaultServiceError> {
    let now = Utc::now();
    let auth = state.security_gate().check(&headers.0, None, now).await?;

    let kind = match body.kind.as_deref() {
        None => CredentialKind::Password,
        Some(raw) => CredentialKind::from_str(raw)
            .ok_or_else(|| VaultServiceError::Validation(format!("unknown type: {raw}")))?,
    };
    let items = body
        .items
        .into_iter()
        .map(|item| ShareItem {
            website: item.website,
            username: item.user,
            ciphertext: item.password,
        })
        .collect();

    let usecase = ShareCredentialsUseCase {
        users: state.user_repo(),
        settings: state.settings_repo(),
        credentials: state.credential_repo(),
        audit: state.audit_repo(),
    };
    let message = usecase
        .execute(
            &auth.user_id,
            ShareCredentialsInput {
                recipient_email: body.recipient_email,
                kind,
                items,
            },
            now,
        )
        .await?;
    Ok(Json(json!({ "message": message })))
}
