use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::VaultServiceError;
use crate::state::AppState;
use crate::usecase::user::{StoreTokenInput, StoreTokenUseCase};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreTokenRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
}

// ── POST /auth/token ─────────────────────────────────────────────────────────

/// Extension token provisioning. Runs before the extension has anything to
/// authenticate with, so it does not carry the security header contract.
pub async fn store_token(
    State(state): State<AppState>,
    Json(body): Json<StoreTokenRequest>,
) -> Result<Json<Value>, VaultServiceError> {
    let usecase = StoreTokenUseCase {
        repo: state.user_repo(),
        audit: state.audit_repo(),
    };
    usecase
        .execute(
            StoreTokenInput {
                user_id: body.user_id,
                email: body.email,
                token: body.token,
            },
            Utc::now(),
        )
        .await?;
    Ok(Json(json!({ "success": true })))
}
