use axum::{Json, extract::State};
use chrono::Utc;
use http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::VaultServiceError;
use crate::state::AppState;
use crate::usecase::user::{DeleteUserUseCase, SyncUserInput, SyncUserUseCase};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityEventData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct IdentityEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: IdentityEventData,
}

// ── POST /webhook/identity ───────────────────────────────────────────────────

/// Identity-provider lifecycle events, guarded by a shared secret instead of
/// the user-facing header contract.
pub async fn identity_webhook(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(event): Json<IdentityEvent>,
) -> Result<Json<Value>, VaultServiceError> {
    let secret = headers
        .get("x-webhook-secret")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if secret != state.webhook_secret {
        return Err(VaultServiceError::InvalidWebhookSecret);
    }

    match event.event_type.as_str() {
        "user.created" | "user.updated" => {
            let usecase = SyncUserUseCase {
                repo: state.user_repo(),
            };
            usecase
                .execute(
                    SyncUserInput {
                        id: event.data.id,
                        email: event.data.email,
                        first_name: event.data.first_name,
                        last_name: event.data.last_name,
                        username: event.data.username,
                        image_url: event.data.image_url,
                    },
                    Utc::now(),
                )
                .await?;
        }
        "user.deleted" => {
            let usecase = DeleteUserUseCase {
                repo: state.user_repo(),
            };
            usecase.execute(&event.data.id).await?;
        }
        other => {
            // Unknown event types are acknowledged so the provider does not
            // retry them forever.
            tracing::debug!(event_type = other, "ignoring identity event");
        }
    }
    Ok(Json(json!({ "success": true })))
}
