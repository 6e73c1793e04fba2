use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::types::{SessionSettings, Settings, SettingsPatch};
use crate::error::VaultServiceError;
use crate::handlers::extract::SecurityHeaders;
use crate::state::AppState;
use crate::usecase::settings::{
    GetSettingsUseCase, MergeSettingsUseCase, ValidateUnlockUseCase, WriteSettingsInput,
    WriteSettingsUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub user_id: String,
    pub public_key: Option<String>,
    pub password: Option<String>,
    pub device_id: Option<String>,
    pub timestamp: Option<i64>,
    pub session_settings: SessionSettings,
}

impl From<Settings> for SettingsResponse {
    fn from(s: Settings) -> Self {
        Self {
            user_id: s.user_id,
            public_key: s.public_key,
            password: s.password,
            device_id: s.device_id,
            timestamp: s.timestamp,
            session_settings: s.session_settings,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<String>,
}

// ── GET /settings ────────────────────────────────────────────────────────────

pub async fn get_settings(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Value>, VaultServiceError> {
    let auth = state
        .security_gate()
        .check(&headers.0, query.user_id.as_deref(), Utc::now())
        .await?;
    let usecase = GetSettingsUseCase {
        repo: state.settings_repo(),
    };
    let settings = usecase.execute(&auth.user_id).await?;
    Ok(Json(json!({ "settings": SettingsResponse::from(settings) })))
}

// ── POST /settings ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteSettingsRequest {
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub timestamp: i64,
    pub session_settings: Option<SessionSettings>,
}

pub async fn post_settings(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Json(body): Json<WriteSettingsRequest>,
) -> Result<Json<Value>, VaultServiceError> {
    let auth = state.security_gate().check(&headers.0, None, Utc::now()).await?;
    let usecase = WriteSettingsUseCase {
        repo: state.settings_repo(),
    };
    usecase
        .execute(
            &auth.user_id,
            WriteSettingsInput {
                public_key: body.public_key,
                password: body.password,
                device_id: body.device_id,
                timestamp: body.timestamp,
                session_settings: body.session_settings,
            },
        )
        .await?;
    Ok(Json(json!({ "success": true })))
}

// ── PUT /settings ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSettingsRequest {
    pub public_key: Option<String>,
    pub password: Option<String>,
    pub device_id: Option<String>,
    pub timestamp: Option<i64>,
    pub session_settings: Option<SessionSettings>,
}

pub async fn put_settings(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Json(body): Json<MergeSettingsRequest>,
) -> Result<Json<Value>, VaultServiceError> {
    let auth = state.security_gate().check(&headers.0, None, Utc::now()).await?;
    let usecase = MergeSettingsUseCase {
        repo: state.settings_repo(),
    };
    let settings = usecase
        .execute(
            &auth.user_id,
            SettingsPatch {
                public_key: body.public_key,
                password: body.password,
                device_id: body.device_id,
                timestamp: body.timestamp,
                session_settings: body.session_settings,
            },
        )
        .await?;
    Ok(Json(json!({
        "success": true,
        "settings": SettingsResponse::from(settings),
    })))
}

// ── POST /settings/validate ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ValidateUnlockRequest {
    pub password: String,
}

pub async fn validate_settings(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Json(body): Json<ValidateUnlockRequest>,
) -> Result<Json<Value>, VaultServiceError> {
    let auth = state.security_gate().check(&headers.0, None, Utc::now()).await?;
    let usecase = ValidateUnlockUseCase {
        repo: state.settings_repo(),
    };
    let is_valid = usecase.execute(&auth.user_id, &body.password).await?;
    Ok(Json(json!({ "isValid": is_valid })))
}
