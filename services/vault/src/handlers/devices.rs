use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::domain::types::Device;
use crate::error::VaultServiceError;
use crate::handlers::extract::SecurityHeaders;
use crate::state::AppState;
use crate::usecase::device::{
    DeactivateAllDevicesUseCase, DeactivateDeviceUseCase, ListDevicesUseCase, RegisterDeviceInput,
    RegisterDeviceUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: Uuid,
    pub device_name: Option<String>,
    pub browser: String,
    pub os: String,
    pub source: String,
    #[serde(serialize_with = "lockbox_core::serde::to_rfc3339_ms")]
    pub last_active: chrono::DateTime<Utc>,
    pub session_active: bool,
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        Self {
            id: device.id,
            device_name: device.device_name,
            browser: device.browser,
            os: device.os,
            source: device.source.as_str().to_owned(),
            last_active: device.last_active,
            session_active: device.session_active,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<String>,
}

// ── GET /devices ─────────────────────────────────────────────────────────────

pub async fn get_devices(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Value>, VaultServiceError> {
    let auth = state
        .security_gate()
        .check(&headers.0, query.user_id.as_deref(), Utc::now())
        .await?;
    let usecase = ListDevicesUseCase {
        repo: state.device_repo(),
    };
    let devices = usecase.execute(&auth.user_id).await?;
    let devices: Vec<DeviceResponse> = devices.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "devices": devices })))
}

// ── POST /devices ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceActionRequest {
    pub action: String,
    pub device_id: Option<Uuid>,
    pub device_name: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub source: Option<String>,
}

pub async fn post_devices(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Json(body): Json<DeviceActionRequest>,
) -> Result<Json<Value>, VaultServiceError> {
    let now = Utc::now();
    let auth = state.security_gate().check(&headers.0, None, now).await?;

    match body.action.as_str() {
        "register" => {
            let usecase = RegisterDeviceUseCase {
                repo: state.device_repo(),
            };
            let device = usecase
                .execute(
                    &auth.user_id,
                    RegisterDeviceInput {
                        device_name: body.device_name,
                        // Fall back to the device-hint headers when the body
                        // omits them.
                        browser: body.browser.or(headers.0.device.browser),
                        os: body.os.or(headers.0.device.os),
                        source: body.source.or(headers.0.request_source),
                    },
                    now,
                )
                .await?;
            Ok(Json(json!({ "device": DeviceResponse::from(device) })))
        }
        "deactivate" => {
            let device_id = body.device_id.ok_or(VaultServiceError::MissingData)?;
            let usecase = DeactivateDeviceUseCase {
                repo: state.device_repo(),
            };
            usecase.execute(&auth.user_id, device_id).await?;
            Ok(Json(json!({ "success": true })))
        }
        "deactivateAll" => {
            let usecase = DeactivateAllDevicesUseCase {
                repo: state.device_repo(),
            };
            usecase.execute(&auth.user_id).await?;
            Ok(Json(json!({ "success": true })))
        }
        other => Err(VaultServiceError::Validation(format!(
            "unknown action: {other}"
        ))),
    }
}
