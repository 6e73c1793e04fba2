use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use lockbox_core::pagination::PageRequest;

use crate::domain::types::{Credential, CredentialKind, CredentialPatch};
use crate::error::VaultServiceError;
use crate::handlers::extract::SecurityHeaders;
use crate::state::AppState;
use crate::usecase::credential::{
    CreateCredentialInput, CreateCredentialUseCase, DeleteCredentialUseCase,
    ListCredentialsUseCase, UpdateCredentialUseCase,
};

/// Wire shape of a credential record. The ciphertext travels in `password`
/// and the (client-encrypted) login in `user`, matching the client's vault
/// format for both kinds.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResponse {
    pub id: String,
    pub website: String,
    pub user: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    pub version: i32,
    #[serde(serialize_with = "lockbox_core::serde::to_epoch_ms")]
    pub created_at: chrono::DateTime<Utc>,
    #[serde(serialize_with = "lockbox_core::serde::to_epoch_ms")]
    pub modified_at: chrono::DateTime<Utc>,
    #[serde(serialize_with = "lockbox_core::serde::to_epoch_ms")]
    pub last_accessed: chrono::DateTime<Utc>,
}

impl From<Credential> for CredentialResponse {
    fn from(c: Credential) -> Self {
        Self {
            id: c.id,
            website: c.website,
            user: c.username,
            password: c.ciphertext,
            owner_id: c.owner_id,
            owner_email: c.owner_email,
            version: c.version,
            created_at: c.created_at,
            modified_at: c.modified_at,
            last_accessed: c.last_accessed,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
}

#[derive(Deserialize)]
pub struct CreateCredentialRequest {
    pub id: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub user: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateCredentialRequest {
    pub website: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    pub user_id: Option<String>,
    pub id: Option<String>,
}

// ── Shared by both kinds ─────────────────────────────────────────────────────

async fn list(
    kind: CredentialKind,
    headers: SecurityHeaders,
    state: AppState,
    query: ListQuery,
) -> Result<Json<Value>, VaultServiceError> {
    let auth = state
        .security_gate()
        .check(&headers.0, query.user_id.as_deref(), Utc::now())
        .await?;
    // A pagination param opts into the paged variant.
    let page = (query.page.is_some() || query.per_page.is_some()).then(|| PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    });
    let usecase = ListCredentialsUseCase {
        repo: state.credential_repo(),
    };
    let result = usecase.execute(&auth.user_id, kind, page).await?;
    let items: Vec<CredentialResponse> = result.items.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "passwords": items, "total": result.total })))
}

async fn create(
    kind: CredentialKind,
    headers: SecurityHeaders,
    state: AppState,
    body: CreateCredentialRequest,
) -> Result<Json<Value>, VaultServiceError> {
    let now = Utc::now();
    let auth = state.security_gate().check(&headers.0, None, now).await?;
    let usecase = CreateCredentialUseCase {
        repo: state.credential_repo(),
        audit: state.audit_repo(),
    };
    usecase
        .execute(
            &auth.user_id,
            kind,
            CreateCredentialInput {
                id: body.id,
                website: body.website,
                username: body.user,
                ciphertext: body.password,
            },
            now,
        )
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn update(
    kind: CredentialKind,
    headers: SecurityHeaders,
    state: AppState,
    id: String,
    body: UpdateCredentialRequest,
) -> Result<Json<Value>, VaultServiceError> {
    let now = Utc::now();
    let auth = state.security_gate().check(&headers.0, None, now).await?;
    let usecase = UpdateCredentialUseCase {
        repo: state.credential_repo(),
        audit: state.audit_repo(),
    };
    usecase
        .execute(
            &auth.user_id,
            kind,
            &id,
            CredentialPatch {
                website: body.website,
                username: body.user,
                ciphertext: body.password,
            },
            now,
        )
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn delete(
    kind: CredentialKind,
    headers: SecurityHeaders,
    state: AppState,
    id: String,
) -> Result<Json<Value>, VaultServiceError> {
    let now = Utc::now();
    let auth = state.security_gate().check(&headers.0, None, now).await?;
    let usecase = DeleteCredentialUseCase {
        repo: state.credential_repo(),
        audit: state.audit_repo(),
    };
    usecase.execute(&auth.user_id, kind, &id, now).await?;
    Ok(Json(json!({ "success": true })))
}

// ── /keys ────────────────────────────────────────────────────────────────────

pub async fn get_keys(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, VaultServiceError> {
    list(CredentialKind::Key, headers, state, query).await
}

pub async fn post_keys(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateCredentialRequest>,
) -> Result<Json<Value>, VaultServiceError> {
    create(CredentialKind::Key, headers, state, body).await
}

pub async fn put_key(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateCredentialRequest>,
) -> Result<Json<Value>, VaultServiceError> {
    update(CredentialKind::Key, headers, state, id, body).await
}

pub async fn delete_key(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, VaultServiceError> {
    delete(CredentialKind::Key, headers, state, id).await
}

/// `DELETE /keys?id=` variant kept for older extension builds.
pub async fn delete_keys(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Value>, VaultServiceError> {
    let id = query.id.ok_or(VaultServiceError::MissingData)?;
    delete(CredentialKind::Key, headers, state, id).await
}

// ── /passwords ───────────────────────────────────────────────────────────────

pub async fn get_passwords(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, VaultServiceError> {
    list(CredentialKind::Password, headers, state, query).await
}

pub async fn post_passwords(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateCredentialRequest>,
) -> Result<Json<Value>, VaultServiceError> {
    create(CredentialKind::Password, headers, state, body).await
}

pub async fn put_password(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateCredentialRequest>,
) -> Result<Json<Value>, VaultServiceError> {
    update(CredentialKind::Password, headers, state, id, body).await
}

pub async fn delete_password(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, VaultServiceError> {
    delete(CredentialKind::Password, headers, state, id).await
}

/// `DELETE /passwords?id=` variant kept for older extension builds.
pub async fn delete_passwords(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Value>, VaultServiceError> {
    let id = query.id.ok_or(VaultServiceError::MissingData)?;
    delete(CredentialKind::Password, headers, state, id).await
}
