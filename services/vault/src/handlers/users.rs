use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::VaultServiceError;
use crate::handlers::extract::SecurityHeaders;
use crate::state::AppState;
use crate::usecase::user::SearchUsersUseCase;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
}

// ── GET /users/search ────────────────────────────────────────────────────────

pub async fn search_users(
    headers: SecurityHeaders,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchHit>>, VaultServiceError> {
    let auth = state
        .security_gate()
        .check(&headers.0, query.user_id.as_deref(), Utc::now())
        .await?;
    let usecase = SearchUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute(&auth.user_id, &query.email).await?;
    let hits = users
        .into_iter()
        .map(|u| SearchHit {
            id: u.id,
            email: u.email,
            username: u.username,
        })
        .collect();
    Ok(Json(hits))
}
