use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::domain::types::{AuditAction, AuditEntry, User, strip_bearer};
use crate::error::VaultServiceError;
use crate::usecase::record_audit;

/// Lifetime of a stored extension token.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Maximum rows returned by the user directory search.
pub const SEARCH_LIMIT: u64 = 5;

// ── SyncUser ─────────────────────────────────────────────────────────────────

pub struct SyncUserInput {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub image_url: Option<String>,
}

/// Mirror an identity-provider create/update event into the local user
/// table.
pub struct SyncUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SyncUserUseCase<R> {
    pub async fn execute(
        &self,
        input: SyncUserInput,
        now: DateTime<Utc>,
    ) -> Result<(), VaultServiceError> {
        if input.id.is_empty() || input.email.is_empty() {
            return Err(VaultServiceError::MissingData);
        }
        let user = User {
            id: input.id,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            username: input.username,
            image_url: input.image_url,
            verification: true,
            created_at: now,
            last_login: Some(now),
        };
        self.repo.upsert_profile(&user).await
    }
}

// ── StoreToken ───────────────────────────────────────────────────────────────

pub struct StoreTokenInput {
    pub user_id: String,
    pub email: String,
    pub token: String,
}

/// Provision the extension's long-lived token: upsert the user row, then
/// store the encrypted token with a fresh expiry.
pub struct StoreTokenUseCase<R: UserRepository, A: AuditLogRepository> {
    pub repo: R,
    pub audit: A,
}

impl<R: UserRepository, A: AuditLogRepository> StoreTokenUseCase<R, A> {
    pub async fn execute(
        &self,
        input: StoreTokenInput,
        now: DateTime<Utc>,
    ) -> Result<(), VaultServiceError> {
        if input.user_id.is_empty() || input.email.is_empty() || input.token.is_empty() {
            return Err(VaultServiceError::MissingData);
        }
        let token = strip_bearer(&input.token);
        if token.is_empty() {
            return Err(VaultServiceError::MissingData);
        }

        // The user may not have hit a sync event yet.
        if self.repo.find_by_id(&input.user_id).await?.is_none() {
            let user = User {
                id: input.user_id.clone(),
                email: input.email.clone(),
                first_name: None,
                last_name: None,
                username: None,
                image_url: None,
                verification: false,
                created_at: now,
                last_login: Some(now),
            };
            self.repo.upsert_profile(&user).await?;
        }

        let expires_at = now + Duration::days(TOKEN_TTL_DAYS);
        self.repo
            .store_token(&input.user_id, token, expires_at)
            .await?;

        record_audit(
            &self.audit,
            AuditEntry {
                id: Uuid::new_v4(),
                user_id: input.user_id.clone(),
                action: AuditAction::TokenStored,
                detail: format!("expires {}", expires_at.to_rfc3339()),
                created_at: now,
            },
        )
        .await;
        Ok(())
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

/// Identity-provider delete event: remove the user and everything they own
/// in one transaction.
pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, user_id: &str) -> Result<(), VaultServiceError> {
        if user_id.is_empty() {
            return Err(VaultServiceError::MissingData);
        }
        self.repo.delete_cascade(user_id).await?;
        // Audit rows belong to the user and go with the cascade; the log
        // stream is the only surviving record.
        tracing::info!(user_id, "user deleted with cascade");
        Ok(())
    }
}

// ── SearchUsers ──────────────────────────────────────────────────────────────

pub struct SearchUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SearchUsersUseCase<R> {
    /// Case-insensitive email substring search for the share dialog. The
    /// caller is always excluded from the results.
    pub async fn execute(
        &self,
        caller_id: &str,
        fragment: &str,
    ) -> Result<Vec<User>, VaultServiceError> {
        if fragment.trim().is_empty() {
            return Ok(vec![]);
        }
        self.repo
            .search_by_email(caller_id, fragment.trim(), SEARCH_LIMIT)
            .await
    }
}
