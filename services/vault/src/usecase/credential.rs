use chrono::{DateTime, Utc};
use uuid::Uuid;

use lockbox_core::pagination::PageRequest;

use crate::domain::repository::{AuditLogRepository, CredentialRepository};
use crate::domain::types::{
    AuditAction, AuditEntry, Credential, CredentialKind, CredentialPatch,
};
use crate::error::VaultServiceError;
use crate::usecase::record_audit;

// ── CreateCredential ─────────────────────────────────────────────────────────

pub struct CreateCredentialInput {
    pub id: String,
    pub website: String,
    pub username: String,
    pub ciphertext: String,
}

/// Strict create: an existing (id, user, kind) row is a conflict, never a
/// silent overwrite.
pub struct CreateCredentialUseCase<R: CredentialRepository, A: AuditLogRepository> {
    pub repo: R,
    pub audit: A,
}

impl<R: CredentialRepository, A: AuditLogRepository> CreateCredentialUseCase<R, A> {
    pub async fn execute(
        &self,
        user_id: &str,
        kind: CredentialKind,
        input: CreateCredentialInput,
        now: DateTime<Utc>,
    ) -> Result<Credential, VaultServiceError> {
        if input.id.is_empty() || input.ciphertext.is_empty() {
            return Err(VaultServiceError::MissingData);
        }
        if self.repo.find(user_id, &input.id, kind).await?.is_some() {
            return Err(VaultServiceError::CredentialExists);
        }
        let credential = Credential {
            id: input.id,
            user_id: user_id.to_owned(),
            kind,
            website: input.website,
            username: input.username,
            ciphertext: input.ciphertext,
            owner_id: None,
            owner_email: None,
            version: 1,
            created_at: now,
            modified_at: now,
            last_accessed: now,
        };
        self.repo.create(&credential).await?;
        record_audit(
            &self.audit,
            AuditEntry {
                id: Uuid::new_v4(),
                user_id: user_id.to_owned(),
                action: AuditAction::CredentialCreated,
                detail: format!("{} {}", kind.as_str(), credential.id),
                created_at: now,
            },
        )
        .await;
        Ok(credential)
    }
}

// ── ListCredentials ──────────────────────────────────────────────────────────

pub struct CredentialPage {
    pub items: Vec<Credential>,
    pub total: u64,
}

pub struct ListCredentialsUseCase<R: CredentialRepository> {
    pub repo: R,
}

impl<R: CredentialRepository> ListCredentialsUseCase<R> {
    /// With `page`, returns one page plus the total count; without, the
    /// full list. Both orderings are `modified_at` descending.
    pub async fn execute(
        &self,
        user_id: &str,
        kind: CredentialKind,
        page: Option<PageRequest>,
    ) -> Result<CredentialPage, VaultServiceError> {
        match page {
            Some(page) => {
                let (items, total) = self.repo.list_page(user_id, kind, page.clamped()).await?;
                Ok(CredentialPage { items, total })
            }
            None => {
                let items = self.repo.list(user_id, kind).await?;
                let total = items.len() as u64;
                Ok(CredentialPage { items, total })
            }
        }
    }
}

// ── UpdateCredential ─────────────────────────────────────────────────────────

pub struct UpdateCredentialUseCase<R: CredentialRepository, A: AuditLogRepository> {
    pub repo: R,
    pub audit: A,
}

impl<R: CredentialRepository, A: AuditLogRepository> UpdateCredentialUseCase<R, A> {
    /// Merge the patch over the stored record and bump the version by one.
    /// There is no expected-version precondition; the last write wins.
    pub async fn execute(
        &self,
        user_id: &str,
        kind: CredentialKind,
        id: &str,
        patch: CredentialPatch,
        now: DateTime<Utc>,
    ) -> Result<Credential, VaultServiceError> {
        let mut credential = self
            .repo
            .find(user_id, id, kind)
            .await?
            .ok_or(VaultServiceError::CredentialNotFound)?;

        if let Some(website) = patch.website {
            credential.website = website;
        }
        if let Some(username) = patch.username {
            credential.username = username;
        }
        if let Some(ciphertext) = patch.ciphertext {
            credential.ciphertext = ciphertext;
        }
        credential.version += 1;
        credential.modified_at = now;
        credential.last_accessed = now;

        self.repo.update(&credential).await?;
        record_audit(
            &self.audit,
            AuditEntry {
                id: Uuid::new_v4(),
                user_id: user_id.to_owned(),
                action: AuditAction::CredentialUpdated,
                detail: format!("{} {} v{}", kind.as_str(), credential.id, credential.version),
                created_at: now,
            },
        )
        .await;
        Ok(credential)
    }
}

// ── DeleteCredential ─────────────────────────────────────────────────────────

pub struct DeleteCredentialUseCase<R: CredentialRepository, A: AuditLogRepository> {
    pub repo: R,
    pub audit: A,
}

impl<R: CredentialRepository, A: AuditLogRepository> DeleteCredentialUseCase<R, A> {
    pub async fn execute(
        &self,
        user_id: &str,
        kind: CredentialKind,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), VaultServiceError> {
        let deleted = self.repo.delete(user_id, id, kind).await?;
        if !deleted {
            return Err(VaultServiceError::CredentialNotFound);
        }
        record_audit(
            &self.audit,
            AuditEntry {
                id: Uuid::new_v4(),
                user_id: user_id.to_owned(),
                action: AuditAction::CredentialDeleted,
                detail: format!("{} {}", kind.as_str(), id),
                created_at: now,
            },
        )
        .await;
        Ok(())
    }
}
