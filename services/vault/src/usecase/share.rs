use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::repository::{
    AuditLogRepository, CredentialRepository, SettingsRepository, UserRepository,
};
use crate::domain::types::{AuditAction, AuditEntry, Credential, CredentialKind};
use crate::error::VaultServiceError;
use crate::usecase::record_audit;

/// One credential payload to copy into the recipient's store, already
/// re-encrypted by the client for the recipient's public key.
pub struct ShareItem {
    pub website: String,
    pub username: String,
    pub ciphertext: String,
}

pub struct ShareCredentialsInput {
    pub recipient_email: String,
    pub kind: CredentialKind,
    pub items: Vec<ShareItem>,
}

/// Copy encrypted records into another user's store, merging onto any
/// existing copy of the same logical item. All-or-nothing: the first
/// failing item aborts the call.
pub struct ShareCredentialsUseCase<U, S, C, A> {
    pub users: U,
    pub settings: S,
    pub credentials: C,
    pub audit: A,
}

impl<U, S, C, A> ShareCredentialsUseCase<U, S, C, A>
where
    U: UserRepository,
    S: SettingsRepository,
    C: CredentialRepository,
    A: AuditLogRepository,
{
    pub async fn execute(
        &self,
        owner_id: &str,
        input: ShareCredentialsInput,
        now: DateTime<Utc>,
    ) -> Result<String, VaultServiceError> {
        if input.recipient_email.is_empty() || input.items.is_empty() {
            return Err(VaultServiceError::MissingData);
        }

        let recipient = self
            .users
            .find_by_email(&input.recipient_email)
            .await?
            .ok_or(VaultServiceError::RecipientNotFound)?;

        // The caller must have been able to encrypt for the recipient.
        let has_key = self
            .settings
            .find(&recipient.id)
            .await?
            .and_then(|s| s.public_key)
            .is_some_and(|k| !k.is_empty());
        if !has_key {
            return Err(VaultServiceError::RecipientHasNoKey);
        }

        let owner = self
            .users
            .find_by_id(owner_id)
            .await?
            .ok_or(VaultServiceError::UserNotFound)?;

        let count = input.items.len();
        for item in input.items {
            self.share_one(&recipient.id, owner_id, &owner.email, item, input.kind, now)
                .await?;
        }

        record_audit(
            &self.audit,
            AuditEntry {
                id: Uuid::new_v4(),
                user_id: owner_id.to_owned(),
                action: AuditAction::CredentialShared,
                detail: format!("{count} {} to {}", input.kind.plural(), recipient.id),
                created_at: now,
            },
        )
        .await;

        Ok(format!(
            "shared {count} {} with {}",
            input.kind.plural(),
            input.recipient_email
        ))
    }

    /// Merge-or-insert for a single item: an existing copy of the same
    /// logical item under the recipient is refreshed, never duplicated.
    async fn share_one(
        &self,
        recipient_id: &str,
        owner_id: &str,
        owner_email: &str,
        item: ShareItem,
        kind: CredentialKind,
        now: DateTime<Utc>,
    ) -> Result<(), VaultServiceError> {
        let existing = self
            .credentials
            .find_shared(recipient_id, &item.website, &item.username, owner_id, kind)
            .await?;

        match existing {
            Some(mut credential) => {
                credential.ciphertext = item.ciphertext;
                credential.version += 1;
                credential.modified_at = now;
                credential.last_accessed = now;
                self.credentials.update(&credential).await
            }
            None => {
                let credential = Credential {
                    id: Uuid::new_v4().to_string(),
                    user_id: recipient_id.to_owned(),
                    kind,
                    website: item.website,
                    username: item.username,
                    ciphertext: item.ciphertext,
                    owner_id: Some(owner_id.to_owned()),
                    owner_email: Some(owner_email.to_owned()),
                    version: 1,
                    created_at: now,
                    modified_at: now,
                    last_accessed: now,
                };
                self.credentials.create(&credential).await
            }
        }
    }
}
