#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use lockbox_core::pagination::PageRequest;

use crate::domain::types::{
    AuditEntry, Credential, CredentialKind, Device, Settings, StoredToken, User,
};
use crate::error::VaultServiceError;

/// Repository for user records and their stored extension tokens.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, VaultServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, VaultServiceError>;

    /// Case-insensitive email substring search, excluding `caller_id`,
    /// capped at `limit` rows.
    async fn search_by_email(
        &self,
        caller_id: &str,
        fragment: &str,
        limit: u64,
    ) -> Result<Vec<User>, VaultServiceError>;

    /// Insert or refresh a user record keyed by id.
    async fn upsert_profile(&self, user: &User) -> Result<(), VaultServiceError>;

    async fn store_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), VaultServiceError>;

    async fn get_token(&self, user_id: &str) -> Result<Option<StoredToken>, VaultServiceError>;

    /// Delete the user and every dependent row in one transaction.
    async fn delete_cascade(&self, user_id: &str) -> Result<(), VaultServiceError>;
}

/// Repository for known client devices.
pub trait DeviceRepository: Send + Sync {
    /// Upsert on the natural key (user_id, browser, os, source), returning
    /// the stored row. A supplied `device_name` overwrites the stored one;
    /// `None` keeps it.
    async fn upsert(&self, device: &Device) -> Result<Device, VaultServiceError>;

    /// Devices for a user, most recently active first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Device>, VaultServiceError>;

    /// Flip `session_active` off. Returns `true` if a row was changed.
    async fn deactivate(&self, user_id: &str, device_id: Uuid)
    -> Result<bool, VaultServiceError>;

    /// Flip `session_active` off for every device of the user. Returns the
    /// number of rows changed.
    async fn deactivate_all(&self, user_id: &str) -> Result<u64, VaultServiceError>;

    /// Flip `session_active` off for active devices not seen since `cutoff`.
    /// Returns the number of rows changed.
    async fn cleanup_inactive(&self, cutoff: DateTime<Utc>) -> Result<u64, VaultServiceError>;
}

/// Repository for encrypted credential records.
pub trait CredentialRepository: Send + Sync {
    async fn find(
        &self,
        user_id: &str,
        id: &str,
        kind: CredentialKind,
    ) -> Result<Option<Credential>, VaultServiceError>;

    /// Strict insert. The usecase checks for an existing row first.
    async fn create(&self, credential: &Credential) -> Result<(), VaultServiceError>;

    /// All credentials of a kind for a user, most recently modified first.
    async fn list(
        &self,
        user_id: &str,
        kind: CredentialKind,
    ) -> Result<Vec<Credential>, VaultServiceError>;

    /// One page of credentials plus the total count.
    async fn list_page(
        &self,
        user_id: &str,
        kind: CredentialKind,
        page: PageRequest,
    ) -> Result<(Vec<Credential>, u64), VaultServiceError>;

    /// Full-row update keyed by (id, user_id, kind).
    async fn update(&self, credential: &Credential) -> Result<(), VaultServiceError>;

    /// Delete a credential. Returns `true` if a row was deleted.
    async fn delete(
        &self,
        user_id: &str,
        id: &str,
        kind: CredentialKind,
    ) -> Result<bool, VaultServiceError>;

    /// Existing shared copy under the recipient for the same logical item.
    async fn find_shared(
        &self,
        recipient_id: &str,
        website: &str,
        username: &str,
        owner_id: &str,
        kind: CredentialKind,
    ) -> Result<Option<Credential>, VaultServiceError>;
}

/// Repository for per-user sync settings.
pub trait SettingsRepository: Send + Sync {
    async fn find(&self, user_id: &str) -> Result<Option<Settings>, VaultServiceError>;

    /// Insert or replace the settings row keyed by user_id.
    async fn upsert(&self, settings: &Settings) -> Result<(), VaultServiceError>;
}

/// Append-only audit log sink.
pub trait AuditLogRepository: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> Result<(), VaultServiceError>;
}

/// Port for verifying web session tokens against the identity provider.
pub trait SessionPort: Send + Sync {
    /// Resolve the subject (user id) of a session token, or `None` if the
    /// token is not a valid session.
    async fn subject(&self, token: &str) -> Result<Option<String>, VaultServiceError>;
}
