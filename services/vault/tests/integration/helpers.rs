use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use lockbox_core::pagination::PageRequest;
use lockbox_vault::domain::repository::{
    AuditLogRepository, CredentialRepository, DeviceRepository, SessionPort, SettingsRepository,
    UserRepository,
};
use lockbox_vault::domain::types::{
    AuditEntry, Credential, CredentialKind, Device, Settings, StoredToken, User,
};
use lockbox_vault::error::VaultServiceError;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    pub tokens: Arc<Mutex<Vec<(String, StoredToken)>>>,
    pub deleted: Arc<Mutex<Vec<String>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            tokens: Arc::new(Mutex::new(vec![])),
            deleted: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn with_token(self, user_id: &str, token: &str, expires_at: DateTime<Utc>) -> Self {
        self.tokens.lock().unwrap().push((
            user_id.to_owned(),
            StoredToken {
                token: token.to_owned(),
                expires_at,
            },
        ));
        self
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }

    pub fn tokens_handle(&self) -> Arc<Mutex<Vec<(String, StoredToken)>>> {
        Arc::clone(&self.tokens)
    }

    pub fn deleted_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.deleted)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, VaultServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, VaultServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn search_by_email(
        &self,
        caller_id: &str,
        fragment: &str,
        limit: u64,
    ) -> Result<Vec<User>, VaultServiceError> {
        let fragment = fragment.to_ascii_lowercase();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.id != caller_id && u.email.to_ascii_lowercase().contains(&fragment))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn upsert_profile(&self, user: &User) -> Result<(), VaultServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
            *existing = user.clone();
        } else {
            users.push(user.clone());
        }
        Ok(())
    }

    async fn store_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), VaultServiceError> {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.retain(|(id, _)| id != user_id);
        tokens.push((
            user_id.to_owned(),
            StoredToken {
                token: token.to_owned(),
                expires_at,
            },
        ));
        Ok(())
    }

    async fn get_token(&self, user_id: &str) -> Result<Option<StoredToken>, VaultServiceError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| id == user_id)
            .map(|(_, t)| t.clone()))
    }

    async fn delete_cascade(&self, user_id: &str) -> Result<(), VaultServiceError> {
        self.users.lock().unwrap().retain(|u| u.id != user_id);
        self.tokens.lock().unwrap().retain(|(id, _)| id != user_id);
        self.deleted.lock().unwrap().push(user_id.to_owned());
        Ok(())
    }
}

// ── MockDeviceRepo ───────────────────────────────────────────────────────────

pub struct MockDeviceRepo {
    pub devices: Arc<Mutex<Vec<Device>>>,
}

impl MockDeviceRepo {
    pub fn empty() -> Self {
        Self {
            devices: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Returns a shared handle to the device list for post-execution inspection.
    pub fn devices_handle(&self) -> Arc<Mutex<Vec<Device>>> {
        Arc::clone(&self.devices)
    }
}

impl DeviceRepository for MockDeviceRepo {
    async fn upsert(&self, device: &Device) -> Result<Device, VaultServiceError> {
        let mut devices = self.devices.lock().unwrap();
        if let Some(existing) = devices.iter_mut().find(|d| {
            d.user_id == device.user_id
                && d.browser == device.browser
                && d.os == device.os
                && d.source == device.source
        }) {
            existing.last_active = device.last_active;
            existing.session_active = device.session_active;
            if device.device_name.is_some() {
                existing.device_name = device.device_name.clone();
            }
            Ok(existing.clone())
        } else {
            devices.push(device.clone());
            Ok(device.clone())
        }
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Device>, VaultServiceError> {
        Ok(self
            .devices
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn deactivate(
        &self,
        user_id: &str,
        device_id: Uuid,
    ) -> Result<bool, VaultServiceError> {
        let mut devices = self.devices.lock().unwrap();
        match devices
            .iter_mut()
            .find(|d| d.id == device_id && d.user_id == user_id)
        {
            Some(d) => {
                d.session_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn deactivate_all(&self, user_id: &str) -> Result<u64, VaultServiceError> {
        let mut count = 0;
        for d in self.devices.lock().unwrap().iter_mut() {
            if d.user_id == user_id && d.session_active {
                d.session_active = false;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn cleanup_inactive(&self, cutoff: DateTime<Utc>) -> Result<u64, VaultServiceError> {
        let mut count = 0;
        for d in self.devices.lock().unwrap().iter_mut() {
            if d.session_active && d.last_active < cutoff {
                d.session_active = false;
                count += 1;
            }
        }
        Ok(count)
    }
}

// ── MockCredentialRepo ───────────────────────────────────────────────────────

pub struct MockCredentialRepo {
    pub credentials: Arc<Mutex<Vec<Credential>>>,
}

impl MockCredentialRepo {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            credentials: Arc::new(Mutex::new(credentials)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn credentials_handle(&self) -> Arc<Mutex<Vec<Credential>>> {
        Arc::clone(&self.credentials)
    }
}

impl CredentialRepository for MockCredentialRepo {
    async fn find(
        &self,
        user_id: &str,
        id: &str,
        kind: CredentialKind,
    ) -> Result<Option<Credential>, VaultServiceError> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id && c.user_id == user_id && c.kind == kind)
            .cloned())
    }

    async fn create(&self, credential: &Credential) -> Result<(), VaultServiceError> {
        self.credentials.lock().unwrap().push(credential.clone());
        Ok(())
    }

    async fn list(
        &self,
        user_id: &str,
        kind: CredentialKind,
    ) -> Result<Vec<Credential>, VaultServiceError> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id && c.kind == kind)
            .cloned()
            .collect())
    }

    async fn list_page(
        &self,
        user_id: &str,
        kind: CredentialKind,
        page: PageRequest,
    ) -> Result<(Vec<Credential>, u64), VaultServiceError> {
        let all = self.list(user_id, kind).await?;
        let total = all.len() as u64;
        let start = ((page.page - 1) * page.per_page) as usize;
        let items = all
            .into_iter()
            .skip(start)
            .take(page.per_page as usize)
            .collect();
        Ok((items, total))
    }

    async fn update(&self, credential: &Credential) -> Result<(), VaultServiceError> {
        let mut credentials = self.credentials.lock().unwrap();
        if let Some(existing) = credentials.iter_mut().find(|c| {
            c.id == credential.id && c.user_id == credential.user_id && c.kind == credential.kind
        }) {
            *existing = credential.clone();
        }
        Ok(())
    }

    async fn delete(
        &self,
        user_id: &str,
        id: &str,
        kind: CredentialKind,
    ) -> Result<bool, VaultServiceError> {
        let mut credentials = self.credentials.lock().unwrap();
        let before = credentials.len();
        credentials.retain(|c| !(c.id == id && c.user_id == user_id && c.kind == kind));
        Ok(credentials.len() < before)
    }

    async fn find_shared(
        &self,
        recipient_id: &str,
        website: &str,
        username: &str,
        owner_id: &str,
        kind: CredentialKind,
    ) -> Result<Option<Credential>, VaultServiceError> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .iter()
            .find(|c| {
                c.user_id == recipient_id
                    && c.website == website
                    && c.username == username
                    && c.owner_id.as_deref() == Some(owner_id)
                    && c.kind == kind
            })
            .cloned())
    }
}

// ── MockSettingsRepo ─────────────────────────────────────────────────────────

pub struct MockSettingsRepo {
    pub settings: Arc<Mutex<Vec<Settings>>>,
}

impl MockSettingsRepo {
    pub fn new(settings: Vec<Settings>) -> Self {
        Self {
            settings: Arc::new(Mutex::new(settings)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn settings_handle(&self) -> Arc<Mutex<Vec<Settings>>> {
        Arc::clone(&self.settings)
    }
}

impl SettingsRepository for MockSettingsRepo {
    async fn find(&self, user_id: &str) -> Result<Option<Settings>, VaultServiceError> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn upsert(&self, row: &Settings) -> Result<(), VaultServiceError> {
        let mut settings = self.settings.lock().unwrap();
        if let Some(existing) = settings.iter_mut().find(|s| s.user_id == row.user_id) {
            *existing = row.clone();
        } else {
            settings.push(row.clone());
        }
        Ok(())
    }
}

// ── MockAuditRepo ────────────────────────────────────────────────────────────

pub struct MockAuditRepo {
    pub entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MockAuditRepo {
    pub fn empty() -> Self {
        Self {
            entries: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn entries_handle(&self) -> Arc<Mutex<Vec<AuditEntry>>> {
        Arc::clone(&self.entries)
    }
}

impl AuditLogRepository for MockAuditRepo {
    async fn record(&self, entry: &AuditEntry) -> Result<(), VaultServiceError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

// ── MockSessionPort ──────────────────────────────────────────────────────────

/// Session verifier resolving a fixed (token, subject) pair.
pub struct MockSessionPort {
    pub token: String,
    pub subject: String,
}

impl MockSessionPort {
    pub fn new(token: &str, subject: &str) -> Self {
        Self {
            token: token.to_owned(),
            subject: subject.to_owned(),
        }
    }

    /// A verifier that rejects everything.
    pub fn rejecting() -> Self {
        Self::new("", "")
    }
}

impl SessionPort for MockSessionPort {
    async fn subject(&self, token: &str) -> Result<Option<String>, VaultServiceError> {
        if !self.token.is_empty() && token == self.token {
            Ok(Some(self.subject.clone()))
        } else {
            Ok(None)
        }
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_user(id: &str, email: &str) -> User {
    User {
        id: id.to_owned(),
        email: email.to_owned(),
        first_name: None,
        last_name: None,
        username: Some("tester".to_owned()),
        image_url: None,
        verification: true,
        created_at: Utc::now(),
        last_login: None,
    }
}

pub fn test_credential(user_id: &str, id: &str, kind: CredentialKind) -> Credential {
    let now = Utc::now();
    Credential {
        id: id.to_owned(),
        user_id: user_id.to_owned(),
        kind,
        website: "example.com".to_owned(),
        username: "alice".to_owned(),
        ciphertext: "ct1".to_owned(),
        owner_id: None,
        owner_email: None,
        version: 1,
        created_at: now,
        modified_at: now,
        last_accessed: now,
    }
}
