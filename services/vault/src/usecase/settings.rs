use crate::domain::repository::SettingsRepository;
use crate::domain::types::{SessionSettings, Settings, SettingsPatch};
use crate::error::VaultServiceError;

// ── GetSettings ──────────────────────────────────────────────────────────────

pub struct GetSettingsUseCase<R: SettingsRepository> {
    pub repo: R,
}

impl<R: SettingsRepository> GetSettingsUseCase<R> {
    /// Absent settings are created lazily with defaults and persisted, so a
    /// first read and every later read see the same row.
    pub async fn execute(&self, user_id: &str) -> Result<Settings, VaultServiceError> {
        if let Some(settings) = self.repo.find(user_id).await? {
            return Ok(settings);
        }
        let defaults = Settings::default_for(user_id);
        self.repo.upsert(&defaults).await?;
        Ok(defaults)
    }
}

// ── WriteSettings ────────────────────────────────────────────────────────────

pub struct WriteSettingsInput {
    pub public_key: String,
    pub password: String,
    pub device_id: String,
    pub timestamp: i64,
    pub session_settings: Option<SessionSettings>,
}

pub struct WriteSettingsUseCase<R: SettingsRepository> {
    pub repo: R,
}

impl<R: SettingsRepository> WriteSettingsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: &str,
        input: WriteSettingsInput,
    ) -> Result<(), VaultServiceError> {
        for (field, value) in [
            ("publicKey", &input.public_key),
            ("password", &input.password),
            ("deviceId", &input.device_id),
        ] {
            if value.is_empty() {
                return Err(VaultServiceError::Validation(format!(
                    "{field} must not be empty"
                )));
            }
        }
        let settings = Settings {
            user_id: user_id.to_owned(),
            public_key: Some(input.public_key),
            password: Some(input.password),
            device_id: Some(input.device_id),
            timestamp: Some(input.timestamp),
            session_settings: input.session_settings.unwrap_or_default(),
        };
        self.repo.upsert(&settings).await
    }
}

// ── MergeSettings ────────────────────────────────────────────────────────────

pub struct MergeSettingsUseCase<R: SettingsRepository> {
    pub repo: R,
}

impl<R: SettingsRepository> MergeSettingsUseCase<R> {
    /// Partial update over an existing row. Unlike the full write, this
    /// requires the row to exist already.
    pub async fn execute(
        &self,
        user_id: &str,
        patch: SettingsPatch,
    ) -> Result<Settings, VaultServiceError> {
        let mut settings = self
            .repo
            .find(user_id)
            .await?
            .ok_or(VaultServiceError::SettingsNotFound)?;

        if let Some(public_key) = patch.public_key {
            settings.public_key = Some(public_key);
        }
        if let Some(password) = patch.password {
            settings.password = Some(password);
        }
        if let Some(device_id) = patch.device_id {
            settings.device_id = Some(device_id);
        }
        if let Some(timestamp) = patch.timestamp {
            settings.timestamp = Some(timestamp);
        }
        if let Some(session_settings) = patch.session_settings {
            settings.session_settings = session_settings;
        }

        self.repo.upsert(&settings).await?;
        Ok(settings)
    }
}

// ── ValidateUnlock ───────────────────────────────────────────────────────────

pub struct ValidateUnlockUseCase<R: SettingsRepository> {
    pub repo: R,
}

impl<R: SettingsRepository> ValidateUnlockUseCase<R> {
    /// Compare the presented unlock check value with the stored one. Both
    /// are client-side-derived; the comparison is exact string equality.
    pub async fn execute(
        &self,
        user_id: &str,
        presented: &str,
    ) -> Result<bool, VaultServiceError> {
        let settings = self
            .repo
            .find(user_id)
            .await?
            .ok_or(VaultServiceError::SettingsNotFound)?;
        let stored = settings
            .password
            .ok_or(VaultServiceError::SettingsNotFound)?;
        Ok(stored == presented)
    }
}
