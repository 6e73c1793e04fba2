use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::repository::DeviceRepository;
use crate::domain::types::{Device, DeviceSource};
use crate::error::VaultServiceError;

// ── RegisterDevice ───────────────────────────────────────────────────────────

pub struct RegisterDeviceInput {
    pub device_name: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub source: Option<String>,
}

pub struct RegisterDeviceUseCase<D: DeviceRepository> {
    pub repo: D,
}

impl<D: DeviceRepository> RegisterDeviceUseCase<D> {
    pub async fn execute(
        &self,
        user_id: &str,
        input: RegisterDeviceInput,
        now: DateTime<Utc>,
    ) -> Result<Device, VaultServiceError> {
        let source = input
            .source
            .as_deref()
            .map(DeviceSource::from_str)
            .unwrap_or(DeviceSource::Unknown);
        let device = Device {
            id: Uuid::new_v4(),
            user_id: user_id.to_owned(),
            device_name: input.device_name,
            browser: input.browser.unwrap_or_else(|| "Unknown".to_owned()),
            os: input.os.unwrap_or_else(|| "Unknown".to_owned()),
            source,
            last_active: now,
            session_active: true,
        };
        self.repo.upsert(&device).await
    }
}

// ── ListDevices ──────────────────────────────────────────────────────────────

pub struct ListDevicesUseCase<D: DeviceRepository> {
    pub repo: D,
}

impl<D: DeviceRepository> ListDevicesUseCase<D> {
    pub async fn execute(&self, user_id: &str) -> Result<Vec<Device>, VaultServiceError> {
        self.repo.list_for_user(user_id).await
    }
}

// ── DeactivateDevice ─────────────────────────────────────────────────────────

pub struct DeactivateDeviceUseCase<D: DeviceRepository> {
    pub repo: D,
}

impl<D: DeviceRepository> DeactivateDeviceUseCase<D> {
    /// Idempotent: deactivating an already-inactive or unknown device is
    /// not an error.
    pub async fn execute(&self, user_id: &str, device_id: Uuid) -> Result<(), VaultServiceError> {
        let _ = self.repo.deactivate(user_id, device_id).await?;
        Ok(())
    }
}

// ── DeactivateAllDevices ─────────────────────────────────────────────────────

pub struct DeactivateAllDevicesUseCase<D: DeviceRepository> {
    pub repo: D,
}

impl<D: DeviceRepository> DeactivateAllDevicesUseCase<D> {
    pub async fn execute(&self, user_id: &str) -> Result<u64, VaultServiceError> {
        self.repo.deactivate_all(user_id).await
    }
}

// ── CleanupInactiveDevices ───────────────────────────────────────────────────

/// Scheduled maintenance: flip `session_active` off for devices idle longer
/// than the retention window. Never runs on the request path.
pub struct CleanupInactiveDevicesUseCase<D: DeviceRepository> {
    pub repo: D,
}

impl<D: DeviceRepository> CleanupInactiveDevicesUseCase<D> {
    pub async fn execute(
        &self,
        retention_days: i64,
        now: DateTime<Utc>,
    ) -> Result<u64, VaultServiceError> {
        let cutoff = now - Duration::days(retention_days);
        self.repo.cleanup_inactive(cutoff).await
    }
}
