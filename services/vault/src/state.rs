use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAuditLogRepository, DbCredentialRepository, DbDeviceRepository, DbSettingsRepository,
    DbUserRepository,
};
use crate::infra::session::HttpSessionVerifier;
use crate::usecase::auth::ValidateTokenUseCase;
use crate::usecase::security::SecurityGate;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sessions: HttpSessionVerifier,
    pub webhook_secret: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn device_repo(&self) -> DbDeviceRepository {
        DbDeviceRepository {
            db: self.db.clone(),
        }
    }

    pub fn credential_repo(&self) -> DbCredentialRepository {
        DbCredentialRepository {
            db: self.db.clone(),
        }
    }

    pub fn settings_repo(&self) -> DbSettingsRepository {
        DbSettingsRepository {
            db: self.db.clone(),
        }
    }

    pub fn audit_repo(&self) -> DbAuditLogRepository {
        DbAuditLogRepository {
            db: self.db.clone(),
        }
    }

    /// The auth gate used by every protected handler.
    pub fn security_gate(
        &self,
    ) -> SecurityGate<DbUserRepository, HttpSessionVerifier, DbDeviceRepository> {
        SecurityGate {
            validator: ValidateTokenUseCase {
                users: self.user_repo(),
                sessions: self.sessions.clone(),
                devices: self.device_repo(),
            },
        }
    }
}
