use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, OnConflict, extension::postgres::PgExpr},
};
use uuid::Uuid;

use lockbox_core::pagination::PageRequest;
use lockbox_vault_schema::{audit_logs, credentials, devices, settings, users};

use crate::domain::repository::{
    AuditLogRepository, CredentialRepository, DeviceRepository, SettingsRepository, UserRepository,
};
use crate::domain::types::{
    AuditEntry, Credential, CredentialKind, Device, DeviceSource, SessionSettings, Settings,
    StoredToken, User,
};
use crate::error::VaultServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, VaultServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, VaultServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn search_by_email(
        &self,
        caller_id: &str,
        fragment: &str,
        limit: u64,
    ) -> Result<Vec<User>, VaultServiceError> {
        let pattern = format!("%{fragment}%");
        let models = users::Entity::find()
            .filter(Expr::col(users::Column::Email).ilike(pattern))
            .filter(users::Column::Id.ne(caller_id))
            .order_by_asc(users::Column::Email)
            .limit(limit)
            .all(&self.db)
            .await
            .context("search users by email")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn upsert_profile(&self, user: &User) -> Result<(), VaultServiceError> {
        let model = users::ActiveModel {
            id: Set(user.id.clone()),
            email: Set(user.email.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            username: Set(user.username.clone()),
            image_url: Set(user.image_url.clone()),
            verification: Set(user.verification),
            encrypted_token: Set(None),
            token_expires_at: Set(None),
            created_at: Set(user.created_at),
            last_login: Set(user.last_login),
        };
        users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_columns([
                        users::Column::Email,
                        users::Column::FirstName,
                        users::Column::LastName,
                        users::Column::Username,
                        users::Column::ImageUrl,
                        users::Column::Verification,
                        users::Column::LastLogin,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert user profile")?;
        Ok(())
    }

    async fn store_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), VaultServiceError> {
        users::ActiveModel {
            id: Set(user_id.to_owned()),
            encrypted_token: Set(Some(token.to_owned())),
            token_expires_at: Set(Some(expires_at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("store user token")?;
        Ok(())
    }

    async fn get_token(&self, user_id: &str) -> Result<Option<StoredToken>, VaultServiceError> {
        let model = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("load user token")?;
        Ok(model.and_then(|m| {
            m.encrypted_token.zip(m.token_expires_at).map(|(token, expires_at)| StoredToken {
                token,
                expires_at,
            })
        }))
    }

    async fn delete_cascade(&self, user_id: &str) -> Result<(), VaultServiceError> {
        let user_id = user_id.to_owned();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    audit_logs::Entity::delete_many()
                        .filter(audit_logs::Column::UserId.eq(&user_id))
                        .exec(txn)
                        .await?;
                    credentials::Entity::delete_many()
                        .filter(credentials::Column::UserId.eq(&user_id))
                        .exec(txn)
                        .await?;
                    settings::Entity::delete_many()
                        .filter(settings::Column::UserId.eq(&user_id))
                        .exec(txn)
                        .await?;
                    devices::Entity::delete_many()
                        .filter(devices::Column::UserId.eq(&user_id))
                        .exec(txn)
                        .await?;
                    users::Entity::delete_by_id(&user_id).exec(txn).await?;
                    Ok(())
                })
            })
            .await
            .context("delete user cascade")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        username: model.username,
        image_url: model.image_url,
        verification: model.verification,
        created_at: model.created_at,
        last_login: model.last_login,
    }
}

// ── Device repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDeviceRepository {
    pub db: DatabaseConnection,
}

impl DeviceRepository for DbDeviceRepository {
    async fn upsert(&self, device: &Device) -> Result<Device, VaultServiceError> {
        let mut on_conflict = OnConflict::columns([
            devices::Column::UserId,
            devices::Column::Browser,
            devices::Column::Os,
            devices::Column::Source,
        ]);
        on_conflict.update_columns([devices::Column::LastActive, devices::Column::SessionActive]);
        // Coalesce semantics: only overwrite the stored name when the
        // caller supplied one.
        if device.device_name.is_some() {
            on_conflict.update_column(devices::Column::DeviceName);
        }

        let model = devices::ActiveModel {
            id: Set(device.id),
            user_id: Set(device.user_id.clone()),
            device_name: Set(device.device_name.clone()),
            browser: Set(device.browser.clone()),
            os: Set(device.os.clone()),
            source: Set(device.source.as_str().to_owned()),
            last_active: Set(device.last_active),
            session_active: Set(device.session_active),
        };
        let stored = devices::Entity::insert(model)
            .on_conflict(on_conflict)
            .exec_with_returning(&self.db)
            .await
            .context("upsert device")?;
        Ok(device_from_model(stored))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Device>, VaultServiceError> {
        let models = devices::Entity::find()
            .filter(devices::Column::UserId.eq(user_id))
            .order_by_desc(devices::Column::LastActive)
            .all(&self.db)
            .await
            .context("list devices")?;
        Ok(models.into_iter().map(device_from_model).collect())
    }

    async fn deactivate(
        &self,
        user_id: &str,
        device_id: Uuid,
    ) -> Result<bool, VaultServiceError> {
        let result = devices::Entity::update_many()
            .filter(devices::Column::Id.eq(device_id))
            .filter(devices::Column::UserId.eq(user_id))
            .col_expr(devices::Column::SessionActive, Expr::value(false))
            .exec(&self.db)
            .await
            .context("deactivate device")?;
        Ok(result.rows_affected > 0)
    }

    async fn deactivate_all(&self, user_id: &str) -> Result<u64, VaultServiceError> {
        let result = devices::Entity::update_many()
            .filter(devices::Column::UserId.eq(user_id))
            .col_expr(devices::Column::SessionActive, Expr::value(false))
            .exec(&self.db)
            .await
            .context("deactivate all devices")?;
        Ok(result.rows_affected)
    }

    async fn cleanup_inactive(&self, cutoff: DateTime<Utc>) -> Result<u64, VaultServiceError> {
        let result = devices::Entity::update_many()
            .filter(devices::Column::SessionActive.eq(true))
            .filter(devices::Column::LastActive.lt(cutoff))
            .col_expr(devices::Column::SessionActive, Expr::value(false))
            .exec(&self.db)
            .await
            .context("cleanup inactive devices")?;
        Ok(result.rows_affected)
    }
}

fn device_from_model(model: devices::Model) -> Device {
    Device {
        id: model.id,
        user_id: model.user_id,
        device_name: model.device_name,
        browser: model.browser,
        os: model.os,
        source: DeviceSource::from_str(&model.source),
        last_active: model.last_active,
        session_active: model.session_active,
    }
}

// ── Credential repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCredentialRepository {
    pub db: DatabaseConnection,
}

impl CredentialRepository for DbCredentialRepository {
    async fn find(
        &self,
        user_id: &str,
        id: &str,
        kind: CredentialKind,
    ) -> Result<Option<Credential>, VaultServiceError> {
        let model = credentials::Entity::find_by_id((
            id.to_owned(),
            user_id.to_owned(),
            kind.as_str().to_owned(),
        ))
        .one(&self.db)
        .await
        .context("find credential")?;
        model.map(credential_from_model).transpose()
    }

    async fn create(&self, credential: &Credential) -> Result<(), VaultServiceError> {
        credential_to_active_model(credential)
            .insert(&self.db)
            .await
            .context("create credential")?;
        Ok(())
    }

    async fn list(
        &self,
        user_id: &str,
        kind: CredentialKind,
    ) -> Result<Vec<Credential>, VaultServiceError> {
        let models = credentials::Entity::find()
            .filter(credentials::Column::UserId.eq(user_id))
            .filter(credentials::Column::Kind.eq(kind.as_str()))
            .order_by_desc(credentials::Column::ModifiedAt)
            .all(&self.db)
            .await
            .context("list credentials")?;
        models.into_iter().map(credential_from_model).collect()
    }

    async fn list_page(
        &self,
        user_id: &str,
        kind: CredentialKind,
        page: PageRequest,
    ) -> Result<(Vec<Credential>, u64), VaultServiceError> {
        let PageRequest { per_page, page } = page;
        let filtered = credentials::Entity::find()
            .filter(credentials::Column::UserId.eq(user_id))
            .filter(credentials::Column::Kind.eq(kind.as_str()));
        let total = filtered
            .clone()
            .count(&self.db)
            .await
            .context("count credentials")?;
        let models = filtered
            .order_by_desc(credentials::Column::ModifiedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list credential page")?;
        let items = models
            .into_iter()
            .map(credential_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn update(&self, credential: &Credential) -> Result<(), VaultServiceError> {
        credential_to_active_model(credential)
            .update(&self.db)
            .await
            .context("update credential")?;
        Ok(())
    }

    async fn delete(
        &self,
        user_id: &str,
        id: &str,
        kind: CredentialKind,
    ) -> Result<bool, VaultServiceError> {
        let result = credentials::Entity::delete_many()
            .filter(credentials::Column::Id.eq(id))
            .filter(credentials::Column::UserId.eq(user_id))
            .filter(credentials::Column::Kind.eq(kind.as_str()))
            .exec(&self.db)
            .await
            .context("delete credential")?;
        Ok(result.rows_affected > 0)
    }

    async fn find_shared(
        &self,
        recipient_id: &str,
        website: &str,
        username: &str,
        owner_id: &str,
        kind: CredentialKind,
    ) -> Result<Option<Credential>, VaultServiceError> {
        let model = credentials::Entity::find()
            .filter(credentials::Column::UserId.eq(recipient_id))
            .filter(credentials::Column::Website.eq(website))
            .filter(credentials::Column::Username.eq(username))
            .filter(credentials::Column::OwnerId.eq(owner_id))
            .filter(credentials::Column::Kind.eq(kind.as_str()))
            .one(&self.db)
            .await
            .context("find shared credential")?;
        model.map(credential_from_model).transpose()
    }
}

fn credential_to_active_model(credential: &Credential) -> credentials::ActiveModel {
    credentials::ActiveModel {
        id: Set(credential.id.clone()),
        user_id: Set(credential.user_id.clone()),
        kind: Set(credential.kind.as_str().to_owned()),
        website: Set(credential.website.clone()),
        username: Set(credential.username.clone()),
        encrypted_password: Set(credential.ciphertext.clone()),
        owner_id: Set(credential.owner_id.clone()),
        owner_email: Set(credential.owner_email.clone()),
        version: Set(credential.version),
        created_at: Set(credential.created_at),
        modified_at: Set(credential.modified_at),
        last_accessed: Set(credential.last_accessed),
    }
}

fn credential_from_model(model: credentials::Model) -> Result<Credential, VaultServiceError> {
    let kind = CredentialKind::from_str(&model.kind)
        .ok_or_else(|| anyhow::anyhow!("unknown credential kind: {}", model.kind))?;
    Ok(Credential {
        id: model.id,
        user_id: model.user_id,
        kind,
        website: model.website,
        username: model.username,
        ciphertext: model.encrypted_password,
        owner_id: model.owner_id,
        owner_email: model.owner_email,
        version: model.version,
        created_at: model.created_at,
        modified_at: model.modified_at,
        last_accessed: model.last_accessed,
    })
}

// ── Settings repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSettingsRepository {
    pub db: DatabaseConnection,
}

impl SettingsRepository for DbSettingsRepository {
    async fn find(&self, user_id: &str) -> Result<Option<Settings>, VaultServiceError> {
        let model = settings::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find settings")?;
        Ok(model.map(settings_from_model))
    }

    async fn upsert(&self, row: &Settings) -> Result<(), VaultServiceError> {
        let session_settings =
            serde_json::to_value(&row.session_settings).context("serialize session settings")?;
        let model = settings::ActiveModel {
            user_id: Set(row.user_id.clone()),
            public_key: Set(row.public_key.clone()),
            password: Set(row.password.clone()),
            device_id: Set(row.device_id.clone()),
            timestamp: Set(row.timestamp),
            session_settings: Set(session_settings),
        };
        settings::Entity::insert(model)
            .on_conflict(
                OnConflict::column(settings::Column::UserId)
                    .update_columns([
                        settings::Column::PublicKey,
                        settings::Column::Password,
                        settings::Column::DeviceId,
                        settings::Column::Timestamp,
                        settings::Column::SessionSettings,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert settings")?;
        Ok(())
    }
}

fn settings_from_model(model: settings::Model) -> Settings {
    // Tolerant read: an unreadable JSON document falls back to defaults
    // rather than failing every settings read.
    let session_settings: SessionSettings =
        serde_json::from_value(model.session_settings).unwrap_or_default();
    Settings {
        user_id: model.user_id,
        public_key: model.public_key,
        password: model.password,
        device_id: model.device_id,
        timestamp: model.timestamp,
        session_settings,
    }
}

// ── Audit log repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAuditLogRepository {
    pub db: DatabaseConnection,
}

impl AuditLogRepository for DbAuditLogRepository {
    async fn record(&self, entry: &AuditEntry) -> Result<(), VaultServiceError> {
        audit_logs::ActiveModel {
            id: Set(entry.id),
            user_id: Set(entry.user_id.clone()),
            action: Set(entry.action.as_str().to_owned()),
            detail: Set(entry.detail.clone()),
            created_at: Set(entry.created_at),
        }
        .insert(&self.db)
        .await
        .context("record audit entry")?;
        Ok(())
    }
}
