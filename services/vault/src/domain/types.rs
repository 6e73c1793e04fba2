use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User record mirrored from the identity provider. Ids are opaque strings
/// assigned by the provider, not UUIDs.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub image_url: Option<String>,
    pub verification: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Encrypted extension token stored for a user.
#[derive(Debug, Clone)]
pub struct StoredToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Which kind of client presented the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    Web,
    Extension,
}

impl ClientType {
    /// Parse the `X-Request-Source` header. Anything other than an explicit
    /// `web` is treated as an extension client, since a bearer token was
    /// presented either way.
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some("web") => Self::Web,
            _ => Self::Extension,
        }
    }
}

/// Where a device row originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSource {
    Web,
    Extension,
    Unknown,
}

impl DeviceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Extension => "extension",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "web" => Self::Web,
            "extension" => Self::Extension,
            _ => Self::Unknown,
        }
    }
}

impl From<ClientType> for DeviceSource {
    fn from(client: ClientType) -> Self {
        match client {
            ClientType::Web => Self::Web,
            ClientType::Extension => Self::Extension,
        }
    }
}

/// Known client device, keyed naturally by (user, browser, os, source).
#[derive(Debug, Clone)]
pub struct Device {
    pub id: Uuid,
    pub user_id: String,
    pub device_name: Option<String>,
    pub browser: String,
    pub os: String,
    pub source: DeviceSource,
    pub last_active: DateTime<Utc>,
    pub session_active: bool,
}

/// Browser/OS hints extracted from request headers for device tracking.
#[derive(Debug, Clone, Default)]
pub struct DeviceHints {
    pub browser: Option<String>,
    pub os: Option<String>,
    pub device_name: Option<String>,
}

/// Discriminator between the two credential surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Key,
    Password,
}

impl CredentialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Password => "password",
        }
    }

    /// Plural label used in share confirmation messages.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Key => "keys",
            Self::Password => "passwords",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "key" | "keys" => Some(Self::Key),
            "password" | "passwords" => Some(Self::Password),
            _ => None,
        }
    }
}

/// Encrypted credential record. The payload is opaque ciphertext; the
/// backend never sees plaintext.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: String,
    pub user_id: String,
    pub kind: CredentialKind,
    pub website: String,
    pub username: String,
    pub ciphertext: String,
    pub owner_id: Option<String>,
    pub owner_email: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

/// Partial update for a credential. Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct CredentialPatch {
    pub website: Option<String>,
    pub username: Option<String>,
    pub ciphertext: Option<String>,
}

/// Session behavior knobs stored as a JSON column on settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettings {
    #[serde(default = "default_auto_lock")]
    pub auto_lock_minutes: u32,
    #[serde(default = "default_session_duration")]
    pub session_duration_minutes: u32,
    #[serde(default)]
    pub biometric_enabled: bool,
    #[serde(default)]
    pub biometric_type: Option<String>,
}

fn default_auto_lock() -> u32 {
    5
}

fn default_session_duration() -> u32 {
    30
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            auto_lock_minutes: default_auto_lock(),
            session_duration_minutes: default_session_duration(),
            biometric_enabled: false,
            biometric_type: None,
        }
    }
}

/// Per-user sync settings. `password` is a client-side-derived unlock check
/// value, compared byte-for-byte and never interpreted.
#[derive(Debug, Clone)]
pub struct Settings {
    pub user_id: String,
    pub public_key: Option<String>,
    pub password: Option<String>,
    pub device_id: Option<String>,
    pub timestamp: Option<i64>,
    pub session_settings: SessionSettings,
}

impl Settings {
    pub fn default_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_owned(),
            public_key: None,
            password: None,
            device_id: None,
            timestamp: None,
            session_settings: SessionSettings::default(),
        }
    }
}

/// Partial update for settings. Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub public_key: Option<String>,
    pub password: Option<String>,
    pub device_id: Option<String>,
    pub timestamp: Option<i64>,
    pub session_settings: Option<SessionSettings>,
}

/// Sensitive operations recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    CredentialCreated,
    CredentialUpdated,
    CredentialDeleted,
    CredentialShared,
    TokenStored,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CredentialCreated => "credential_created",
            Self::CredentialUpdated => "credential_updated",
            Self::CredentialDeleted => "credential_deleted",
            Self::CredentialShared => "credential_shared",
            Self::TokenStored => "token_stored",
        }
    }
}

/// One audit log row.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: Uuid,
    pub user_id: String,
    pub action: AuditAction,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub client_type: ClientType,
}

/// Strip a case-insensitive `Bearer ` prefix and surrounding whitespace.
pub fn strip_bearer(raw: &str) -> &str {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("bearer") {
        if rest.starts_with(' ') {
            return trimmed[6..].trim();
        }
    }
    trimmed
}
