/// Vault service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `VAULT_PORT`.
    pub vault_port: u16,
    /// Identity-provider endpoint for web session verification.
    pub session_verify_url: String,
    /// Shared secret for identity-provider webhook calls.
    pub webhook_secret: String,
    /// Days of inactivity before a device session is flipped inactive
    /// (default 30). Env var: `DEVICE_RETENTION_DAYS`.
    pub device_retention_days: i64,
}

impl VaultConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            vault_port: std::env::var("VAULT_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
            session_verify_url: std::env::var("SESSION_VERIFY_URL").expect("SESSION_VERIFY_URL"),
            webhook_secret: std::env::var("WEBHOOK_SECRET").expect("WEBHOOK_SECRET"),
            device_retention_days: std::env::var("DEVICE_RETENTION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}
