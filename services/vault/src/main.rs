use chrono::Utc;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use lockbox_vault::config::VaultConfig;
use lockbox_vault::infra::session::HttpSessionVerifier;
use lockbox_vault::router::build_router;
use lockbox_vault::state::AppState;
use lockbox_vault::usecase::device::CleanupInactiveDevicesUseCase;
use lockbox_vault_migration::Migrator;

#[tokio::main]
async fn main() {
    lockbox_core::tracing::init_tracing();

    let config = VaultConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    // Migrations run once before the listener binds, never on the request
    // path.
    Migrator::up(&db, None).await.expect("migration failed");

    let state = AppState {
        db,
        sessions: HttpSessionVerifier::new(config.session_verify_url.clone()),
        webhook_secret: config.webhook_secret.clone(),
    };

    // Periodic device maintenance: flip session_active off for devices idle
    // longer than the retention window.
    let cleanup_state = state.clone();
    let retention_days = config.device_retention_days;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(24 * 60 * 60));
        loop {
            interval.tick().await;
            let usecase = CleanupInactiveDevicesUseCase {
                repo: cleanup_state.device_repo(),
            };
            match usecase.execute(retention_days, Utc::now()).await {
                Ok(count) if count > 0 => info!(count, "deactivated stale devices"),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "device cleanup failed"),
            }
        }
    });

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.vault_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("vault service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
