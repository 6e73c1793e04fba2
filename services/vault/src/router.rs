use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use lockbox_core::health::{healthz, readyz};
use lockbox_core::middleware::request_id_layer;

use crate::handlers::{
    credentials::{
        delete_key, delete_keys, delete_password, delete_passwords, get_keys, get_passwords,
        post_keys, post_passwords, put_key, put_password,
    },
    devices::{get_devices, post_devices},
    settings::{get_settings, post_settings, put_settings, validate_settings},
    share::post_share,
    token::store_token,
    users::search_users,
    webhook::identity_webhook,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Devices
        .route("/devices", get(get_devices))
        .route("/devices", post(post_devices))
        // Keys
        .route("/keys", get(get_keys))
        .route("/keys", post(post_keys))
        .route("/keys", delete(delete_keys))
        .route("/keys/{id}", put(put_key))
        .route("/keys/{id}", delete(delete_key))
        // Passwords
        .route("/passwords", get(get_passwords))
        .route("/passwords", post(post_passwords))
        .route("/passwords", delete(delete_passwords))
        .route("/passwords/{id}", put(put_password))
        .route("/passwords/{id}", delete(delete_password))
        // Settings
        .route("/settings", get(get_settings))
        .route("/settings", post(post_settings))
        .route("/settings", put(put_settings))
        .route("/settings/validate", post(validate_settings))
        // Sharing
        .route("/share", post(post_share))
        // User directory
        .route("/users/search", get(search_users))
        // Extension token provisioning
        .route("/auth/token", post(store_token))
        // Identity-provider events
        .route("/webhook/identity", post(identity_webhook))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
