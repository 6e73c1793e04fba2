pub mod auth;
pub mod credential;
pub mod device;
pub mod security;
pub mod settings;
pub mod share;
pub mod user;

use crate::domain::repository::AuditLogRepository;
use crate::domain::types::AuditEntry;

/// Write an audit row, swallowing failures. Audit is a side record and must
/// never fail the parent operation.
pub(crate) async fn record_audit<A: AuditLogRepository>(audit: &A, entry: AuditEntry) {
    if let Err(e) = audit.record(&entry).await {
        tracing::warn!(error = %e, action = entry.action.as_str(), "audit log write failed");
    }
}
