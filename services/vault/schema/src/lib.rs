//! sea-orm entities for the vault service database.

pub mod audit_logs;
pub mod credentials;
pub mod devices;
pub mod settings;
pub mod users;
