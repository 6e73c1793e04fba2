use sea_orm_migration::prelude::*;

mod m20260115_000001_create_users;
mod m20260115_000002_create_devices;
mod m20260115_000003_create_credentials;
mod m20260115_000004_create_settings;
mod m20260115_000005_create_audit_logs;
mod m20260115_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000001_create_users::Migration),
            Box::new(m20260115_000002_create_devices::Migration),
            Box::new(m20260115_000003_create_credentials::Migration),
            Box::new(m20260115_000004_create_settings::Migration),
            Box::new(m20260115_000005_create_audit_logs::Migration),
            Box::new(m20260115_000006_add_indexes::Migration),
        ]
    }
}
