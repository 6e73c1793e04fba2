use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Devices::Table)
                    .col(Devices::UserId)
                    .name("idx_devices_user_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Credentials::Table)
                    .col(Credentials::UserId)
                    .col(Credentials::Kind)
                    .name("idx_credentials_user_id_kind")
                    .to_owned(),
            )
            .await?;
        // Lookup used by sharing: existing copy under the recipient.
        manager
            .create_index(
                Index::create()
                    .table(Credentials::Table)
                    .col(Credentials::UserId)
                    .col(Credentials::Website)
                    .col(Credentials::Username)
                    .col(Credentials::OwnerId)
                    .name("idx_credentials_share_lookup")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(AuditLogs::Table)
                    .col(AuditLogs::UserId)
                    .name("idx_audit_logs_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_audit_logs_user_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_credentials_share_lookup").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_credentials_user_id_kind")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_devices_user_id").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Devices {
    Table,
    UserId,
}

#[derive(Iden)]
enum Credentials {
    Table,
    UserId,
    Kind,
    Website,
    Username,
    OwnerId,
}

#[derive(Iden)]
enum AuditLogs {
    Table,
    UserId,
}
