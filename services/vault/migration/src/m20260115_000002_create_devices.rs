use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Devices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Devices::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Devices::UserId).string().not_null())
                    .col(ColumnDef::new(Devices::DeviceName).string())
                    .col(ColumnDef::new(Devices::Browser).string().not_null())
                    .col(ColumnDef::new(Devices::Os).string().not_null())
                    .col(ColumnDef::new(Devices::Source).string().not_null())
                    .col(
                        ColumnDef::new(Devices::LastActive)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Devices::SessionActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Devices::Table, Devices::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The natural key the upsert conflicts on.
        manager
            .create_index(
                Index::create()
                    .table(Devices::Table)
                    .col(Devices::UserId)
                    .col(Devices::Browser)
                    .col(Devices::Os)
                    .col(Devices::Source)
                    .unique()
                    .name("uq_devices_identity")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Devices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Devices {
    Table,
    Id,
    UserId,
    DeviceName,
    Browser,
    Os,
    Source,
    LastActive,
    SessionActive,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
