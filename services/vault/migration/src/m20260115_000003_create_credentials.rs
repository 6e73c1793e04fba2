use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Credentials::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Credentials::Id).string().not_null())
                    .col(ColumnDef::new(Credentials::UserId).string().not_null())
                    .col(ColumnDef::new(Credentials::Kind).string().not_null())
                    .col(ColumnDef::new(Credentials::Website).string().not_null())
                    .col(ColumnDef::new(Credentials::Username).string().not_null())
                    .col(
                        ColumnDef::new(Credentials::EncryptedPassword)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Credentials::OwnerId).string())
                    .col(ColumnDef::new(Credentials::OwnerEmail).string())
                    .col(
                        ColumnDef::new(Credentials::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Credentials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Credentials::ModifiedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Credentials::LastAccessed)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(Credentials::Id)
                            .col(Credentials::UserId)
                            .col(Credentials::Kind),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Credentials::Table, Credentials::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Credentials::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Credentials {
    Table,
    Id,
    UserId,
    Kind,
    Website,
    Username,
    EncryptedPassword,
    OwnerId,
    OwnerEmail,
    Version,
    CreatedAt,
    ModifiedAt,
    LastAccessed,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
