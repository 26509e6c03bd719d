//! Create mod log table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModLog::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ModLog::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ModLog::UserUsername).string_len(128))
                    .col(ColumnDef::new(ModLog::ObjectUid).big_integer())
                    .col(ColumnDef::new(ModLog::ObjectId).big_integer())
                    .col(ColumnDef::new(ModLog::ObjectType).string_len(128))
                    .col(ColumnDef::new(ModLog::Action).string_len(128).not_null())
                    .col(ColumnDef::new(ModLog::Message).text())
                    .col(ColumnDef::new(ModLog::Metadata).json_binary())
                    .col(
                        ColumnDef::new(ModLog::AccessLevel)
                            .string_len(32)
                            .not_null()
                            .default("admin"),
                    )
                    .col(
                        ColumnDef::new(ModLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ModLog::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ModLog::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mod_log_user")
                            .from(ModLog::Table, ModLog::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ModLog {
    Table,
    Id,
    UserId,
    UserUsername,
    ObjectUid,
    ObjectId,
    ObjectType,
    Action,
    Message,
    Metadata,
    AccessLevel,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
