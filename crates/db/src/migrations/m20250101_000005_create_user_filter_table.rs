//! Create user filter table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserFilter::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserFilter::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserFilter::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(UserFilter::FilterableId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserFilter::FilterableType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserFilter::FilterType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserFilter::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_filter_user")
                            .from(UserFilter::Table, UserFilter::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index over all four columns - one filter of a kind per target
        manager
            .create_index(
                Index::create()
                    .name("idx_user_filter_unique")
                    .table(UserFilter::Table)
                    .col(UserFilter::UserId)
                    .col(UserFilter::FilterableId)
                    .col(UserFilter::FilterableType)
                    .col(UserFilter::FilterType)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserFilter::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserFilter {
    Table,
    Id,
    UserId,
    FilterableId,
    FilterableType,
    FilterType,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
