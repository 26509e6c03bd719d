//! Create profile table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profile::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profile::UserId).big_integer().unique_key())
                    .col(ColumnDef::new(Profile::Username).string_len(512).not_null())
                    .col(ColumnDef::new(Profile::Name).string_len(256))
                    .col(ColumnDef::new(Profile::Bio).text())
                    .col(ColumnDef::new(Profile::Domain).string_len(255))
                    .col(
                        ColumnDef::new(Profile::IsPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Profile::FollowingCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Profile::FollowersCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Profile::StatusCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Profile::RemoteUrl).string_len(1024))
                    .col(ColumnDef::new(Profile::InboxUrl).string_len(1024))
                    .col(ColumnDef::new(Profile::OutboxUrl).string_len(1024))
                    .col(ColumnDef::new(Profile::SharedInbox).string_len(1024))
                    .col(ColumnDef::new(Profile::PublicKey).text())
                    .col(ColumnDef::new(Profile::PrivateKey).text())
                    .col(ColumnDef::new(Profile::AvatarUrl).string_len(1024))
                    .col(ColumnDef::new(Profile::LastFetchedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Profile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Profile::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Profile::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user")
                            .from(Profile::Table, Profile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (username, domain) - one actor per handle
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_username_domain")
                    .table(Profile::Table)
                    .col(Profile::Username)
                    .col(Profile::Domain)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: remote_url (for actor lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_remote_url")
                    .table(Profile::Table)
                    .col(Profile::RemoteUrl)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profile {
    Table,
    Id,
    UserId,
    Username,
    Name,
    Bio,
    Domain,
    IsPrivate,
    FollowingCount,
    FollowersCount,
    StatusCount,
    RemoteUrl,
    InboxUrl,
    OutboxUrl,
    SharedInbox,
    PublicKey,
    PrivateKey,
    AvatarUrl,
    LastFetchedAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
