//! Create follower table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Follower::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Follower::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Follower::ProfileId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Follower::FollowingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Follower::LocalProfile)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Follower::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follower_profile")
                            .from(Follower::Table, Follower::ProfileId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follower_following")
                            .from(Follower::Table, Follower::FollowingId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (profile_id, following_id) - prevent duplicate follows
        manager
            .create_index(
                Index::create()
                    .name("idx_follower_profile_following")
                    .table(Follower::Table)
                    .col(Follower::ProfileId)
                    .col(Follower::FollowingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: following_id (for follower lists and counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_follower_following_id")
                    .table(Follower::Table)
                    .col(Follower::FollowingId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Follower::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Follower {
    Table,
    Id,
    ProfileId,
    FollowingId,
    LocalProfile,
    CreatedAt,
}

#[derive(Iden)]
enum Profile {
    Table,
    Id,
}
