//! Create media and media tag tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Media::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Media::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Media::StatusId).big_integer())
                    .col(ColumnDef::new(Media::ProfileId).big_integer().not_null())
                    .col(ColumnDef::new(Media::MediaPath).string_len(1024))
                    .col(ColumnDef::new(Media::RemoteUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Media::RemoteMedia)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Media::CdnUrl).string_len(1024))
                    .col(ColumnDef::new(Media::ThumbnailPath).string_len(1024))
                    .col(ColumnDef::new(Media::ThumbnailUrl).string_len(1024))
                    .col(ColumnDef::new(Media::OptimizedUrl).string_len(1024))
                    .col(ColumnDef::new(Media::Caption).text())
                    .col(ColumnDef::new(Media::License).string_len(128))
                    .col(
                        ColumnDef::new(Media::IsNsfw)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Media::Orientation).string_len(16))
                    .col(ColumnDef::new(Media::FilterName).string_len(64))
                    .col(ColumnDef::new(Media::FilterClass).string_len(64))
                    .col(ColumnDef::new(Media::Mime).string_len(128))
                    .col(ColumnDef::new(Media::Size).big_integer())
                    .col(ColumnDef::new(Media::Width).integer())
                    .col(ColumnDef::new(Media::Height).integer())
                    .col(ColumnDef::new(Media::Blurhash).string_len(128))
                    .col(
                        ColumnDef::new(Media::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Media::Order).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Media::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Media::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_profile")
                            .from(Media::Table, Media::ProfileId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_status")
                            .from(Media::Table, Media::StatusId)
                            .to(Status::Table, Status::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_media_status_id")
                    .table(Media::Table)
                    .col(Media::StatusId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MediaTag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MediaTag::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MediaTag::StatusId).big_integer().not_null())
                    .col(ColumnDef::new(MediaTag::MediaId).big_integer().not_null())
                    .col(ColumnDef::new(MediaTag::ProfileId).big_integer().not_null())
                    .col(
                        ColumnDef::new(MediaTag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_tag_status")
                            .from(MediaTag::Table, MediaTag::StatusId)
                            .to(Status::Table, Status::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (media_id, profile_id) - tag a profile once per media
        manager
            .create_index(
                Index::create()
                    .name("idx_media_tag_media_profile")
                    .table(MediaTag::Table)
                    .col(MediaTag::MediaId)
                    .col(MediaTag::ProfileId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MediaTag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Media::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Media {
    Table,
    Id,
    StatusId,
    ProfileId,
    MediaPath,
    RemoteUrl,
    RemoteMedia,
    CdnUrl,
    ThumbnailPath,
    ThumbnailUrl,
    OptimizedUrl,
    Caption,
    License,
    IsNsfw,
    Orientation,
    FilterName,
    FilterClass,
    Mime,
    Size,
    Width,
    Height,
    Blurhash,
    Version,
    Order,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MediaTag {
    Table,
    Id,
    StatusId,
    MediaId,
    ProfileId,
    CreatedAt,
}

#[derive(Iden)]
enum Profile {
    Table,
    Id,
}

#[derive(Iden)]
enum Status {
    Table,
    Id,
}
