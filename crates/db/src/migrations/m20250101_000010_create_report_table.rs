//! Create report table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Report::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Report::ProfileId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Report::ReportedProfileId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Report::ObjectId).big_integer().not_null())
                    .col(ColumnDef::new(Report::ObjectType).string_len(64).not_null())
                    .col(ColumnDef::new(Report::ReportType).string_len(64).not_null())
                    .col(ColumnDef::new(Report::Message).text())
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_profile")
                            .from(Report::Table, Report::ProfileId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_reported_profile")
                            .from(Report::Table, Report::ReportedProfileId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_reported_profile_id")
                    .table(Report::Table)
                    .col(Report::ReportedProfileId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
    ProfileId,
    ReportedProfileId,
    ObjectId,
    ObjectType,
    ReportType,
    Message,
    CreatedAt,
}

#[derive(Iden)]
enum Profile {
    Table,
    Id,
}
