//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_profile_table;
mod m20250101_000003_create_follower_table;
mod m20250101_000004_create_instance_table;
mod m20250101_000005_create_user_filter_table;
mod m20250101_000006_create_status_table;
mod m20250101_000007_create_media_table;
mod m20250101_000008_create_notification_table;
mod m20250101_000009_create_mod_log_table;
mod m20250101_000010_create_report_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_profile_table::Migration),
            Box::new(m20250101_000003_create_follower_table::Migration),
            Box::new(m20250101_000004_create_instance_table::Migration),
            Box::new(m20250101_000005_create_user_filter_table::Migration),
            Box::new(m20250101_000006_create_status_table::Migration),
            Box::new(m20250101_000007_create_media_table::Migration),
            Box::new(m20250101_000008_create_notification_table::Migration),
            Box::new(m20250101_000009_create_mod_log_table::Migration),
            Box::new(m20250101_000010_create_report_table::Migration),
        ]
    }
}
