//! Fedigram persistence: sea-orm entities, migrations and repositories.

pub mod entities;
pub mod migrations;
pub mod repositories;

use std::time::Duration;

use fedigram_common::{AppError, AppResult, config::DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::{info, log::LevelFilter};

const POOL_TIMEOUT: Duration = Duration::from_secs(10);

/// Open the `PostgreSQL` pool described by `[database]`.
pub async fn connect(config: &DatabaseConfig) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(&config.url);
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(POOL_TIMEOUT)
        .acquire_timeout(POOL_TIMEOUT)
        .sqlx_logging_level(LevelFilter::Debug);

    let db = Database::connect(options)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!(
        max_connections = config.max_connections,
        "Connected to database"
    );
    Ok(db)
}

/// Apply every pending migration, returning how many ran.
pub async fn migrate(db: &DatabaseConnection) -> AppResult<usize> {
    let pending = migrations::Migrator::get_pending_migrations(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .len();
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(pending)
}
