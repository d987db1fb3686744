use crate::error::DbError;
use crate::memory::MemoryStore;
use crate::repository::DbRepository;
use crate::store::FleetStore;
use configuration::{DatabaseSettings, StorageBackend};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The URL comes from `database.url`, which configuration loading has already
/// merged with `DATABASE_URL`.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let database_url = settings
        .url
        .as_deref()
        .ok_or_else(|| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Builds the store selected by `database.backend`.
pub async fn open_store(settings: &DatabaseSettings) -> Result<Arc<dyn FleetStore>, DbError> {
    match settings.backend {
        StorageBackend::Postgres => {
            let pool = connect(settings).await?;
            if settings.run_migrations {
                run_migrations(&pool).await?;
            }
            tracing::info!(max_connections = settings.max_connections, "Connected to PostgreSQL.");
            Ok(Arc::new(DbRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; records are lost on shutdown.");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
