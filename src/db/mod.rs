//! Database connection pool, migrations and store construction.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::{AppConfig, ConfigError, StorageMode};
use crate::store::{MemoryStore, PostgresStore, Store};

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply the migrations in `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Build the store selected by `STORAGE_MODE`, migrating the schema in postgres mode.
pub async fn connect_store(config: &AppConfig) -> anyhow::Result<Store> {
    match config.storage_mode {
        StorageMode::InMemory => {
            tracing::info!("Using in-memory document store");
            Ok(Store::Memory(MemoryStore::default()))
        }
        StorageMode::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::MissingDatabaseUrl)?;
            let pool = create_pool(url, config.database_max_connections).await?;
            run_migrations(&pool).await?;
            tracing::info!(
                max_connections = config.database_max_connections,
                "Connected to Postgres document store"
            );
            Ok(Store::Postgres(PostgresStore::new(pool)))
        }
    }
}
