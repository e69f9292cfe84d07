use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::{debug, info};

#[cfg(test)]
mod tests;

pub mod models;
pub mod queries;

pub use models::*;
pub use queries::*;

pub type DbPool = Pool<Sqlite>;

#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    #[inline]
    pub async fn new<P: AsRef<Path>>(database_url: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(database_url)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("Failed to create database connection pool")?;

        let database = Self { pool };
        database.run_migrations().await?;

        Ok(database)
    }

    #[inline]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    #[inline]
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");

        sqlx::migrate!("src/database/sqlite/migrations")
            .run(&self.pool)
            .await
            .context("Failed to run schema migration")?;

        debug!("Database migrations completed successfully");
        Ok(())
    }

    #[inline]
    pub async fn initialize_from_config_dir(config_dir: &Path) -> Result<Self> {
        let db_path = config_dir.join("stac_cache.db");
        let db_url = db_path.to_string_lossy();

        std::fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        Self::new(db_url.as_ref()).await
    }

    // Item operations
    #[inline]
    pub async fn upsert_item(&self, item: NewStacItem) -> Result<StacItem> {
        StacItemQueries::upsert(&self.pool, item).await
    }

    #[inline]
    pub async fn get_item(&self, stac_id: &str) -> Result<Option<StacItem>> {
        StacItemQueries::get_by_stac_id(&self.pool, stac_id).await
    }

    #[inline]
    pub async fn list_items(&self) -> Result<Vec<StacItem>> {
        StacItemQueries::list_all(&self.pool).await
    }

    #[inline]
    pub async fn clear_items(&self) -> Result<u64> {
        StacItemQueries::delete_all(&self.pool).await
    }

    #[inline]
    pub async fn count_items(&self) -> Result<i64> {
        StacItemQueries::count(&self.pool).await
    }
}
