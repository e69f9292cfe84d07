
use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::models::{NewStacItem, StacItem};

pub struct StacItemQueries;

impl StacItemQueries {
    /// Insert the item, or fully replace the stored record when the
    /// `stac_id` already exists. Every field is overwritten; there is no
    /// partial merge. Concurrent writers are last-write-wins.
    #[inline]
    pub async fn upsert(pool: &SqlitePool, item: NewStacItem) -> Result<StacItem> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO stac_items (stac_id, collection, api_url, geometry, datetime, assets, created_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(stac_id) DO UPDATE SET
                collection = excluded.collection,
                api_url = excluded.api_url,
                geometry = excluded.geometry,
                datetime = excluded.datetime,
                assets = excluded.assets
            "#,
        )
        .bind(&item.stac_id)
        .bind(&item.collection)
        .bind(&item.api_url)
        .bind(&item.geometry)
        .bind(item.datetime)
        .bind(&item.assets)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to upsert STAC item")?;

        debug!("Upserted STAC item {}", item.stac_id);

        Self::get_by_stac_id(pool, &item.stac_id)
            .await?
            .ok_or_else(|| anyhow!("Failed to retrieve upserted STAC item"))
    }

    #[inline]
    pub async fn get_by_stac_id(pool: &SqlitePool, stac_id: &str) -> Result<Option<StacItem>> {
        let result = sqlx::query_as::<_, StacItem>(
            r#"
            SELECT id, stac_id, collection, api_url, geometry, datetime, assets, created_date
            FROM stac_items WHERE stac_id = ?
            "#,
        )
        .bind(stac_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get STAC item by stac_id")?;

        Ok(result)
    }

    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<StacItem>> {
        let items = sqlx::query_as::<_, StacItem>(
            r#"
            SELECT id, stac_id, collection, api_url, geometry, datetime, assets, created_date
            FROM stac_items ORDER BY created_date DESC, stac_id
            "#,
        )
        .fetch_all(pool)
        .await
        .context("Failed to list STAC items")?;

        Ok(items)
    }

    /// Delete every cached record. Returns the number of rows removed.
    #[inline]
    pub async fn delete_all(pool: &SqlitePool) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM stac_items")
            .execute(pool)
            .await
            .context("Failed to clear STAC items")?
            .rows_affected();

        debug!("Deleted {} STAC items", deleted);
        Ok(deleted)
    }

    #[inline]
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stac_items")
            .fetch_one(pool)
            .await
            .context("Failed to count STAC items")?;

        Ok(count)
    }
}
