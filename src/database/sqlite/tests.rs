use super::*;
use anyhow::Result;
use std::collections::HashSet;
use tempfile::TempDir;

async fn create_test_database() -> Result<(TempDir, Database)> {
    let temp_dir = TempDir::new()?;
    let database = Database::initialize_from_config_dir(temp_dir.path()).await?;
    Ok((temp_dir, database))
}

fn sample_item(stac_id: &str) -> NewStacItem {
    NewStacItem {
        stac_id: stac_id.to_string(),
        collection: "sentinel-2-l2a".to_string(),
        api_url: "https://earth-search.aws.element84.com/v1".to_string(),
        geometry: r#"{"type":"Point","coordinates":[11.5,48.1]}"#.to_string(),
        datetime: None,
        assets: "{}".to_string(),
    }
}

#[tokio::test]
async fn integration_schema_migration() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(database.pool())
    .await?;

    let actual_tables: HashSet<&str> = tables.iter().map(|t| t.as_str()).collect();
    assert!(actual_tables.contains("stac_items"));
    assert!(actual_tables.contains("_sqlx_migrations"));

    Ok(())
}

#[tokio::test]
async fn integration_upsert_replaces_whole_record() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let first = database.upsert_item(sample_item("item-1")).await?;
    assert_eq!(first.stac_id, "item-1");
    assert_eq!(first.asset_count(), 0);

    let mut replacement = sample_item("item-1");
    replacement.geometry = r#"{"type":"Point","coordinates":[0.0,0.0]}"#.to_string();
    replacement.assets =
        r#"{"visual":{"href":"https://x/v.tif","type":"image/tiff","title":"","roles":["visual"]}}"#
            .to_string();

    let second = database.upsert_item(replacement).await?;

    // Same row, every field overwritten, no merge of old and new assets.
    assert_eq!(second.id, first.id);
    assert_eq!(
        second.geometry,
        r#"{"type":"Point","coordinates":[0.0,0.0]}"#
    );
    assert_eq!(second.asset_count(), 1);
    assert_eq!(database.count_items().await?, 1);

    Ok(())
}

#[tokio::test]
async fn integration_clear_reports_deleted_count() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    for i in 0..3 {
        database.upsert_item(sample_item(&format!("item-{}", i))).await?;
    }
    assert_eq!(database.count_items().await?, 3);

    let deleted = database.clear_items().await?;
    assert_eq!(deleted, 3);
    assert_eq!(database.count_items().await?, 0);

    let deleted_again = database.clear_items().await?;
    assert_eq!(deleted_again, 0);

    Ok(())
}

#[tokio::test]
async fn integration_concurrent_upserts_same_id() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let mut handles = Vec::new();
    for i in 0..10 {
        let pool = database.pool().clone();
        let handle = tokio::spawn(async move {
            let mut item = sample_item("contended");
            item.geometry = format!(r#"{{"type":"Point","coordinates":[{}.0,0.0]}}"#, i);
            StacItemQueries::upsert(&pool, item).await
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.expect("handle should join successfully")?;
    }

    // Last write wins; exactly one row remains whichever writer finished last.
    assert_eq!(database.count_items().await?, 1);

    Ok(())
}
