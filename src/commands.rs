use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::render_datetime;
use crate::config::{Config, get_config_dir};
use crate::database::sqlite::Database;
use crate::server::run_server;

/// Start the HTTP proxy server
#[inline]
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config_dir = get_config_dir()?;
    let mut config = Config::load(&config_dir)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config
        .validate()
        .context("Configuration validation failed")?;

    info!("Starting STAC cache proxy");
    run_server(config).await
}

/// Delete every cached STAC item
#[inline]
pub async fn clear_cache() -> Result<()> {
    let config_dir = get_config_dir()?;
    let database = Database::initialize_from_config_dir(&config_dir)
        .await
        .context("Failed to initialize database")?;

    let deleted = database.clear_items().await?;
    info!("Cleared {} cached STAC items", deleted);
    println!("Deleted {} cached item(s).", deleted);

    Ok(())
}

/// Show cache status: where the store lives and what it holds
#[inline]
pub async fn show_status() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config = Config::load(&config_dir)?;
    let database = Database::initialize_from_config_dir(&config_dir)
        .await
        .context("Failed to initialize database")?;

    let items = database.list_items().await?;

    println!("STAC cache status:");
    println!("  Config directory: {}", config_dir.display());
    println!("  Database: {}", config.database_path().display());
    println!("  Upstream catalog: {}", config.upstream.api_url);
    println!("  Cached items: {}", items.len());

    if let Some(newest) = items.first() {
        println!(
            "  Most recent: {} ({} asset(s))",
            newest.stac_id,
            newest.asset_count()
        );
        if let Some(datetime) = newest.datetime {
            println!("  Captured: {}", render_datetime(datetime));
        }
    }

    Ok(())
}

/// Print the resolved configuration as TOML
#[inline]
pub fn show_config() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config = Config::load(&config_dir)?;

    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    println!("# {}", config.config_file_path().display());
    print!("{}", rendered);

    Ok(())
}
