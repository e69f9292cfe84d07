//! Route handlers and the serving loop
//!
//! Handlers are stateless request/response; the only persistent state is
//! the record store, mutated by the search upsert and the clear-all route.

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::catalog::client::{CatalogClient, SearchBody};
use crate::catalog::{
    GeoJsonFeatureCollection, extract_streamable_assets, parse_item_datetime, to_geojson_feature,
};
use crate::config::Config;
use crate::database::sqlite::{Database, NewStacItem, StacItemQueries};
use crate::server::errors::ApiError;
use crate::server::params::{SearchRequest, resolve_api_url};

/// Everything a handler needs, injected through axum state.
pub struct AppState {
    pub database: Database,
    pub client: CatalogClient,
    pub config: Config,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub status: &'static str,
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct CollectionList {
    pub api_url: String,
    pub collections: Vec<CollectionSummary>,
}

#[derive(Debug, Serialize)]
pub struct CollectionSummary {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[inline]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", get(stac_search))
        .route("/collections", get(stac_collections))
        .route("/clear", get(stac_clear))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the store, build the router, and serve until the process exits.
#[inline]
pub async fn run_server(config: Config) -> Result<()> {
    let database = Database::initialize_from_config_dir(config.get_base_dir()).await?;
    let client = CatalogClient::new(Duration::from_secs(config.upstream.timeout_seconds))?;

    let addr = config.server.bind_addr();
    let state = Arc::new(AppState {
        database,
        client,
        config,
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Serving STAC cache on http://{}", addr);
    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}

/// `GET /search`: proxy an item search, cache the results, and answer
/// with a GeoJSON FeatureCollection in upstream order.
async fn stac_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<GeoJsonFeatureCollection>, ApiError> {
    let request = SearchRequest::from_query(&params, &state.config)?;

    let body = SearchBody {
        collections: vec![request.collection.clone()],
        bbox: request.bbox,
        limit: request.limit,
    };
    let page = state.client.search(&request.api_url, &body).await?;

    let mut features = Vec::with_capacity(page.features.len());
    for feature in page.features {
        let Some(stac_id) = feature.id.as_deref().filter(|id| !id.is_empty()) else {
            debug!("Skipping upstream feature without id");
            continue;
        };
        let Some(geometry) = feature.geometry.as_ref().filter(|g| !g.is_null()) else {
            debug!("Skipping upstream feature {} without geometry", stac_id);
            continue;
        };

        let streamable_assets = extract_streamable_assets(feature.assets.as_ref());
        let datetime = parse_item_datetime(feature.properties.datetime.as_deref());

        let new_item = NewStacItem {
            stac_id: stac_id.to_string(),
            collection: request.collection.clone(),
            api_url: request.api_url.clone(),
            geometry: geometry.to_string(),
            datetime,
            assets: serde_json::to_string(&streamable_assets)
                .context("Failed to serialize streamable assets")?,
        };

        let item = StacItemQueries::upsert(state.database.pool(), new_item).await?;
        features.push(to_geojson_feature(&item)?);
    }

    Ok(Json(GeoJsonFeatureCollection::new(features)))
}

/// `GET /collections`: list the catalog collections.
async fn stac_collections(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<CollectionList>, ApiError> {
    let api_url = resolve_api_url(&params, &state.config)?;

    let listing = state.client.collections(&api_url).await?;
    let collections = listing
        .collections
        .into_iter()
        .filter_map(|record| {
            let id = record.id?;
            let title = record
                .title
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| id.clone());
            Some(CollectionSummary {
                id,
                title,
                description: record.description.unwrap_or_default(),
            })
        })
        .collect();

    Ok(Json(CollectionList {
        api_url,
        collections,
    }))
}

/// `GET /clear`: drop every cached record, reporting how many went.
async fn stac_clear(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResponse>, ApiError> {
    let deleted = StacItemQueries::delete_all(state.database.pool()).await?;
    info!("Cleared {} cached STAC items", deleted);

    Ok(Json(ClearResponse {
        status: "ok",
        deleted,
    }))
}

/// `GET /health`: liveness probe.
async fn health() -> &'static str {
    "ok"
}
