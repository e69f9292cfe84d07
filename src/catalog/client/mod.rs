
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{Result, StacCacheError};

/// Upstream calls give up after this long; failures are reported to the
/// caller immediately, with no retry.
pub const UPSTREAM_TIMEOUT_SECONDS: u64 = 20;

/// Client for a STAC-compliant search API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
}

/// Body for `POST {api_url}/search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchBody {
    pub collections: Vec<String>,
    pub bbox: [f64; 4],
    pub limit: u32,
}

/// Page of features returned by the upstream search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub features: Vec<StacFeature>,
}

/// A raw upstream feature. Everything is optional: upstream catalogs ship
/// partial records, and callers decide what to skip.
#[derive(Debug, Clone, Deserialize)]
pub struct StacFeature {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub properties: FeatureProperties,
    #[serde(default)]
    pub assets: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub datetime: Option<String>,
}

/// Listing returned by the upstream collections endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionsResponse {
    #[serde(default)]
    pub collections: Vec<CollectionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CatalogClient {
    #[inline]
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stac-cache/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StacCacheError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }

    /// Search the catalog for items matching the given body.
    ///
    /// Transport errors, non-2xx statuses, and unparseable bodies all map
    /// to [`StacCacheError::Upstream`] carrying the failure text.
    #[inline]
    pub async fn search(&self, api_url: &str, body: &SearchBody) -> Result<SearchResponse> {
        let url = format!("{}/search", api_url);
        debug!(
            "Searching {} for {:?} in bbox {:?} (limit {})",
            url, body.collections, body.bbox, body.limit
        );

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| upstream_error("Failed to fetch STAC data", &e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream search returned HTTP {} for {}", status, url);
            return Err(upstream_error(
                "Failed to fetch STAC data",
                &format!("upstream returned HTTP {}", status),
            ));
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| upstream_error("Failed to fetch STAC data", &e.to_string()))
    }

    /// Fetch the catalog's collection listing.
    #[inline]
    pub async fn collections(&self, api_url: &str) -> Result<CollectionsResponse> {
        let url = format!("{}/collections", api_url);
        debug!("Fetching collection listing from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| upstream_error("Failed to fetch STAC collections", &e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream collections returned HTTP {} for {}", status, url);
            return Err(upstream_error(
                "Failed to fetch STAC collections",
                &format!("upstream returned HTTP {}", status),
            ));
        }

        response
            .json::<CollectionsResponse>()
            .await
            .map_err(|e| upstream_error("Failed to fetch STAC collections", &e.to_string()))
    }
}

fn upstream_error(context: &str, detail: &str) -> StacCacheError {
    StacCacheError::Upstream(format!("{}: {}", context, detail))
}
