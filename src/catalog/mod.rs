pub mod client;


use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

use crate::database::sqlite::StacItem;
use crate::{Result, StacCacheError};

/// Catalog queried when a request does not name one.
pub const DEFAULT_API_URL: &str = "https://earth-search.aws.element84.com/v1";

/// Collection searched when a request does not name one.
pub const DEFAULT_COLLECTION: &str = "sentinel-2-l2a";

/// An asset kept by the streamability filter. Only the fields the map
/// viewer needs survive; everything else from the upstream asset is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamableAsset {
    pub href: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub title: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub geometry: Value,
    pub properties: ItemProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemProperties {
    pub stac_id: String,
    pub collection: String,
    pub api_url: String,
    pub datetime: Option<String>,
    pub streamable_assets: BTreeMap<String, StreamableAsset>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeoJsonFeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<GeoJsonFeature>,
}

impl GeoJsonFeatureCollection {
    #[inline]
    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self {
            kind: "FeatureCollection",
            features,
        }
    }
}

/// Validate and normalize a catalog base URL.
///
/// `None` or a blank string resolves to [`DEFAULT_API_URL`]. A trailing
/// slash is stripped so paths can be appended with plain `format!`.
#[inline]
pub fn normalize_api_url(raw: Option<&str>) -> Result<String> {
    let trimmed = raw.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_URL.to_string());
    }

    let url = Url::parse(trimmed)
        .map_err(|_| StacCacheError::InvalidInput(format!("Invalid api_url: {}", trimmed)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(StacCacheError::InvalidInput(format!(
            "Invalid api_url: must use HTTP or HTTPS scheme: {}",
            trimmed
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(StacCacheError::InvalidInput(format!(
            "Invalid api_url: must have a valid host: {}",
            trimmed
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Parse an item timestamp from the `properties.datetime` field.
///
/// Accepts RFC 3339 with either an offset or the `Z` designator, plus bare
/// ISO-8601 without an offset. Anything unparseable is `None`, never an
/// error: a missing timestamp must not reject an otherwise good item.
#[inline]
pub fn parse_item_datetime(raw: Option<&str>) -> Option<NaiveDateTime> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok())
}

/// Keep only the assets a browser can render.
///
/// An asset survives when it is a well-formed object with a non-empty
/// `href` and is image-like: its media type contains `image`, or its role
/// list contains `visual` or `thumbnail`. Matching is case-insensitive.
/// Malformed entries are dropped silently.
#[inline]
pub fn extract_streamable_assets(raw_assets: Option<&Value>) -> BTreeMap<String, StreamableAsset> {
    let mut kept_assets = BTreeMap::new();

    let Some(assets) = raw_assets.and_then(Value::as_object) else {
        return kept_assets;
    };

    for (key, asset) in assets {
        let Some(asset) = asset.as_object() else {
            continue;
        };

        let href = asset.get("href").and_then(Value::as_str).unwrap_or("");
        if href.is_empty() {
            continue;
        }

        let media_type = asset.get("type").and_then(Value::as_str).unwrap_or("");
        let roles: Vec<String> = asset
            .get("roles")
            .and_then(Value::as_array)
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let role_blob = roles.join(" ").to_lowercase();
        let is_image = media_type.to_lowercase().contains("image")
            || role_blob.contains("visual")
            || role_blob.contains("thumbnail");

        if is_image {
            kept_assets.insert(
                key.clone(),
                StreamableAsset {
                    href: href.to_string(),
                    media_type: media_type.to_string(),
                    title: asset
                        .get("title")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string(),
                    roles,
                },
            );
        }
    }

    kept_assets
}

/// Render a cached item back into a GeoJSON Feature.
///
/// Pure transform over the stored record; geometry and assets are
/// deserialized from their stored text forms. Corrupt stored JSON cannot
/// occur through the write path, so it surfaces as a database error.
#[inline]
pub fn to_geojson_feature(item: &StacItem) -> Result<GeoJsonFeature> {
    let geometry: Value = serde_json::from_str(&item.geometry).map_err(|e| {
        StacCacheError::Database(format!("Corrupt geometry for item {}: {}", item.stac_id, e))
    })?;

    let streamable_assets: BTreeMap<String, StreamableAsset> =
        serde_json::from_str(&item.assets).map_err(|e| {
            StacCacheError::Database(format!("Corrupt assets for item {}: {}", item.stac_id, e))
        })?;

    Ok(GeoJsonFeature {
        kind: "Feature",
        id: item.stac_id.clone(),
        geometry,
        properties: ItemProperties {
            stac_id: item.stac_id.clone(),
            collection: item.collection.clone(),
            api_url: item.api_url.clone(),
            datetime: item.datetime.map(render_datetime),
            streamable_assets,
        },
    })
}

/// Render a stored UTC timestamp as RFC 3339 with an explicit offset.
#[inline]
pub fn render_datetime(datetime: NaiveDateTime) -> String {
    DateTime::<Utc>::from_naive_utc_and_offset(datetime, Utc).to_rfc3339()
}
