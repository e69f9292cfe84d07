//! Query-parameter validation for the proxy routes
//!
//! Validation fails fast: the first bad parameter rejects the request
//! before anything is fetched or written.

use std::collections::HashMap;

use crate::catalog::normalize_api_url;
use crate::config::Config;
use crate::{Result, StacCacheError};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;

/// A fully validated search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub bbox: [f64; 4],
    pub limit: u32,
    pub collection: String,
    pub api_url: String,
}

impl SearchRequest {
    #[inline]
    pub fn from_query(params: &HashMap<String, String>, config: &Config) -> Result<Self> {
        let bbox = parse_bbox(params.get("bbox").map(String::as_str).unwrap_or(""))?;
        let limit = parse_limit(params.get("limit").map(String::as_str))?;
        let collection = parse_collection(
            params.get("collection").map(String::as_str),
            &config.upstream.default_collection,
        )?;
        let api_url = resolve_api_url(params, config)?;

        Ok(Self {
            bbox,
            limit,
            collection,
            api_url,
        })
    }
}

/// Resolve the catalog base URL for a request: an explicit non-blank
/// `api_url` parameter wins, otherwise the configured upstream is used.
/// Either way the result is normalized and validated.
#[inline]
pub fn resolve_api_url(params: &HashMap<String, String>, config: &Config) -> Result<String> {
    let requested = params
        .get("api_url")
        .map(String::as_str)
        .filter(|raw| !raw.trim().is_empty());

    normalize_api_url(Some(requested.unwrap_or(config.upstream.api_url.as_str())))
}

/// Parse a `min_lon,min_lat,max_lon,max_lat` bounding box.
#[inline]
pub fn parse_bbox(raw: &str) -> Result<[f64; 4]> {
    let mut values = Vec::new();
    for part in raw.split(',') {
        let value: f64 = part.trim().parse().map_err(|_| {
            StacCacheError::InvalidInput(format!("Invalid bbox: {:?} is not a number", part.trim()))
        })?;
        values.push(value);
    }

    if values.len() != 4 {
        return Err(StacCacheError::InvalidInput(
            "Invalid bbox: must include min_lon,min_lat,max_lon,max_lat".to_string(),
        ));
    }

    Ok([values[0], values[1], values[2], values[3]])
}

/// Parse the page size, clamping integers into `[1, 100]`. A missing
/// parameter defaults to [`DEFAULT_LIMIT`]; a non-integer is an error.
#[inline]
pub fn parse_limit(raw: Option<&str>) -> Result<u32> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_LIMIT);
    };

    let value: i64 = raw.trim().parse().map_err(|_| {
        StacCacheError::InvalidInput("Invalid limit. Must be an integer.".to_string())
    })?;

    // The clamp bounds make the cast lossless.
    Ok(value.clamp(MIN_LIMIT, MAX_LIMIT) as u32)
}

/// Parse the collection name. A missing parameter falls back to the
/// configured default; a blank one is rejected.
#[inline]
pub fn parse_collection(raw: Option<&str>, default: &str) -> Result<String> {
    match raw {
        None => Ok(default.to_string()),
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(StacCacheError::InvalidInput(
                    "Invalid collection: must be non-empty".to_string(),
                ));
            }
            Ok(trimmed.to_string())
        }
    }
}
