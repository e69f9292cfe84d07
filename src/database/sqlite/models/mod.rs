
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// A cached STAC item. Geometry and the filtered asset map are stored as
/// serialized JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StacItem {
    pub id: i64,
    pub stac_id: String,
    pub collection: String,
    pub api_url: String,
    pub geometry: String,
    pub datetime: Option<NaiveDateTime>,
    pub assets: String,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStacItem {
    pub stac_id: String,
    pub collection: String,
    pub api_url: String,
    pub geometry: String,
    pub datetime: Option<NaiveDateTime>,
    pub assets: String,
}

impl StacItem {
    /// Number of streamable assets stored for this item.
    #[inline]
    pub fn asset_count(&self) -> usize {
        serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&self.assets)
            .map(|assets| assets.len())
            .unwrap_or(0)
    }

    #[inline]
    pub fn has_datetime(&self) -> bool {
        self.datetime.is_some()
    }
}
