//! HTTP surface of the caching proxy
//!
//! Four GET routes over an axum router: `/search` proxies and caches STAC
//! item searches, `/collections` lists upstream collections, `/clear`
//! empties the cache, `/health` is a liveness probe.


pub mod errors;
pub mod handlers;
pub mod params;

pub use handlers::{AppState, router, run_server};
