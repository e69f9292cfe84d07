// Database module
// SQLite-backed cache of STAC item records, keyed by stac_id

pub mod sqlite;

pub use sqlite::*;
