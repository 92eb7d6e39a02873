//! Configuration for opening a durable store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;

/// 10 MiB; LMDB reserves the address space up front but only grows the file as needed.
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024;

pub const DEFAULT_MAX_DBS: u32 = 4;

/// Name of the LMDB sub-database holding every record.
pub const RECORDS_DB: &str = "records";

/// Settings for an [`LmdbStore`](crate::lmdb_store::LmdbStore).
///
/// The store lives in a directory named `<name>.lmdb`, so `name` may carry a
/// path prefix (`"/data/app/musicmate"`).
///
/// ```
/// use musicmate_store::store_config::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{"name":"shop","mapSize":1048576}"#).unwrap();
/// assert_eq!(config.map_size, 1_048_576);
/// assert_eq!(config.lmdb_dir().to_string_lossy(), "shop.lmdb");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub name: String,
    #[serde(default = "default_map_size")]
    pub map_size: usize,
    #[serde(default = "default_max_dbs")]
    pub max_dbs: u32,
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_max_dbs() -> u32 {
    DEFAULT_MAX_DBS
}

impl StoreConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map_size: DEFAULT_MAP_SIZE,
            max_dbs: DEFAULT_MAX_DBS,
        }
    }

    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, AppResponse> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppResponse> {
        if self.name.trim().is_empty() {
            return Err(AppResponse::ValidationError(
                "Store name must not be empty".to_string(),
            ));
        }
        if self.map_size == 0 {
            return Err(AppResponse::ValidationError(
                "mapSize must be greater than zero".to_string(),
            ));
        }
        if self.max_dbs == 0 {
            return Err(AppResponse::ValidationError(
                "maxDbs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn lmdb_dir(&self) -> PathBuf {
        PathBuf::from(format!("{}.lmdb", self.name))
    }
}
