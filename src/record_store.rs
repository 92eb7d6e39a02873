//! Typed JSON records over a raw key-value backend.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app_response::AppResponse;
use crate::kv_store::{KeyValueStore, MemoryStore};
use crate::lmdb_store::LmdbStore;
use crate::store_config::StoreConfig;

/// Named JSON values on top of a [`KeyValueStore`].
///
/// Reads never fail: a missing key, a backend error or an undecodable value
/// all come back as absent (or as an empty collection) and are logged. Writes
/// report backend errors to the caller.
pub struct RecordStore {
    backend: Box<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Opens a durable store backed by LMDB.
    pub fn open(config: &StoreConfig) -> Result<Self, AppResponse> {
        Ok(Self::new(LmdbStore::init(config)?))
    }

    /// Decodes the value under `key`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_scalar(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding undecodable record under '{key}': {e}");
                None
            }
        }
    }

    /// Decodes the collection under `key`, or an empty one.
    pub fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read(key).unwrap_or_default()
    }

    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppResponse> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, &json)
    }

    /// Reads a plain string slot without JSON decoding.
    pub fn read_scalar(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Read of '{key}' failed, treating as absent: {e}");
                None
            }
        }
    }

    pub fn write_scalar(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        self.backend.set(key, value)
    }

    pub fn remove(&self, key: &str) -> Result<bool, AppResponse> {
        self.backend.remove(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.backend.keys().unwrap_or_else(|e| {
            warn!("Listing keys failed: {e}");
            Vec::new()
        })
    }

    pub fn clear_all_records(&self) -> Result<(), AppResponse> {
        self.backend.clear()
    }

    pub fn flush(&self) -> Result<(), AppResponse> {
        self.backend.flush()
    }
}
