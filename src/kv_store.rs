//! Raw key-value backends.
//!
//! A backend stores plain strings under string keys. Everything typed (JSON
//! collections, profiles, session scalars) is layered on top by
//! [`RecordStore`](crate::record_store::RecordStore), so a backend only has to
//! move bytes.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::app_response::AppResponse;

/// Storage slot abstraction shared by the durable and in-memory backends.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, AppResponse>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), AppResponse>;

    /// Removes `key`. Returns `false` if nothing was stored there.
    fn remove(&self, key: &str) -> Result<bool, AppResponse>;

    /// All keys currently stored, in byte order.
    fn keys(&self) -> Result<Vec<String>, AppResponse>;

    /// Removes every key.
    fn clear(&self) -> Result<(), AppResponse>;

    /// Makes every completed write durable. Called before the store is closed.
    fn flush(&self) -> Result<(), AppResponse>;
}

/// Process-local backend. Contents vanish when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppResponse> {
        Ok(self.slots.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        self.slots.write()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, AppResponse> {
        Ok(self.slots.write()?.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, AppResponse> {
        Ok(self.slots.read()?.keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), AppResponse> {
        self.slots.write()?.clear();
        Ok(())
    }

    fn flush(&self) -> Result<(), AppResponse> {
        Ok(())
    }
}
