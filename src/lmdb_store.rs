//! Durable backend on top of an LMDB environment.

use std::path::{Path, PathBuf};

use lmdb::{Cursor, Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info};

use crate::app_response::AppResponse;
use crate::kv_store::KeyValueStore;
use crate::store_config::{StoreConfig, RECORDS_DB};

/// One LMDB environment with a single named database holding every record.
///
/// Each `set`/`remove` runs in its own write transaction, so individual slot
/// writes are atomic and durable once they return.
pub struct LmdbStore {
    env: Environment,
    db: Database,
    path: PathBuf,
}

impl LmdbStore {
    /// Opens (or creates) the environment at `<name>.lmdb`.
    pub fn init(config: &StoreConfig) -> Result<Self, AppResponse> {
        config.validate()?;
        let path = config.lmdb_dir();
        std::fs::create_dir_all(&path)?;

        let env = Environment::new()
            .set_max_dbs(config.max_dbs)
            .set_map_size(config.map_size)
            .open(&path)?;
        let db = env.create_db(Some(RECORDS_DB), DatabaseFlags::empty())?;

        info!("Opened LMDB store at {}", path.display());
        Ok(Self { env, db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes pending writes to disk.
    pub fn sync(&self) -> Result<(), AppResponse> {
        self.env.sync(true)?;
        Ok(())
    }
}

impl KeyValueStore for LmdbStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppResponse> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => Some(String::from_utf8(bytes.to_vec()).map_err(|e| {
                AppResponse::SerializationError(format!("Value under '{key}' is not UTF-8: {e}"))
            })?),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.commit()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        if key.is_empty() {
            return Err(AppResponse::BadRequest("Empty keys are not allowed".to_string()));
        }
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Wrote {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        match txn.del(self.db, &key, None) {
            Ok(()) => {
                txn.commit()?;
                Ok(true)
            }
            Err(lmdb::Error::NotFound) => {
                txn.abort();
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, AppResponse> {
        let txn = self.env.begin_ro_txn()?;
        let keys = {
            let mut cursor = txn.open_ro_cursor(self.db)?;
            cursor
                .iter_start()
                .map(|(key, _)| String::from_utf8_lossy(key).into_owned())
                .collect::<Vec<_>>()
        };
        txn.commit()?;
        Ok(keys)
    }

    fn clear(&self) -> Result<(), AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.clear_db(self.db)?;
        txn.commit()?;
        info!("Cleared all records in {}", self.path.display());
        Ok(())
    }

    fn flush(&self) -> Result<(), AppResponse> {
        self.sync()?;
        debug!("Synced LMDB store at {}", self.path.display());
        Ok(())
    }
}
