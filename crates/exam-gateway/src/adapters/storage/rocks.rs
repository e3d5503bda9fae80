//! # RocksDB Registration Store
//!
//! Durable implementation of the `RegistrationStore` port.
//!
//! ## Column Families
//!
//! - `registrations` - record id (16 bytes) → JSON-encoded record
//! - `identity_index` - identity number → record id (unique index)
//!
//! A record and its index entry are written in one `WriteBatch`. Inserts are
//! serialized by a mutex so the duplicate check and the batch write cannot
//! interleave with another insert.

use crate::domain::{Registration, RegistrationId, StoreError};
use crate::ports::RegistrationStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use rocksdb::{
    BlockBasedOptions, Cache, ColumnFamily, ColumnFamilyDescriptor, DBCompressionType,
    IteratorMode, Options, WriteBatch, WriteOptions, DB,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub const CF_REGISTRATIONS: &str = "registrations";
pub const CF_IDENTITY_INDEX: &str = "identity_index";

/// All column families used by the store
pub const COLUMN_FAMILIES: &[&str] = &[CF_REGISTRATIONS, CF_IDENTITY_INDEX];

/// RocksDB configuration
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 32MB)
    pub block_cache_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/registrations"),
            block_cache_size: 32 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create config for testing (small cache, no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed registration store
pub struct RocksDbRegistrationStore {
    inner: Arc<Inner>,
}

struct Inner {
    db: DB,
    insert_lock: Mutex<()>,
    sync_writes: bool,
}

fn io_error(context: &str, e: rocksdb::Error) -> StoreError {
    StoreError::Io {
        message: format!("RocksDB {} failed: {}", context, e),
    }
}

impl RocksDbRegistrationStore {
    /// Open or create the database
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(DBCompressionType::Snappy);

        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors).map_err(|e| {
            StoreError::Unavailable {
                message: format!("failed to open RocksDB at {}: {}", config.path.display(), e),
            }
        })?;

        info!(path = %config.path.display(), "Opened RocksDB registration store");

        Ok(Self {
            inner: Arc::new(Inner {
                db,
                insert_lock: Mutex::new(()),
                sync_writes: config.sync_writes,
            }),
        })
    }

    /// Run a blocking store operation off the async runtime.
    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Inner) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(inner.as_ref()))
            .await
            .map_err(|e| StoreError::Unavailable {
                message: format!("storage task failed: {}", e),
            })?
    }
}

impl Inner {
    fn cf(&self, name: &str) -> Result<&ColumnFamily, StoreError> {
        self.db.cf_handle(name).ok_or_else(|| StoreError::Unavailable {
            message: format!("missing column family {}", name),
        })
    }

    fn insert(&self, registration: &Registration) -> Result<(), StoreError> {
        let records = self.cf(CF_REGISTRATIONS)?;
        let index = self.cf(CF_IDENTITY_INDEX)?;
        let value = serde_json::to_vec(registration).map_err(|e| StoreError::Serialization {
            message: e.to_string(),
        })?;

        let _guard = self.insert_lock.lock();

        let existing = self
            .db
            .get_pinned_cf(index, registration.citizen_id.as_bytes())
            .map_err(|e| io_error("index lookup", e))?;
        if existing.is_some() {
            return Err(StoreError::Duplicate {
                identity_number: registration.citizen_id.clone(),
            });
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(records, registration.id.as_bytes(), &value);
        batch.put_cf(index, registration.citizen_id.as_bytes(), registration.id.as_bytes());

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        self.db
            .write_opt(batch, &write_opts)
            .map_err(|e| io_error("batch write", e))
    }

    fn get(&self, id: &RegistrationId) -> Result<Option<Registration>, StoreError> {
        let records = self.cf(CF_REGISTRATIONS)?;
        match self
            .db
            .get_pinned_cf(records, id.as_bytes())
            .map_err(|e| io_error("get", e))?
        {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StoreError::Serialization {
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn find_by_identity_number(
        &self,
        identity_number: &str,
    ) -> Result<Option<Registration>, StoreError> {
        let index = self.cf(CF_IDENTITY_INDEX)?;
        let Some(raw_id) = self
            .db
            .get_pinned_cf(index, identity_number.as_bytes())
            .map_err(|e| io_error("index lookup", e))?
        else {
            return Ok(None);
        };
        let id = uuid::Uuid::from_slice(&raw_id).map_err(|e| StoreError::Serialization {
            message: format!("corrupt index entry for {}: {}", identity_number, e),
        })?;
        self.get(&RegistrationId::from_uuid(id))
    }

    fn count(&self) -> Result<usize, StoreError> {
        let records = self.cf(CF_REGISTRATIONS)?;
        let mut count = 0;
        for item in self.db.iterator_cf(records, IteratorMode::Start) {
            item.map_err(|e| io_error("scan", e))?;
            count += 1;
        }
        Ok(count)
    }

    fn ping(&self) -> Result<(), StoreError> {
        self.db
            .property_int_value("rocksdb.estimate-num-keys")
            .map(|_| ())
            .map_err(|e| io_error("property read", e))
    }
}

#[async_trait]
impl RegistrationStore for RocksDbRegistrationStore {
    async fn insert(&self, registration: &Registration) -> Result<(), StoreError> {
        let registration = registration.clone();
        self.run(move |inner| inner.insert(&registration)).await
    }

    async fn get(&self, id: &RegistrationId) -> Result<Option<Registration>, StoreError> {
        let id = *id;
        self.run(move |inner| inner.get(&id)).await
    }

    async fn find_by_identity_number(
        &self,
        identity_number: &str,
    ) -> Result<Option<Registration>, StoreError> {
        let identity_number = identity_number.to_string();
        self.run(move |inner| inner.find_by_identity_number(&identity_number))
            .await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.run(|inner| inner.count()).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.run(|inner| inner.ping()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::test_record;

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksDbRegistrationStore::open(RocksDbConfig::for_testing(dir.path())).unwrap();
        let record = test_record("1234567890121");

        store.insert(&record).await.unwrap();

        assert_eq!(store.get(&record.id).await.unwrap(), Some(record.clone()));
        assert_eq!(
            store.find_by_identity_number("1234567890121").await.unwrap(),
            Some(record)
        );
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_identity_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksDbRegistrationStore::open(RocksDbConfig::for_testing(dir.path())).unwrap();

        store.insert(&test_record("1234567890121")).await.unwrap();
        let err = store.insert(&test_record("1234567890121")).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let record = test_record("1101700203450");
        {
            let store =
                RocksDbRegistrationStore::open(RocksDbConfig::for_testing(dir.path())).unwrap();
            store.insert(&record).await.unwrap();
        }

        let store = RocksDbRegistrationStore::open(RocksDbConfig::for_testing(dir.path())).unwrap();
        assert_eq!(store.get(&record.id).await.unwrap(), Some(record));
        assert!(store.insert(&test_record("1101700203450")).await.is_err());
    }
}
