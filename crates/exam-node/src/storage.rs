//! Storage URI to [`RegistrationStore`] adapter.

use exam_gateway::{InMemoryRegistrationStore, RegistrationStore, StorageBackend, StoreError};
use std::sync::Arc;
use tracing::info;

/// Open the store selected by the configured backend.
pub fn open_store(backend: &StorageBackend) -> Result<Arc<dyn RegistrationStore>, StoreError> {
    match backend {
        StorageBackend::Memory => {
            info!("Using in-memory registration store; records are lost on restart");
            Ok(Arc::new(InMemoryRegistrationStore::new()))
        }
        StorageBackend::RocksDb(path) => open_rocksdb(path),
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(path: &std::path::Path) -> Result<Arc<dyn RegistrationStore>, StoreError> {
    use exam_gateway::{RocksDbConfig, RocksDbRegistrationStore};

    let store = RocksDbRegistrationStore::open(RocksDbConfig::at(path))?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(path: &std::path::Path) -> Result<Arc<dyn RegistrationStore>, StoreError> {
    Err(StoreError::Unavailable {
        message: format!(
            "rocksdb://{} requested but exam-node was built without the `rocksdb` feature",
            path.display()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_opens() {
        let store = open_store(&StorageBackend::Memory).unwrap();
        assert!(store.ping().await.is_ok());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[cfg(not(feature = "rocksdb"))]
    #[test]
    fn test_rocksdb_requires_feature() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_store(&StorageBackend::RocksDb(dir.path().to_path_buf()))
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }

    #[cfg(feature = "rocksdb")]
    #[tokio::test]
    async fn test_rocksdb_store_opens() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&StorageBackend::RocksDb(dir.path().join("db"))).unwrap();
        assert!(store.ping().await.is_ok());
    }
}
