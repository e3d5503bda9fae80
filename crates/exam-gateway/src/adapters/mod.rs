//! Adapters: storage backends, the photo upload directory, and HTTP error
//! mapping.

pub mod error_conversions;
pub mod storage;
pub mod uploads;

pub use storage::InMemoryRegistrationStore;
#[cfg(feature = "rocksdb")]
pub use storage::{RocksDbConfig, RocksDbRegistrationStore};
pub use uploads::{PhotoStore, StoredPhoto};
