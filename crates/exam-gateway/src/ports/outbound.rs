//! Outbound ports for the registration gateway.

use crate::domain::{Registration, RegistrationId, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence contract for registration records.
///
/// Implementations own the uniqueness guarantee: of any set of concurrent
/// `insert` calls carrying the same `citizen_id`, exactly one succeeds and
/// the rest fail with [`StoreError::Duplicate`].
///
/// Production: `RocksDbRegistrationStore` (feature `rocksdb`)
/// Testing: `InMemoryRegistrationStore`
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, registration: &Registration) -> Result<(), StoreError>;

    /// Get a record by id.
    async fn get(&self, id: &RegistrationId) -> Result<Option<Registration>, StoreError>;

    /// Get a record by its unique identity number.
    async fn find_by_identity_number(
        &self,
        identity_number: &str,
    ) -> Result<Option<Registration>, StoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize, StoreError>;

    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Time source trait for testability
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System time implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
