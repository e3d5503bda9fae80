use crate::domain::{Registration, RegistrationId, StoreError};
use crate::ports::RegistrationStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory registration store.
///
/// The record map and the identity-number index are updated under one write
/// lock, so the uniqueness check and the insert are a single step.
#[derive(Default)]
pub struct InMemoryRegistrationStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    records: HashMap<RegistrationId, Registration>,
    by_identity: HashMap<String, RegistrationId>,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn insert(&self, registration: &Registration) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.by_identity.contains_key(&registration.citizen_id) {
            return Err(StoreError::Duplicate {
                identity_number: registration.citizen_id.clone(),
            });
        }
        inner
            .by_identity
            .insert(registration.citizen_id.clone(), registration.id);
        inner.records.insert(registration.id, registration.clone());
        Ok(())
    }

    async fn get(&self, id: &RegistrationId) -> Result<Option<Registration>, StoreError> {
        Ok(self.inner.read().records.get(id).cloned())
    }

    async fn find_by_identity_number(
        &self,
        identity_number: &str,
    ) -> Result<Option<Registration>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .by_identity
            .get(identity_number)
            .and_then(|id| inner.records.get(id))
            .cloned())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().records.len())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
