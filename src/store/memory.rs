use std::sync::{PoisonError, RwLock};

use crate::store::error::StoreError;
use crate::store::record::{SatelliteId, SatelliteRecord, StoredSatellite};
use crate::store::SatelliteStore;

/// Process-local store, kept in insertion order. Used when no storage
/// folder is configured.
#[derive(Default)]
pub struct MemoryStore {
    satellites: RwLock<Vec<StoredSatellite>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SatelliteStore for MemoryStore {
    fn insert(&self, record: SatelliteRecord) -> Result<SatelliteId, StoreError> {
        let id = SatelliteId::generate();
        let mut satellites = self.satellites.write().unwrap_or_else(PoisonError::into_inner);
        satellites.push(StoredSatellite { id, record });
        Ok(id)
    }

    fn find_all(&self) -> Result<Vec<StoredSatellite>, StoreError> {
        let satellites = self.satellites.read().unwrap_or_else(PoisonError::into_inner);
        Ok(satellites.clone())
    }

    fn find_by_id(&self, id: &SatelliteId) -> Result<Option<StoredSatellite>, StoreError> {
        let satellites = self.satellites.read().unwrap_or_else(PoisonError::into_inner);
        Ok(satellites.iter().find(|s| s.id == *id).cloned())
    }

    fn delete_by_id(&self, id: &SatelliteId) -> Result<usize, StoreError> {
        let mut satellites = self.satellites.write().unwrap_or_else(PoisonError::into_inner);
        let before = satellites.len();
        satellites.retain(|s| s.id != *id);
        Ok(before - satellites.len())
    }
}
