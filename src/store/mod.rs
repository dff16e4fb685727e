mod error;
mod file;
mod memory;
mod record;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::{SatelliteId, SatelliteRecord, SatelliteStatus, StoredSatellite};

/// Persistence for satellite records. Records are replaced by re-adding and
/// never partially updated; concurrent writers resolve as last write wins.
pub trait SatelliteStore: Send + Sync {
    fn insert(&self, record: SatelliteRecord) -> Result<SatelliteId, StoreError>;

    fn find_all(&self) -> Result<Vec<StoredSatellite>, StoreError>;

    fn find_by_id(&self, id: &SatelliteId) -> Result<Option<StoredSatellite>, StoreError>;

    /// Number of records removed (0 or 1).
    fn delete_by_id(&self, id: &SatelliteId) -> Result<usize, StoreError>;
}
