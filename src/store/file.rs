use std::io::ErrorKind;
use std::path::PathBuf;

use log::error;

use crate::store::error::StoreError;
use crate::store::record::{SatelliteId, SatelliteRecord, StoredSatellite};
use crate::store::SatelliteStore;

/// One YAML document per satellite, named `<id>.yaml`, in a single folder.
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        FileStore { base }
    }

    fn record_path(&self, id: &SatelliteId) -> PathBuf {
        self.base.join(format!("{}.yaml", id))
    }

    fn read_record(&self, id: &SatelliteId) -> Result<Option<SatelliteRecord>, StoreError> {
        match std::fs::read_to_string(self.record_path(id)) {
            Ok(content) => Ok(Some(serde_yaml::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl SatelliteStore for FileStore {
    fn insert(&self, record: SatelliteRecord) -> Result<SatelliteId, StoreError> {
        std::fs::create_dir_all(&self.base)?;

        let id = SatelliteId::generate();
        let content = serde_yaml::to_string(&record)?;
        std::fs::write(self.record_path(&id), content)?;
        Ok(id)
    }

    fn find_all(&self) -> Result<Vec<StoredSatellite>, StoreError> {
        if !self.base.exists() {
            return Ok(Vec::new());
        }

        let mut satellites = Vec::new();
        for entry in self.base.read_dir()? {
            let entry_path = entry?.path();

            let is_yaml = entry_path.extension().and_then(|e| e.to_str()) == Some("yaml");
            if !entry_path.is_file() || !is_yaml {
                continue;
            }

            let Some(id) = entry_path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<SatelliteId>().ok())
            else {
                continue;
            };

            match self.read_record(&id) {
                Ok(Some(record)) => satellites.push(StoredSatellite { id, record }),
                Ok(None) => {}
                Err(e) => error!("Failed to read satellite {}: {}", id, e),
            }
        }

        satellites.sort_by(|a, b| {
            a.record
                .name
                .cmp(&b.record.name)
                .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
        });
        Ok(satellites)
    }

    fn find_by_id(&self, id: &SatelliteId) -> Result<Option<StoredSatellite>, StoreError> {
        Ok(self
            .read_record(id)?
            .map(|record| StoredSatellite { id: *id, record }))
    }

    fn delete_by_id(&self, id: &SatelliteId) -> Result<usize, StoreError> {
        match std::fs::remove_file(self.record_path(id)) {
            Ok(()) => Ok(1),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
