use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PlantStore, StoreError};
use crate::models::PlantState;

/// Stores the record as a small JSON document, e.g.
/// `{"life":100,"lastFed":1660435200000,"waterLevel":50}`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PlantStore for JsonFileStore {
    fn load(&self) -> Result<PlantState, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::Missing {
                    location: self.describe(),
                })
            }
            Err(e) => return Err(StoreError::read(self.describe(), e)),
        };
        serde_json::from_str(&raw).map_err(|e| StoreError::read(self.describe(), e))
    }

    /// Writes a sibling `.tmp` file and renames it over the record, so a
    /// crash mid-write leaves the previous record intact.
    fn save(&self, state: &PlantState) -> Result<(), StoreError> {
        let body = serde_json::to_string(state).map_err(|e| StoreError::write(self.describe(), e))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::write(self.describe(), e))?;
        }
        let staging = self.staging_path();
        std::fs::write(&staging, body).map_err(|e| StoreError::write(self.describe(), e))?;
        std::fs::rename(&staging, &self.path).map_err(|e| StoreError::write(self.describe(), e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
