//! Persistence for the single plant record.
//!
//! Every backend implements [`PlantStore`]: a full load before each engine
//! operation and a full save after it. There is no partial update and no
//! versioning; the engine actor is the only writer.

mod json;
mod schema;
mod sqlite;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::models::PlantState;

pub use json::JsonFileStore;
pub use sqlite::SqliteStore;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no plant record at {location}")]
    Missing { location: String },

    #[error("failed to read plant record from {location}")]
    Read {
        location: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to write plant record to {location}")]
    Write {
        location: String,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn read(location: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StoreError::Read {
            location: location.into(),
            source: source.into(),
        }
    }

    pub fn write(location: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StoreError::Write {
            location: location.into(),
            source: source.into(),
        }
    }

    /// Whether this error came from loading (absent or unreadable record).
    pub fn is_read(&self) -> bool {
        matches!(self, StoreError::Missing { .. } | StoreError::Read { .. })
    }
}

/// A single-record store for [`PlantState`].
pub trait PlantStore: Send + Sync {
    fn load(&self) -> Result<PlantState, StoreError>;

    fn save(&self, state: &PlantState) -> Result<(), StoreError>;

    /// Human-readable location used in logs.
    fn describe(&self) -> String;
}

/// Which backend holds the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Json,
    Sqlite,
}

impl StoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKind::Json => "json",
            StoreKind::Sqlite => "sqlite",
        }
    }

    /// Where the record lives when no path is configured.
    pub fn default_path(self) -> anyhow::Result<PathBuf> {
        match self {
            StoreKind::Json => Ok(PathBuf::from("./data.json")),
            StoreKind::Sqlite => {
                let dirs = directories::ProjectDirs::from("", "", "plantbot")
                    .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
                Ok(dirs.data_dir().join("plantbot.db"))
            }
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(StoreKind::Json),
            "sqlite" => Ok(StoreKind::Sqlite),
            other => Err(format!("unknown store kind: {}", other)),
        }
    }
}

/// Open the configured backend.
pub fn open(kind: StoreKind, path: &Path) -> Result<Arc<dyn PlantStore>, StoreError> {
    let store: Arc<dyn PlantStore> = match kind {
        StoreKind::Json => Arc::new(JsonFileStore::new(path)),
        StoreKind::Sqlite => Arc::new(SqliteStore::open(path)?),
    };
    Ok(store)
}

/// Keeps the record in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<PlantState>>,
}

impl MemoryStore {
    pub fn new(state: PlantState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The last saved state, without going through `load`.
    pub fn peek(&self) -> Option<PlantState> {
        *self.state.lock().expect("memory store lock poisoned")
    }
}

impl PlantStore for MemoryStore {
    fn load(&self) -> Result<PlantState, StoreError> {
        self.peek().ok_or_else(|| StoreError::Missing {
            location: self.describe(),
        })
    }

    fn save(&self, state: &PlantState) -> Result<(), StoreError> {
        *self.state.lock().expect("memory store lock poisoned") = Some(*state);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
