use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension};

use super::{schema, PlantStore, StoreError};
use crate::models::PlantState;

/// Keeps the record in a one-row SQLite table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    location: String,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let location = path.display().to_string();
        let conn = Self::connect(path).map_err(|e| StoreError::read(&location, e))?;
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(anyhow::Error::from)
            .and_then(|conn| schema::run_migrations(&conn).map(|_| conn))
            .map_err(|e| StoreError::read(":memory:", e))?;
        Ok(Self {
            conn: Mutex::new(conn),
            location: ":memory:".to_string(),
        })
    }

    fn connect(path: &Path) -> anyhow::Result<Connection> {
        let parent = path
            .parent()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(&parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        schema::run_migrations(&conn)?;
        Ok(conn)
    }
}

impl PlantStore for SqliteStore {
    fn load(&self) -> Result<PlantState, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let state = conn
            .query_row(
                "SELECT life, water_level, last_fed FROM plant WHERE id = 1",
                [],
                |row| Ok(PlantState::new(row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|e| StoreError::read(&self.location, e))?;

        state.ok_or_else(|| StoreError::Missing {
            location: self.location.clone(),
        })
    }

    fn save(&self, state: &PlantState) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO plant (id, life, water_level, last_fed)
             VALUES (1, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                life = excluded.life,
                water_level = excluded.water_level,
                last_fed = excluded.last_fed",
            (state.life, state.water_level, state.last_fed),
        )
        .map_err(|e| StoreError::write(&self.location, e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.location)
    }
}
