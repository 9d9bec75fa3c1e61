use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::simulation::profile::Profile;
use crate::store::repository::{ProfileStore, StoreError};

const STORE_SCHEMA_VERSION: i64 = 1;

const STORE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS store_meta (
  id INTEGER PRIMARY KEY CHECK (id = 1),
  schema_version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
  user_id INTEGER PRIMARY KEY,
  data TEXT NOT NULL,
  updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// SQLite-backed profile store. Each profile is one JSON document keyed by
/// user id; nested maps and ISO-8601 timestamps come straight from the
/// profile's serde representation.
pub struct SqliteProfileStore {
    conn: Connection,
}

impl SqliteProfileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, used by tests and throwaway demos.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(STORE_SCHEMA)?;
        let store = Self { conn };
        store.ensure_meta()?;
        Ok(store)
    }

    fn ensure_meta(&self) -> Result<(), StoreError> {
        let version: Option<i64> = self
            .conn
            .query_row(
                "SELECT schema_version FROM store_meta WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match version {
            Some(version) if version == STORE_SCHEMA_VERSION => Ok(()),
            Some(version) => Err(StoreError::InvalidData(format!(
                "profile store schema version mismatch (found {}, expected {})",
                version, STORE_SCHEMA_VERSION
            ))),
            None => {
                self.conn.execute(
                    "INSERT INTO store_meta (id, schema_version) VALUES (1, ?1)",
                    params![STORE_SCHEMA_VERSION],
                )?;
                Ok(())
            }
        }
    }
}

impl ProfileStore for SqliteProfileStore {
    fn load(&mut self, user_id: u64) -> Result<Option<Profile>, StoreError> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM profiles WHERE user_id = ?1",
                params![user_id as i64],
                |row| row.get(0),
            )
            .optional()?;

        match data {
            Some(data) => {
                let profile = serde_json::from_str(&data)
                    .map_err(|source| StoreError::Corrupt { user_id, source })?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    fn save(&mut self, profile: &Profile) -> Result<(), StoreError> {
        let data = serde_json::to_string(profile).map_err(|source| StoreError::Corrupt {
            user_id: profile.user_id,
            source,
        })?;
        self.conn.execute(
            "INSERT INTO profiles (user_id, data, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(user_id) DO UPDATE SET data = ?2, updated_at = datetime('now')",
            params![profile.user_id as i64, data],
        )?;
        Ok(())
    }

    fn delete(&mut self, user_id: u64) -> Result<(), StoreError> {
        let removed = self.conn.execute(
            "DELETE FROM profiles WHERE user_id = ?1",
            params![user_id as i64],
        )?;
        if removed > 0 {
            info!(target: "precinct.store", user_id, "profile deleted");
        }
        Ok(())
    }
}
