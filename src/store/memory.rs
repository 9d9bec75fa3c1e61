use std::collections::BTreeMap;

use crate::simulation::profile::Profile;
use crate::store::repository::{ProfileStore, StoreError};

/// In-memory profile store for tests. Records go through the same JSON
/// representation as the SQLite store so serialization stays exercised.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    records: BTreeMap<u64, String>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&mut self, user_id: u64) -> Result<Option<Profile>, StoreError> {
        match self.records.get(&user_id) {
            Some(data) => {
                let profile = serde_json::from_str(data)
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
        self.records.insert(profile.user_id, data);
        Ok(())
    }

    fn delete(&mut self, user_id: u64) -> Result<(), StoreError> {
        self.records.remove(&user_id);
        Ok(())
    }
}
