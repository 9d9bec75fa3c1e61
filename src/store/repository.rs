use thiserror::Error;

use crate::simulation::profile::Profile;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("corrupt profile record for user {user_id}: {source}")]
    Corrupt {
        user_id: u64,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    InvalidData(String),
}

/// Persistence seam for player profiles: plain key-value by user id.
pub trait ProfileStore: Send {
    fn load(&mut self, user_id: u64) -> Result<Option<Profile>, StoreError>;
    fn save(&mut self, profile: &Profile) -> Result<(), StoreError>;
    fn delete(&mut self, user_id: u64) -> Result<(), StoreError>;
}
