pub mod memory;
pub mod repository;
pub mod sqlite;

pub use memory::MemoryProfileStore;
pub use repository::{ProfileStore, StoreError};
pub use sqlite::SqliteProfileStore;
