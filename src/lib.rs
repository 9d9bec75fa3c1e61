// Re-export core modules for use by the binary or other consumers
pub mod content;
pub mod core;
pub mod data;
pub mod ledger;
pub mod simulation;
pub mod store;
pub mod systems;

// Expose the main service wrapper and the types callers interact with
pub use crate::content::{Catalog, PackError};
pub use crate::core::{CommandError, DispatchReceipt, GameService, RefreshOutcome};
pub use crate::ledger::{Ledger, LedgerError, MemoryLedger};
pub use crate::simulation::{ActiveMission, EngineConfig, Profile};
pub use crate::store::{MemoryProfileStore, ProfileStore, SqliteProfileStore, StoreError};
pub use crate::systems::{AutomationStatus, CatchupReport, DispatchBlock, ResolutionReport};
