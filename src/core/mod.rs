pub mod locks;
pub mod service;

pub use locks::LockArena;
pub use service::{CommandError, DispatchReceipt, GameService, RefreshOutcome};
