pub mod automation;
pub mod dispatch;
pub mod economy;
pub mod resolution;
pub mod tick;

pub use automation::AutomationStatus;
pub use dispatch::{DispatchBlock, DispatchOutcome};
pub use economy::{OperatingCosts, TickCosts};
pub use resolution::{MissionOutcome, ResolutionReport};
pub use tick::CatchupReport;
