pub mod config;
pub mod mission;
pub mod profile;

pub use config::EngineConfig;
pub use mission::ActiveMission;
pub use profile::{AssignmentTarget, EquipmentAssignments, LifetimeStats, Profile, SlotUsage};
