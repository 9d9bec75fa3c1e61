pub mod catalog;
pub mod pack;

pub use catalog::{
    Catalog, District, Equipment, EquipmentEffect, EquipmentTarget, Mission, MissionFilters,
    Policy, Staff, Upgrade, UpgradeEffect, Vehicle,
};
pub use pack::{load_dir, PackError};
