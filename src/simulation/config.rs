use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_STATION_NAME: &str = "Metro Police Department";
pub const DEFAULT_STARTER_DISTRICT: &str = "downtown";
pub const DEFAULT_DISPATCHER_STAFF_ID: &str = "dispatcher";

/// Economic and scheduling parameters for the simulation engines.
///
/// Everything tunable lives here so tests can run the engines with varied
/// parameters instead of reaching for module constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Length of one simulation tick in minutes.
    pub tick_interval_minutes: i64,
    /// Maximum wall-clock window a catch-up will replay.
    pub max_catchup_hours: i64,
    /// Minimum ledger balance required before any dispatch is allowed.
    pub minimum_dispatch_balance: i64,
    /// Guaranteed profit margin of a successful mission over its dispatch cost.
    pub profit_margin: f64,
    /// Extra reward fraction per station level above 1.
    pub reward_per_level: f64,
    /// Flat reduction applied to every final success chance.
    pub failure_chance_penalty: i32,
    /// Dispatch tables available before dispatchers and upgrades are counted.
    pub base_dispatch_slots: u32,
    /// Staff catalog id whose availability gates the dispatch center.
    pub dispatcher_staff_id: String,
    /// District every new profile starts with.
    pub starter_district: String,
    /// Display name for newly created stations.
    pub default_station_name: String,
    /// User ids granted automation access without owning the unlock upgrade.
    pub automation_override_users: Vec<u64>,
    /// Fleet size limit per station level; levels absent from the map are
    /// unlimited.
    pub vehicle_capacity_by_level: BTreeMap<u32, u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_minutes: 5,
            max_catchup_hours: 24,
            minimum_dispatch_balance: 100,
            profit_margin: 0.10,
            reward_per_level: 0.015,
            failure_chance_penalty: 3,
            base_dispatch_slots: 1,
            dispatcher_staff_id: DEFAULT_DISPATCHER_STAFF_ID.to_string(),
            starter_district: DEFAULT_STARTER_DISTRICT.to_string(),
            default_station_name: DEFAULT_STATION_NAME.to_string(),
            automation_override_users: Vec::new(),
            vehicle_capacity_by_level: BTreeMap::from([(1, 2)]),
        }
    }
}

impl EngineConfig {
    /// Length of one tick as a chrono duration.
    pub fn tick_interval(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.tick_interval_minutes)
    }

    /// Maximum elapsed time a single catch-up invocation will simulate.
    pub fn max_catchup_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.max_catchup_hours)
    }

    /// Fleet size cap for a station level, `None` meaning unlimited.
    pub fn vehicle_capacity(&self, station_level: u32) -> Option<u32> {
        self.vehicle_capacity_by_level.get(&station_level).copied()
    }

    pub fn is_automation_override(&self, user_id: u64) -> bool {
        self.automation_override_users.contains(&user_id)
    }
}
