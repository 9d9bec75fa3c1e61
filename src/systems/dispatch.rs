//! Dispatch engine: commits resources to a mission and freezes its economics.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::content::catalog::{Catalog, Mission, UpgradeEffect};
use crate::simulation::config::EngineConfig;
use crate::simulation::mission::ActiveMission;
use crate::simulation::profile::Profile;
use crate::systems::economy;

/// Why a dispatch was refused. Surfaced to the caller as a value; the
/// presentation layer decides the wording shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchBlock {
    /// The dispatch center has nobody on duty.
    NoDispatcher,
    /// Station level below the mission's minimum.
    StationLevel { required: u32 },
    /// Not enough ready vehicles of a required type.
    Vehicles { vehicle_type: String, needed: u32 },
    /// Not enough ready staff of a required type.
    Staff { staff_type: String, needed: u32 },
}

impl fmt::Display for DispatchBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchBlock::NoDispatcher => {
                write!(f, "dispatch center requires a dispatcher on duty")
            }
            DispatchBlock::StationLevel { required } => {
                write!(f, "requires station level {}", required)
            }
            DispatchBlock::Vehicles {
                vehicle_type,
                needed,
            } => write!(f, "need {} available {} vehicle(s)", needed, vehicle_type),
            DispatchBlock::Staff { staff_type, needed } => {
                write!(f, "need {} available {} staff", needed, staff_type)
            }
        }
    }
}

/// Result of a successful dispatch: the frozen mission record plus the ledger
/// delta (negative; the cost is paid upfront and never refunded).
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub mission: ActiveMission,
    pub balance_change: i64,
}

/// Dispatchers currently on duty and off cooldown.
pub fn available_dispatcher_count(
    config: &EngineConfig,
    profile: &mut Profile,
    now: DateTime<Utc>,
) -> u32 {
    profile.available_staff_count(&config.dispatcher_staff_id, now)
}

pub fn has_active_dispatcher(
    config: &EngineConfig,
    profile: &mut Profile,
    now: DateTime<Utc>,
) -> bool {
    available_dispatcher_count(config, profile, now) > 0
}

/// Concurrent-dispatch capacity: the base table count, raised to at least the
/// number of dispatchers on duty, plus flat capacity-upgrade bonuses. Never
/// below one.
pub fn dispatch_table_count(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &mut Profile,
    now: DateTime<Utc>,
) -> u32 {
    let mut tables = config
        .base_dispatch_slots
        .max(available_dispatcher_count(config, profile, now));

    for upgrade_id in profile.owned_upgrades.iter() {
        if let Some(upgrade) = catalog.upgrade(upgrade_id) {
            if upgrade.effect_type == UpgradeEffect::DispatchCapacity {
                tables += upgrade.effect_value as u32;
            }
        }
    }

    tables.max(1)
}

/// Tables currently free for more work; zero whenever nobody is at the desk.
pub fn free_dispatch_slots(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &mut Profile,
    now: DateTime<Utc>,
) -> u32 {
    if !has_active_dispatcher(config, profile, now) {
        return 0;
    }
    let tables = dispatch_table_count(config, catalog, profile, now);
    tables.saturating_sub(profile.active_missions.len() as u32)
}

/// Checks every dispatch precondition, failing closed with the first reason
/// that applies.
pub fn can_dispatch(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &mut Profile,
    mission: &Mission,
    now: DateTime<Utc>,
) -> Result<(), DispatchBlock> {
    if !has_active_dispatcher(config, profile, now) {
        return Err(DispatchBlock::NoDispatcher);
    }

    if profile.station_level < mission.min_station_level {
        return Err(DispatchBlock::StationLevel {
            required: mission.min_station_level,
        });
    }

    for (vehicle_type, needed) in mission.vehicle_requirements() {
        let mut available = 0;
        for vehicle in catalog.vehicles.values() {
            if vehicle.vehicle_type == vehicle_type {
                available += profile.available_vehicle_count(&vehicle.id, now);
            }
        }
        if available < needed {
            return Err(DispatchBlock::Vehicles {
                vehicle_type,
                needed,
            });
        }
    }

    for (staff_type, needed) in mission.staff_requirements() {
        let mut available = 0;
        for staff in catalog.staff.values() {
            if staff.staff_type == staff_type {
                available += profile.available_staff_count(&staff.id, now);
            }
        }
        if available < needed {
            return Err(DispatchBlock::Staff { staff_type, needed });
        }
    }

    Ok(())
}

/// Executes a dispatch: freezes cost, reward and success chance into a new
/// [`ActiveMission`], walks the requirements again to put the consumed units
/// on cooldown (each unit's cooldown comes from its own catalog entry), and
/// pays the operating cost into lifetime expenses.
///
/// Dispatch never consumes inventory, only availability.
pub fn dispatch_mission(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &mut Profile,
    mission: &Mission,
    now: DateTime<Utc>,
) -> Result<DispatchOutcome, DispatchBlock> {
    can_dispatch(config, catalog, profile, mission, now)?;

    let costs = economy::operating_costs(config, catalog, profile, mission);
    let success_chance = economy::success_chance(config, catalog, profile, mission, now);
    let reward = economy::mission_reward(config, catalog, profile, mission);

    for (vehicle_type, quantity) in mission.vehicle_requirements() {
        let mut needed = quantity;
        for vehicle in catalog.vehicles.values() {
            if vehicle.vehicle_type != vehicle_type {
                continue;
            }
            if needed == 0 {
                break;
            }
            let available = profile.available_vehicle_count(&vehicle.id, now);
            if available == 0 {
                continue;
            }
            let assign = needed.min(available);
            let cooldown_end = now + Duration::minutes(vehicle.cooldown_minutes);
            profile.allocate_vehicles(&vehicle.id, assign, cooldown_end, now);
            needed -= assign;
        }
    }

    for (staff_type, quantity) in mission.staff_requirements() {
        let mut needed = quantity;
        for staff in catalog.staff.values() {
            if staff.staff_type != staff_type {
                continue;
            }
            if needed == 0 {
                break;
            }
            let available = profile.available_staff_count(&staff.id, now);
            if available == 0 {
                continue;
            }
            let assign = needed.min(available);
            let cooldown_end = now + Duration::minutes(staff.cooldown_minutes);
            profile.allocate_staff(&staff.id, assign, cooldown_end, now);
            needed -= assign;
        }
    }

    let active = ActiveMission {
        mission_id: mission.id.clone(),
        name: mission.name.clone(),
        dispatched_at: now,
        ends_at: now + Duration::minutes(mission.base_duration_minutes),
        operating_cost: costs.total,
        potential_reward: reward,
        success_chance,
        heat_change: mission.heat_change,
        reputation_success: mission.reputation_change_success,
        reputation_failure: mission.reputation_change_failure,
    };
    profile.add_active_mission(active.clone());
    profile.stats.expenses_paid += costs.total;

    info!(
        target: "precinct.dispatch",
        user_id = profile.user_id,
        mission_id = %mission.id,
        cost = costs.total,
        reward,
        success_chance,
        "units dispatched"
    );

    Ok(DispatchOutcome {
        mission: active,
        balance_change: -costs.total,
    })
}
