//! Mission economics.
//!
//! Pure calculations over a profile, the catalog, and the engine config.
//! Monetary math truncates at every multiplication step, in a fixed order;
//! displayed values depend on that compounding, so the order is load-bearing.

use chrono::{DateTime, Utc};

use crate::content::catalog::{Catalog, Mission, UpgradeEffect};
use crate::simulation::config::EngineConfig;
use crate::simulation::profile::Profile;

/// Cost breakdown for a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingCosts {
    pub fuel: i64,
    pub maintenance: i64,
    pub salaries: i64,
    pub total: i64,
}

/// Flat per-tick upkeep for everything the station owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCosts {
    pub salaries: i64,
    pub maintenance: i64,
    pub total: i64,
}

/// Mission-specific operating costs: fuel after cost-reduction upgrades, plus
/// maintenance and salaries for the units the mission will actually consume,
/// prorated by mission duration over the tick interval.
///
/// The consumption walk mirrors the allocation walk in dispatch: each
/// required type is satisfied from catalog entries in id order, taking
/// `min(required, owned)` per entry.
pub fn operating_costs(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &Profile,
    mission: &Mission,
) -> OperatingCosts {
    let mut cost_multiplier = 1.0;
    for upgrade_id in &profile.owned_upgrades {
        if let Some(upgrade) = catalog.upgrade(upgrade_id) {
            if upgrade.effect_type == UpgradeEffect::CostReduction {
                cost_multiplier *= 1.0 - upgrade.effect_value;
            }
        }
    }
    let fuel = ((mission.fuel_cost as f64 * cost_multiplier) as i64).max(1);

    let duration_factor =
        mission.base_duration_minutes as f64 / config.tick_interval_minutes as f64;

    let mut maintenance = 0i64;
    for (vehicle_type, quantity) in mission.vehicle_requirements() {
        let mut needed = quantity;
        for vehicle in catalog.vehicles.values() {
            if vehicle.vehicle_type != vehicle_type {
                continue;
            }
            let owned = profile.vehicle_count(&vehicle.id);
            if owned == 0 {
                continue;
            }
            let used = needed.min(owned);
            maintenance += (vehicle.maintenance_cost as f64 * duration_factor * used as f64) as i64;
            needed -= used;
            if needed == 0 {
                break;
            }
        }
    }

    let mut salaries = 0i64;
    for (staff_type, quantity) in mission.staff_requirements() {
        let mut needed = quantity;
        for staff in catalog.staff.values() {
            if staff.staff_type != staff_type {
                continue;
            }
            let owned = profile.staff_count(&staff.id);
            if owned == 0 {
                continue;
            }
            let used = needed.min(owned);
            salaries += (staff.salary_per_tick as f64 * duration_factor * used as f64) as i64;
            needed -= used;
            if needed == 0 {
                break;
            }
        }
    }

    let total = (fuel + maintenance + salaries).max(1);
    OperatingCosts {
        fuel,
        maintenance,
        salaries,
        total,
    }
}

/// Total cost to dispatch a mission right now.
pub fn dispatch_cost(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &Profile,
    mission: &Mission,
) -> i64 {
    operating_costs(config, catalog, profile, mission).total
}

/// Success chance for a mission, clamped to 5-95.
///
/// Takes `&mut Profile` because availability queries prune expired cooldowns
/// lazily; the result is deterministic for a given profile state and `now`.
pub fn success_chance(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &mut Profile,
    mission: &Mission,
    now: DateTime<Utc>,
) -> i32 {
    let mut base_chance = mission.base_success_chance as f64;

    if let Some(district) = catalog.district(&profile.current_district) {
        base_chance -= district.mission_difficulty_modifier as f64;
    }

    // One available staff member per required slot contributes its bonus; the
    // first matching catalog entry wins, not every body on the roster.
    let mut staff_bonus = 0.0;
    for staff_type in &mission.required_staff_types {
        for staff in catalog.staff.values() {
            if &staff.staff_type == staff_type && profile.is_staff_available(&staff.id, now) {
                staff_bonus += staff.success_bonus - 1.0;
                break;
            }
        }
    }

    let mut upgrade_bonus = 0.0;
    for upgrade_id in &profile.owned_upgrades {
        if let Some(upgrade) = catalog.upgrade(upgrade_id) {
            if upgrade.effect_type == UpgradeEffect::SuccessBoost {
                upgrade_bonus += upgrade.effect_value;
            }
        }
    }

    let mut final_chance = base_chance * (1.0 + staff_bonus + upgrade_bonus);

    // -0.5..=0.5 across the reputation range, worth +/-5 points at extremes.
    let reputation_modifier = (profile.reputation - 50) as f64 / 100.0;
    final_chance += reputation_modifier * 10.0;

    final_chance -= config.failure_chance_penalty as f64;

    (final_chance as i32).clamp(5, 95)
}

/// Reward paid on success, floored so a dispatch can never be a net loss.
pub fn mission_reward(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &Profile,
    mission: &Mission,
) -> i64 {
    let mut reward = mission.base_reward;

    let level_multiplier =
        1.0 + profile.station_level.saturating_sub(1) as f64 * config.reward_per_level;
    reward = (reward as f64 * level_multiplier) as i64;

    if let Some(district) = catalog.district(&profile.current_district) {
        reward = (reward as f64 * district.mission_reward_multiplier) as i64;
    }

    let mut income_multiplier = 1.0;
    for upgrade_id in &profile.owned_upgrades {
        if let Some(upgrade) = catalog.upgrade(upgrade_id) {
            if upgrade.effect_type == UpgradeEffect::IncomeBoost {
                income_multiplier *= 1.0 + upgrade.effect_value;
            }
        }
    }
    reward = (reward as f64 * income_multiplier) as i64;

    let cost = dispatch_cost(config, catalog, profile, mission);
    let minimum_profitable = (cost as f64 * (1.0 + config.profit_margin)) as i64;

    reward.max(minimum_profitable).max(1)
}

/// Recurring per-tick upkeep: every salary and every maintenance bill, flat,
/// not duration-prorated. Ids that vanished from the catalog are skipped.
pub fn tick_costs(catalog: &Catalog, profile: &Profile) -> TickCosts {
    let mut salaries = 0i64;
    for (staff_id, count) in &profile.staff_roster {
        if let Some(staff) = catalog.staff_member(staff_id) {
            salaries += staff.salary_per_tick * *count as i64;
        }
    }

    let mut maintenance = 0i64;
    for (vehicle_id, count) in &profile.owned_vehicles {
        if let Some(vehicle) = catalog.vehicle(vehicle_id) {
            maintenance += vehicle.maintenance_cost * *count as i64;
        }
    }

    TickCosts {
        salaries,
        maintenance,
        total: salaries + maintenance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::standard_catalog;

    fn ready_profile() -> Profile {
        let mut profile = Profile::new(1, &EngineConfig::default());
        profile.add_vehicle("patrol_car", 1);
        profile.add_staff("officer", 1);
        profile.add_staff("dispatcher", 1);
        profile
    }

    #[test]
    fn calculations_are_deterministic() {
        let config = EngineConfig::default();
        let catalog = standard_catalog();
        let mut profile = ready_profile();
        let mission = catalog.mission("shoplifting").unwrap().clone();
        let now = Utc::now();

        let cost_a = dispatch_cost(&config, &catalog, &profile, &mission);
        let cost_b = dispatch_cost(&config, &catalog, &profile, &mission);
        assert_eq!(cost_a, cost_b);

        let reward_a = mission_reward(&config, &catalog, &profile, &mission);
        let reward_b = mission_reward(&config, &catalog, &profile, &mission);
        assert_eq!(reward_a, reward_b);

        let chance_a = success_chance(&config, &catalog, &mut profile, &mission, now);
        let chance_b = success_chance(&config, &catalog, &mut profile, &mission, now);
        assert_eq!(chance_a, chance_b);
    }

    #[test]
    fn success_chance_stays_in_bounds() {
        let config = EngineConfig::default();
        let catalog = standard_catalog();
        let mut profile = ready_profile();
        let now = Utc::now();

        let missions: Vec<Mission> = catalog.missions.values().cloned().collect();
        for mission in &missions {
            for reputation in [0, 50, 100] {
                profile.reputation = reputation;
                let chance = success_chance(&config, &catalog, &mut profile, mission, now);
                assert!((5..=95).contains(&chance), "chance {chance} out of bounds");
            }
        }
    }

    #[test]
    fn guaranteed_success_clamps_to_ninety_five() {
        let config = EngineConfig::default();
        let catalog = standard_catalog();
        let mut profile = ready_profile();
        let now = Utc::now();

        let mut mission = catalog.mission("noise_complaint").unwrap().clone();
        mission.base_success_chance = 100;
        mission.required_staff_types.clear();
        // No staff bonus, neutral reputation: 100 - 3 = 97, clamped to 95.
        let chance = success_chance(&config, &catalog, &mut profile, &mission, now);
        assert_eq!(chance, 95);
    }

    #[test]
    fn reward_always_covers_cost_plus_margin() {
        let config = EngineConfig::default();
        let catalog = standard_catalog();
        let profile = ready_profile();

        for mission in catalog.missions.values() {
            let cost = dispatch_cost(&config, &catalog, &profile, mission);
            let reward = mission_reward(&config, &catalog, &profile, mission);
            let floor = (cost as f64 * (1.0 + config.profit_margin)) as i64;
            assert!(
                reward >= floor,
                "mission {} reward {reward} below floor {floor}",
                mission.id
            );
        }
    }

    #[test]
    fn reward_truncates_at_each_multiplication_step() {
        let config = EngineConfig::default();
        let catalog = standard_catalog();
        let mut profile = ready_profile();
        profile.station_level = 2;
        profile.current_district = "harbor".to_string();

        let mut mission = catalog.mission("noise_complaint").unwrap().clone();
        mission.base_reward = 101;
        mission.fuel_cost = 5;
        mission.required_vehicle_types.clear();
        mission.required_staff_types.clear();

        // Stepwise: 101 * 1.015 = 102.515 -> 102; 102 * 1.2 = 122.4 -> 122.
        // A single combined multiplication would give 123.
        let reward = mission_reward(&config, &catalog, &profile, &mission);
        assert_eq!(reward, 122);
    }

    #[test]
    fn operating_costs_prorate_by_duration() {
        let config = EngineConfig::default();
        let catalog = standard_catalog();
        let profile = ready_profile();
        let mission = catalog.mission("burglary_investigation").unwrap();

        // 45 minute mission over 5 minute ticks: factor 9. One patrol car at
        // 4/tick = 36 maintenance; one officer at 2/tick = 18 (the detective
        // slot goes uncosted, nobody is hired for it).
        let costs = operating_costs(&config, &catalog, &profile, mission);
        assert_eq!(costs.fuel, 12);
        assert_eq!(costs.maintenance, 36);
        assert_eq!(costs.salaries, 18);
        assert_eq!(costs.total, 66);
    }

    #[test]
    fn cost_reduction_upgrades_shrink_fuel_only() {
        let config = EngineConfig::default();
        let catalog = standard_catalog();
        let mut profile = ready_profile();
        let mission = catalog.mission("shoplifting").unwrap();

        let before = operating_costs(&config, &catalog, &profile, mission);
        profile.owned_upgrades.insert("fuel_contract".to_string());
        let after = operating_costs(&config, &catalog, &profile, mission);

        // fuel 8 * 0.85 = 6.8 -> 6
        assert_eq!(before.fuel, 8);
        assert_eq!(after.fuel, 6);
        assert_eq!(after.maintenance, before.maintenance);
        assert_eq!(after.salaries, before.salaries);
    }

    #[test]
    fn tick_costs_are_flat_sums_over_everything_owned() {
        let catalog = standard_catalog();
        let mut profile = Profile::new(1, &EngineConfig::default());
        profile.add_vehicle("patrol_car", 2);
        profile.add_staff("officer", 3);
        profile.add_staff("dispatcher", 1);
        // Unknown ids degrade to zero cost instead of failing the read.
        profile.add_vehicle("retired_model", 1);

        let costs = tick_costs(&catalog, &profile);
        assert_eq!(costs.maintenance, 8);
        assert_eq!(costs.salaries, 9);
        assert_eq!(costs.total, 17);
    }
}
