//! Built-in standard content pack.
//!
//! Gives the demo binary and the tests a realistic catalog without needing
//! JSON packs on disk. Deployments normally extend or replace this via
//! `content::pack::load_dir`.

use crate::content::catalog::{
    Catalog, District, Equipment, EquipmentEffect, EquipmentTarget, Mission, MissionFilters,
    Policy, Staff, Upgrade, UpgradeEffect, Vehicle,
};

/// The standard playable catalog.
pub fn standard_catalog() -> Catalog {
    let mut catalog = Catalog::default();

    for district in districts() {
        catalog.districts.insert(district.id.clone(), district);
    }
    for vehicle in vehicles() {
        catalog.vehicles.insert(vehicle.id.clone(), vehicle);
    }
    for member in staff() {
        catalog.staff.insert(member.id.clone(), member);
    }
    for mission in missions() {
        catalog.missions.insert(mission.id.clone(), mission);
    }
    for upgrade in upgrades() {
        catalog.upgrades.insert(upgrade.id.clone(), upgrade);
    }
    for item in equipment() {
        catalog.equipment.insert(item.id.clone(), item);
    }
    for policy in policies() {
        catalog.policies.insert(policy.id.clone(), policy);
    }

    catalog
}

fn districts() -> Vec<District> {
    vec![
        District {
            id: "downtown".into(),
            name: "Downtown".into(),
            description: "The starter beat around the station.".into(),
            unlock_cost: 0,
            mission_reward_multiplier: 1.0,
            mission_difficulty_modifier: 0,
            min_station_level: 1,
        },
        District {
            id: "harbor".into(),
            name: "Harbor".into(),
            description: "Container yards and night shifts.".into(),
            unlock_cost: 2_500,
            mission_reward_multiplier: 1.2,
            mission_difficulty_modifier: 5,
            min_station_level: 1,
        },
        District {
            id: "old_town".into(),
            name: "Old Town".into(),
            description: "Narrow streets, easy patrols.".into(),
            unlock_cost: 1_200,
            mission_reward_multiplier: 1.1,
            mission_difficulty_modifier: -5,
            min_station_level: 1,
        },
    ]
}

fn vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle {
            id: "patrol_car".into(),
            name: "Patrol Car".into(),
            description: "Standard cruiser.".into(),
            vehicle_type: "patrol".into(),
            purchase_cost: 800,
            maintenance_cost: 4,
            fuel_efficiency: 1.0,
            cooldown_minutes: 10,
            seating_capacity: 2,
            prisoner_capacity: 1,
            equipment_slots: 2,
            min_station_level: 1,
        },
        Vehicle {
            id: "transport_van".into(),
            name: "Transport Van".into(),
            description: "Moves a whole shift at once.".into(),
            vehicle_type: "transport".into(),
            purchase_cost: 1_500,
            maintenance_cost: 7,
            fuel_efficiency: 1.3,
            cooldown_minutes: 20,
            seating_capacity: 6,
            prisoner_capacity: 4,
            equipment_slots: 3,
            min_station_level: 1,
        },
        Vehicle {
            id: "swat_truck".into(),
            name: "SWAT Truck".into(),
            description: "Armored response vehicle.".into(),
            vehicle_type: "tactical".into(),
            purchase_cost: 4_000,
            maintenance_cost: 15,
            fuel_efficiency: 1.6,
            cooldown_minutes: 45,
            seating_capacity: 8,
            prisoner_capacity: 2,
            equipment_slots: 4,
            min_station_level: 1,
        },
    ]
}

fn staff() -> Vec<Staff> {
    vec![
        Staff {
            id: "officer".into(),
            name: "Patrol Officer".into(),
            description: "Backbone of the beat.".into(),
            staff_type: "officer".into(),
            hire_cost: 300,
            salary_per_tick: 2,
            success_bonus: 1.05,
            cooldown_minutes: 10,
            requires_vehicle: true,
            equipment_slots: 1,
            min_station_level: 1,
        },
        Staff {
            id: "detective".into(),
            name: "Detective".into(),
            description: "Closes the tricky cases.".into(),
            staff_type: "detective".into(),
            hire_cost: 900,
            salary_per_tick: 5,
            success_bonus: 1.15,
            cooldown_minutes: 30,
            requires_vehicle: true,
            equipment_slots: 1,
            min_station_level: 1,
        },
        Staff {
            id: "dispatcher".into(),
            name: "Dispatcher".into(),
            description: "Keeps the radio alive; never leaves the desk.".into(),
            staff_type: "dispatcher".into(),
            hire_cost: 500,
            salary_per_tick: 3,
            success_bonus: 1.0,
            cooldown_minutes: 0,
            requires_vehicle: false,
            equipment_slots: 0,
            min_station_level: 1,
        },
        Staff {
            id: "swat_operator".into(),
            name: "SWAT Operator".into(),
            description: "For the calls nobody else takes.".into(),
            staff_type: "tactical".into(),
            hire_cost: 1_800,
            salary_per_tick: 9,
            success_bonus: 1.2,
            cooldown_minutes: 60,
            requires_vehicle: true,
            equipment_slots: 2,
            min_station_level: 1,
        },
    ]
}

fn missions() -> Vec<Mission> {
    vec![
        Mission {
            id: "noise_complaint".into(),
            name: "Noise Complaint".into(),
            description: "Loud party on the third floor.".into(),
            district: "downtown".into(),
            required_vehicle_types: vec!["patrol".into()],
            required_staff_types: vec!["officer".into()],
            base_reward: 60,
            base_duration_minutes: 10,
            base_success_chance: 95,
            fuel_cost: 5,
            heat_change: 0,
            reputation_change_success: 1,
            reputation_change_failure: -1,
            min_station_level: 1,
        },
        Mission {
            id: "shoplifting".into(),
            name: "Shoplifting Call".into(),
            description: "Suspect still on the premises.".into(),
            district: "downtown".into(),
            required_vehicle_types: vec!["patrol".into()],
            required_staff_types: vec!["officer".into()],
            base_reward: 90,
            base_duration_minutes: 15,
            base_success_chance: 85,
            fuel_cost: 8,
            heat_change: 1,
            reputation_change_success: 1,
            reputation_change_failure: -2,
            min_station_level: 1,
        },
        Mission {
            id: "burglary_investigation".into(),
            name: "Burglary Investigation".into(),
            description: "Forced entry overnight, no witnesses.".into(),
            district: "downtown".into(),
            required_vehicle_types: vec!["patrol".into()],
            required_staff_types: vec!["detective".into(), "officer".into()],
            base_reward: 220,
            base_duration_minutes: 45,
            base_success_chance: 70,
            fuel_cost: 12,
            heat_change: 2,
            reputation_change_success: 3,
            reputation_change_failure: -3,
            min_station_level: 1,
        },
        Mission {
            id: "dockside_smuggling".into(),
            name: "Dockside Smuggling".into(),
            description: "Unregistered crates moving after midnight.".into(),
            district: "harbor".into(),
            required_vehicle_types: vec!["patrol".into(), "transport".into()],
            required_staff_types: vec!["officer".into(), "officer".into(), "detective".into()],
            base_reward: 450,
            base_duration_minutes: 60,
            base_success_chance: 60,
            fuel_cost: 25,
            heat_change: 4,
            reputation_change_success: 4,
            reputation_change_failure: -4,
            min_station_level: 1,
        },
        Mission {
            id: "warehouse_raid".into(),
            name: "Warehouse Raid".into(),
            description: "Armed crew holed up near pier nine.".into(),
            district: "harbor".into(),
            required_vehicle_types: vec!["tactical".into(), "transport".into()],
            required_staff_types: vec!["tactical".into(), "tactical".into(), "officer".into()],
            base_reward: 900,
            base_duration_minutes: 90,
            base_success_chance: 50,
            fuel_cost: 40,
            heat_change: 8,
            reputation_change_success: 6,
            reputation_change_failure: -6,
            min_station_level: 2,
        },
        Mission {
            id: "market_pickpocket".into(),
            name: "Market Pickpockets".into(),
            description: "Tourists keep losing wallets by the fountain.".into(),
            district: "old_town".into(),
            required_vehicle_types: vec![],
            required_staff_types: vec!["officer".into()],
            base_reward: 70,
            base_duration_minutes: 20,
            base_success_chance: 90,
            fuel_cost: 3,
            heat_change: 0,
            reputation_change_success: 1,
            reputation_change_failure: -1,
            min_station_level: 1,
        },
        Mission {
            id: "stolen_antiques".into(),
            name: "Stolen Antiques".into(),
            description: "A gallery break-in with a short trail.".into(),
            district: "old_town".into(),
            required_vehicle_types: vec!["patrol".into()],
            required_staff_types: vec!["detective".into()],
            base_reward: 260,
            base_duration_minutes: 40,
            base_success_chance: 75,
            fuel_cost: 10,
            heat_change: 2,
            reputation_change_success: 3,
            reputation_change_failure: -2,
            min_station_level: 1,
        },
    ]
}

fn upgrades() -> Vec<Upgrade> {
    vec![
        Upgrade {
            id: "dispatch_center".into(),
            name: "Dispatch Center".into(),
            description: "Unlocks unattended dispatching.".into(),
            cost: 3_000,
            effect_type: UpgradeEffect::Automation,
            effect_value: 1.0,
            required_upgrade: None,
            min_station_level: 1,
        },
        Upgrade {
            id: "extra_dispatch_table".into(),
            name: "Extra Dispatch Table".into(),
            description: "One more concurrent operation.".into(),
            cost: 2_000,
            effect_type: UpgradeEffect::DispatchCapacity,
            effect_value: 1.0,
            required_upgrade: Some("dispatch_center".into()),
            min_station_level: 1,
        },
        Upgrade {
            id: "fuel_contract".into(),
            name: "Municipal Fuel Contract".into(),
            description: "Cheaper fuel across the fleet.".into(),
            cost: 1_500,
            effect_type: UpgradeEffect::CostReduction,
            effect_value: 0.15,
            required_upgrade: None,
            min_station_level: 1,
        },
        Upgrade {
            id: "community_program".into(),
            name: "Community Program".into(),
            description: "Better cooperation, better outcomes.".into(),
            cost: 2_200,
            effect_type: UpgradeEffect::SuccessBoost,
            effect_value: 0.05,
            required_upgrade: None,
            min_station_level: 1,
        },
        Upgrade {
            id: "asset_forfeiture".into(),
            name: "Asset Forfeiture Desk".into(),
            description: "A cut of everything recovered.".into(),
            cost: 3_500,
            effect_type: UpgradeEffect::IncomeBoost,
            effect_value: 0.10,
            required_upgrade: None,
            min_station_level: 1,
        },
    ]
}

fn equipment() -> Vec<Equipment> {
    vec![
        Equipment {
            id: "light_bar".into(),
            name: "LED Light Bar".into(),
            description: "Clears traffic ahead of the cruiser.".into(),
            target: EquipmentTarget::Vehicle,
            purchase_cost: 250,
            sell_value: 120,
            effect_type: EquipmentEffect::DurationMultiplier,
            effect_value: 0.9,
            slot_size: 1,
            allowed_vehicle_types: vec!["patrol".into(), "transport".into()],
            allowed_staff_types: vec![],
            min_station_level: 1,
        },
        Equipment {
            id: "breaching_kit".into(),
            name: "Breaching Kit".into(),
            description: "Doors stop being an argument.".into(),
            target: EquipmentTarget::Vehicle,
            purchase_cost: 900,
            sell_value: 400,
            effect_type: EquipmentEffect::SuccessBonus,
            effect_value: 0.05,
            slot_size: 3,
            allowed_vehicle_types: vec!["tactical".into()],
            allowed_staff_types: vec![],
            min_station_level: 1,
        },
        Equipment {
            id: "body_camera".into(),
            name: "Body Camera".into(),
            description: "Evidence that argues for itself.".into(),
            target: EquipmentTarget::Staff,
            purchase_cost: 150,
            sell_value: 60,
            effect_type: EquipmentEffect::SuccessBonus,
            effect_value: 0.02,
            slot_size: 1,
            allowed_vehicle_types: vec![],
            allowed_staff_types: vec![],
            min_station_level: 1,
        },
        Equipment {
            id: "field_radio".into(),
            name: "Field Radio".into(),
            description: "Works anywhere, fits anything.".into(),
            target: EquipmentTarget::Any,
            purchase_cost: 100,
            sell_value: 40,
            effect_type: EquipmentEffect::DurationMultiplier,
            effect_value: 0.95,
            slot_size: 1,
            allowed_vehicle_types: vec![],
            allowed_staff_types: vec![],
            min_station_level: 1,
        },
    ]
}

fn policies() -> Vec<Policy> {
    vec![
        Policy {
            id: "small_calls_only".into(),
            name: "Small Calls Only".into(),
            description: "Keep automation on the routine work.".into(),
            mission_filters: MissionFilters {
                min_reward: None,
                max_reward: Some(150),
                districts: None,
            },
            priority: 10,
            min_station_level: 1,
        },
        Policy {
            id: "high_value".into(),
            name: "High Value".into(),
            description: "Only dispatch when the payout justifies it.".into(),
            mission_filters: MissionFilters {
                min_reward: Some(200),
                max_reward: None,
                districts: None,
            },
            priority: 5,
            min_station_level: 1,
        },
        Policy {
            id: "downtown_watch".into(),
            name: "Downtown Watch".into(),
            description: "Stay close to the station.".into(),
            mission_filters: MissionFilters {
                min_reward: None,
                max_reward: None,
                districts: Some(vec!["downtown".into()]),
            },
            priority: 1,
            min_station_level: 1,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_internally_consistent() {
        let catalog = standard_catalog();

        for mission in catalog.missions.values() {
            assert!(
                catalog.districts.contains_key(&mission.district),
                "mission {} references unknown district {}",
                mission.id,
                mission.district
            );
            for (vehicle_type, _) in mission.vehicle_requirements() {
                assert!(
                    catalog
                        .vehicles
                        .values()
                        .any(|v| v.vehicle_type == vehicle_type),
                    "mission {} needs vehicle type {} no vehicle provides",
                    mission.id,
                    vehicle_type
                );
            }
            for (staff_type, _) in mission.staff_requirements() {
                assert!(
                    catalog.staff.values().any(|s| s.staff_type == staff_type),
                    "mission {} needs staff type {} no staff provides",
                    mission.id,
                    staff_type
                );
            }
        }

        for upgrade in catalog.upgrades.values() {
            if let Some(required) = &upgrade.required_upgrade {
                assert!(catalog.upgrades.contains_key(required));
            }
        }

        // The dispatch center cannot run without someone to staff it.
        assert!(catalog.staff.contains_key("dispatcher"));
    }
}
