use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_level() -> u32 {
    1
}

fn default_slot_size() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// A dispatchable mission/call definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// District this mission appears in.
    pub district: String,
    /// Vehicle type tags required; duplicates mean quantity.
    #[serde(default)]
    pub required_vehicle_types: Vec<String>,
    /// Staff type tags required; duplicates mean quantity.
    #[serde(default)]
    pub required_staff_types: Vec<String>,
    pub base_reward: i64,
    pub base_duration_minutes: i64,
    /// Base success percentage, 0-100.
    pub base_success_chance: i32,
    pub fuel_cost: i64,
    /// Heat delta applied on completion; may be negative.
    #[serde(default)]
    pub heat_change: i32,
    #[serde(default)]
    pub reputation_change_success: i32,
    #[serde(default)]
    pub reputation_change_failure: i32,
    #[serde(default = "default_level")]
    pub min_station_level: u32,
}

impl Mission {
    /// Required quantity per vehicle type, in first-appearance order.
    pub fn vehicle_requirements(&self) -> Vec<(String, u32)> {
        count_requirements(&self.required_vehicle_types)
    }

    /// Required quantity per staff type, in first-appearance order.
    pub fn staff_requirements(&self) -> Vec<(String, u32)> {
        count_requirements(&self.required_staff_types)
    }
}

fn count_requirements(types: &[String]) -> Vec<(String, u32)> {
    let mut out: Vec<(String, u32)> = Vec::new();
    for tag in types {
        match out.iter_mut().find(|(existing, _)| existing == tag) {
            Some((_, count)) => *count += 1,
            None => out.push((tag.clone(), 1)),
        }
    }
    out
}

/// A purchasable vehicle type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Type tag matched against mission requirements.
    pub vehicle_type: String,
    pub purchase_cost: i64,
    /// Maintenance cost per tick.
    pub maintenance_cost: i64,
    /// Multiplier for fuel costs (1.0 = normal).
    #[serde(default = "fuel_efficiency_default")]
    pub fuel_efficiency: f64,
    /// Downtime after each dispatch.
    pub cooldown_minutes: i64,
    #[serde(default)]
    pub seating_capacity: u32,
    #[serde(default)]
    pub prisoner_capacity: u32,
    #[serde(default)]
    pub equipment_slots: u32,
    #[serde(default = "default_level")]
    pub min_station_level: u32,
}

fn fuel_efficiency_default() -> f64 {
    1.0
}

/// A hireable staff type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Type tag matched against mission requirements.
    pub staff_type: String,
    pub hire_cost: i64,
    /// Salary paid per tick.
    pub salary_per_tick: i64,
    /// Multiplier to mission success chance (1.1 = +10%).
    pub success_bonus: f64,
    /// Downtime after each dispatch.
    pub cooldown_minutes: i64,
    /// Whether this staff type occupies a vehicle seat.
    #[serde(default = "default_true")]
    pub requires_vehicle: bool,
    #[serde(default)]
    pub equipment_slots: u32,
    #[serde(default = "default_level")]
    pub min_station_level: u32,
}

/// An unlockable district/zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unlock_cost: i64,
    /// Multiplier for mission rewards earned here.
    pub mission_reward_multiplier: f64,
    /// Added to mission difficulty; negative means easier.
    pub mission_difficulty_modifier: i32,
    #[serde(default = "default_level")]
    pub min_station_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeEffect {
    /// Unlocks the automation features.
    Automation,
    CostReduction,
    IncomeBoost,
    SuccessBoost,
    DispatchCapacity,
}

/// A purchasable station upgrade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upgrade {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: i64,
    pub effect_type: UpgradeEffect,
    pub effect_value: f64,
    /// Upgrade that must be owned before this one becomes available.
    #[serde(default)]
    pub required_upgrade: Option<String>,
    #[serde(default = "default_level")]
    pub min_station_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentTarget {
    Vehicle,
    Staff,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentEffect {
    DurationMultiplier,
    SuccessBonus,
}

/// An equipment item that can be slotted on vehicle or staff types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target: EquipmentTarget,
    pub purchase_cost: i64,
    pub sell_value: i64,
    pub effect_type: EquipmentEffect,
    pub effect_value: f64,
    #[serde(default = "default_slot_size")]
    pub slot_size: u32,
    /// Empty list means every vehicle type is allowed.
    #[serde(default)]
    pub allowed_vehicle_types: Vec<String>,
    /// Empty list means every staff type is allowed.
    #[serde(default)]
    pub allowed_staff_types: Vec<String>,
    #[serde(default = "default_level")]
    pub min_station_level: u32,
}

impl Equipment {
    pub fn applies_to_vehicle(&self, vehicle_type: &str) -> bool {
        if !matches!(self.target, EquipmentTarget::Vehicle | EquipmentTarget::Any) {
            return false;
        }
        self.allowed_vehicle_types.is_empty()
            || self.allowed_vehicle_types.iter().any(|t| t == vehicle_type)
    }

    pub fn applies_to_staff(&self, staff_type: &str) -> bool {
        if !matches!(self.target, EquipmentTarget::Staff | EquipmentTarget::Any) {
            return false;
        }
        self.allowed_staff_types.is_empty()
            || self.allowed_staff_types.iter().any(|t| t == staff_type)
    }
}

/// Mission filter attached to an automation policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionFilters {
    #[serde(default)]
    pub min_reward: Option<i64>,
    #[serde(default)]
    pub max_reward: Option<i64>,
    /// Whitelist of district ids; `None` allows every district.
    #[serde(default)]
    pub districts: Option<Vec<String>>,
}

impl MissionFilters {
    pub fn matches(&self, mission: &Mission) -> bool {
        if let Some(min) = self.min_reward {
            if mission.base_reward < min {
                return false;
            }
        }
        if let Some(max) = self.max_reward {
            if mission.base_reward > max {
                return false;
            }
        }
        if let Some(districts) = &self.districts {
            if !districts.iter().any(|d| d == &mission.district) {
                return false;
            }
        }
        true
    }
}

/// An automation policy selecting which missions may auto-dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mission_filters: MissionFilters,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_level")]
    pub min_station_level: u32,
}

/// Immutable content catalog, loaded once and shared read-only.
///
/// Entries sit in `BTreeMap`s so every listing iterates in a deterministic,
/// id-sorted order; the automation loop and the costing/allocation walks all
/// rely on that order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub missions: BTreeMap<String, Mission>,
    pub vehicles: BTreeMap<String, Vehicle>,
    pub staff: BTreeMap<String, Staff>,
    pub districts: BTreeMap<String, District>,
    pub upgrades: BTreeMap<String, Upgrade>,
    pub equipment: BTreeMap<String, Equipment>,
    pub policies: BTreeMap<String, Policy>,
}

impl Catalog {
    pub fn mission(&self, id: &str) -> Option<&Mission> {
        self.missions.get(id)
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    pub fn staff_member(&self, id: &str) -> Option<&Staff> {
        self.staff.get(id)
    }

    pub fn district(&self, id: &str) -> Option<&District> {
        self.districts.get(id)
    }

    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.get(id)
    }

    pub fn equipment_item(&self, id: &str) -> Option<&Equipment> {
        self.equipment.get(id)
    }

    pub fn policy(&self, id: &str) -> Option<&Policy> {
        self.policies.get(id)
    }

    /// Missions available in a district at a station level.
    pub fn missions_for_district(&self, district_id: &str, level: u32) -> Vec<&Mission> {
        self.missions
            .values()
            .filter(|m| m.district == district_id && m.min_station_level <= level)
            .collect()
    }

    pub fn vehicles_for_level(&self, level: u32) -> Vec<&Vehicle> {
        self.vehicles
            .values()
            .filter(|v| v.min_station_level <= level)
            .collect()
    }

    pub fn staff_for_level(&self, level: u32) -> Vec<&Staff> {
        self.staff
            .values()
            .filter(|s| s.min_station_level <= level)
            .collect()
    }

    pub fn districts_for_level(&self, level: u32) -> Vec<&District> {
        self.districts
            .values()
            .filter(|d| d.min_station_level <= level)
            .collect()
    }

    pub fn equipment_for_level(&self, level: u32) -> Vec<&Equipment> {
        self.equipment
            .values()
            .filter(|e| e.min_station_level <= level)
            .collect()
    }

    /// Upgrades purchasable right now: level reached, not yet owned, and the
    /// prerequisite chain satisfied.
    pub fn upgrades_available<'a>(
        &'a self,
        level: u32,
        owned: &std::collections::BTreeSet<String>,
    ) -> Vec<&'a Upgrade> {
        self.upgrades
            .values()
            .filter(|u| u.min_station_level <= level)
            .filter(|u| !owned.contains(&u.id))
            .filter(|u| match &u.required_upgrade {
                Some(required) => owned.contains(required),
                None => true,
            })
            .collect()
    }

    /// Merge another catalog into this one; later entries win on id clashes.
    pub fn merge(&mut self, other: Catalog) {
        self.missions.extend(other.missions);
        self.vehicles.extend(other.vehicles);
        self.staff.extend(other.staff);
        self.districts.extend(other.districts);
        self.upgrades.extend(other.upgrades);
        self.equipment.extend(other.equipment);
        self.policies.extend(other.policies);
    }

    pub fn entry_counts(&self) -> (usize, usize, usize, usize, usize, usize, usize) {
        (
            self.missions.len(),
            self.vehicles.len(),
            self.staff.len(),
            self.districts.len(),
            self.upgrades.len(),
            self.equipment.len(),
            self.policies.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission_with_reward(id: &str, district: &str, reward: i64) -> Mission {
        Mission {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            district: district.to_string(),
            required_vehicle_types: vec!["patrol".to_string(), "patrol".to_string()],
            required_staff_types: vec!["officer".to_string()],
            base_reward: reward,
            base_duration_minutes: 30,
            base_success_chance: 80,
            fuel_cost: 10,
            heat_change: 1,
            reputation_change_success: 2,
            reputation_change_failure: -2,
            min_station_level: 1,
        }
    }

    #[test]
    fn requirements_collapse_duplicates_in_order() {
        let mission = mission_with_reward("m1", "downtown", 100);
        assert_eq!(
            mission.vehicle_requirements(),
            vec![("patrol".to_string(), 2)]
        );
        assert_eq!(mission.staff_requirements(), vec![("officer".to_string(), 1)]);
    }

    #[test]
    fn filters_respect_reward_bounds_and_districts() {
        let mission = mission_with_reward("m1", "downtown", 100);
        let wide = MissionFilters::default();
        assert!(wide.matches(&mission));

        let narrow = MissionFilters {
            min_reward: Some(150),
            max_reward: None,
            districts: None,
        };
        assert!(!narrow.matches(&mission));

        let elsewhere = MissionFilters {
            min_reward: None,
            max_reward: None,
            districts: Some(vec!["harbor".to_string()]),
        };
        assert!(!elsewhere.matches(&mission));
    }

    #[test]
    fn upgrade_availability_follows_prerequisite_chain() {
        let mut catalog = Catalog::default();
        catalog.upgrades.insert(
            "radio_room".to_string(),
            Upgrade {
                id: "radio_room".to_string(),
                name: "Radio Room".to_string(),
                description: String::new(),
                cost: 500,
                effect_type: UpgradeEffect::Automation,
                effect_value: 1.0,
                required_upgrade: None,
                min_station_level: 1,
            },
        );
        catalog.upgrades.insert(
            "extra_table".to_string(),
            Upgrade {
                id: "extra_table".to_string(),
                name: "Extra Table".to_string(),
                description: String::new(),
                cost: 800,
                effect_type: UpgradeEffect::DispatchCapacity,
                effect_value: 1.0,
                required_upgrade: Some("radio_room".to_string()),
                min_station_level: 1,
            },
        );

        let mut owned = std::collections::BTreeSet::new();
        let ids: Vec<&str> = catalog
            .upgrades_available(1, &owned)
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(ids, vec!["radio_room"]);

        owned.insert("radio_room".to_string());
        let ids: Vec<&str> = catalog
            .upgrades_available(1, &owned)
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(ids, vec!["extra_table"]);
    }
}
