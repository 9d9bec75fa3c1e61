use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::catalog::Catalog;
use crate::simulation::config::{
    EngineConfig, DEFAULT_STARTER_DISTRICT, DEFAULT_STATION_NAME,
};
use crate::simulation::mission::ActiveMission;

fn default_station_level() -> u32 {
    1
}

fn default_station_name() -> String {
    DEFAULT_STATION_NAME.to_string()
}

fn default_district() -> String {
    DEFAULT_STARTER_DISTRICT.to_string()
}

fn default_unlocked_districts() -> BTreeSet<String> {
    BTreeSet::from([DEFAULT_STARTER_DISTRICT.to_string()])
}

fn default_reputation() -> i32 {
    50
}

/// Lifetime totals shown on the station dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifetimeStats {
    #[serde(default)]
    pub missions_completed: u64,
    #[serde(default)]
    pub missions_failed: u64,
    #[serde(default)]
    pub income_earned: i64,
    #[serde(default)]
    pub expenses_paid: i64,
}

/// Which side of the station an equipment assignment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentTarget {
    Vehicles,
    Staff,
}

/// Equipment slotted onto vehicle/staff type buckets:
/// target kind -> target type id -> equipment id -> count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentAssignments {
    #[serde(default)]
    pub vehicles: BTreeMap<String, BTreeMap<String, u32>>,
    #[serde(default)]
    pub staff: BTreeMap<String, BTreeMap<String, u32>>,
}

impl EquipmentAssignments {
    fn bucket(&self, target: AssignmentTarget) -> &BTreeMap<String, BTreeMap<String, u32>> {
        match target {
            AssignmentTarget::Vehicles => &self.vehicles,
            AssignmentTarget::Staff => &self.staff,
        }
    }

    fn bucket_mut(
        &mut self,
        target: AssignmentTarget,
    ) -> &mut BTreeMap<String, BTreeMap<String, u32>> {
        match target {
            AssignmentTarget::Vehicles => &mut self.vehicles,
            AssignmentTarget::Staff => &mut self.staff,
        }
    }

    /// Pieces of one equipment id slotted anywhere.
    pub fn assigned_total(&self, equipment_id: &str) -> u32 {
        self.vehicles
            .values()
            .chain(self.staff.values())
            .filter_map(|counts| counts.get(equipment_id))
            .sum()
    }

    pub fn for_target(&self, target: AssignmentTarget, target_id: &str) -> BTreeMap<String, u32> {
        self.bucket(target).get(target_id).cloned().unwrap_or_default()
    }

    pub fn add(&mut self, target: AssignmentTarget, target_id: &str, equipment_id: &str, qty: u32) {
        let counts = self
            .bucket_mut(target)
            .entry(target_id.to_string())
            .or_default();
        *counts.entry(equipment_id.to_string()).or_insert(0) += qty;
    }

    /// Returns the item to storage; false when nothing was slotted there.
    pub fn remove(
        &mut self,
        target: AssignmentTarget,
        target_id: &str,
        equipment_id: &str,
        qty: u32,
    ) -> bool {
        let bucket = self.bucket_mut(target);
        let Some(counts) = bucket.get_mut(target_id) else {
            return false;
        };
        let Some(current) = counts.get(equipment_id).copied() else {
            return false;
        };
        if current == 0 {
            return false;
        }

        if qty >= current {
            counts.remove(equipment_id);
        } else {
            counts.insert(equipment_id.to_string(), current - qty);
        }
        if counts.is_empty() {
            bucket.remove(target_id);
        }
        true
    }

    /// Drops every assignment on a target type; the items fall back to
    /// unassigned storage.
    pub fn clear_target(&mut self, target: AssignmentTarget, target_id: &str) {
        self.bucket_mut(target).remove(target_id);
    }
}

/// Used versus total equipment slot capacity on one target bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotUsage {
    pub used: u32,
    pub total: u32,
}

impl SlotUsage {
    pub fn free(&self) -> u32 {
        self.total.saturating_sub(self.used)
    }
}

/// A player's police station: the aggregate root every engine mutates.
///
/// One profile per user id; all access is serialized by the service's
/// per-user lock, so methods can take `&mut self` without further care.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: u64,
    #[serde(default = "default_station_level")]
    pub station_level: u32,
    #[serde(default = "default_station_name")]
    pub station_name: String,
    #[serde(default = "default_district")]
    pub current_district: String,
    #[serde(default = "default_unlocked_districts")]
    pub unlocked_districts: BTreeSet<String>,
    /// vehicle id -> owned count.
    #[serde(default)]
    pub owned_vehicles: BTreeMap<String, u32>,
    /// staff id -> headcount.
    #[serde(default)]
    pub staff_roster: BTreeMap<String, u32>,
    #[serde(default)]
    pub owned_upgrades: BTreeSet<String>,
    #[serde(default)]
    pub active_policies: Vec<String>,
    /// equipment id -> owned count (assigned or not).
    #[serde(default)]
    pub equipment_inventory: BTreeMap<String, u32>,
    #[serde(default)]
    pub equipment_assignments: EquipmentAssignments,
    #[serde(default)]
    pub active_missions: Vec<ActiveMission>,
    /// 0-100.
    #[serde(default)]
    pub heat_level: i32,
    /// 0-100.
    #[serde(default = "default_reputation")]
    pub reputation: i32,
    /// None until the first catch-up initializes the clock.
    #[serde(default)]
    pub last_tick_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub automation_enabled: bool,
    /// Ready-again timestamps, one entry per busy unit of a vehicle type.
    #[serde(default)]
    pub vehicle_cooldowns: BTreeMap<String, Vec<DateTime<Utc>>>,
    /// Ready-again timestamps, one entry per busy unit of a staff type.
    #[serde(default)]
    pub staff_cooldowns: BTreeMap<String, Vec<DateTime<Utc>>>,
    #[serde(default)]
    pub stats: LifetimeStats,
    /// Presentation cross-references; the core stores them untouched.
    #[serde(default)]
    pub dashboard_message_id: Option<u64>,
    #[serde(default)]
    pub dashboard_channel_id: Option<u64>,
}

impl Profile {
    pub fn new(user_id: u64, config: &EngineConfig) -> Self {
        Self {
            user_id,
            station_level: 1,
            station_name: config.default_station_name.clone(),
            current_district: config.starter_district.clone(),
            unlocked_districts: BTreeSet::from([config.starter_district.clone()]),
            owned_vehicles: BTreeMap::new(),
            staff_roster: BTreeMap::new(),
            owned_upgrades: BTreeSet::new(),
            active_policies: Vec::new(),
            equipment_inventory: BTreeMap::new(),
            equipment_assignments: EquipmentAssignments::default(),
            active_missions: Vec::new(),
            heat_level: 0,
            reputation: 50,
            last_tick_at: None,
            automation_enabled: false,
            vehicle_cooldowns: BTreeMap::new(),
            staff_cooldowns: BTreeMap::new(),
            stats: LifetimeStats::default(),
            dashboard_message_id: None,
            dashboard_channel_id: None,
        }
    }

    pub fn has_upgrade(&self, upgrade_id: &str) -> bool {
        self.owned_upgrades.contains(upgrade_id)
    }

    pub fn has_district(&self, district_id: &str) -> bool {
        self.unlocked_districts.contains(district_id)
    }

    pub fn vehicle_count(&self, vehicle_id: &str) -> u32 {
        self.owned_vehicles.get(vehicle_id).copied().unwrap_or(0)
    }

    pub fn staff_count(&self, staff_id: &str) -> u32 {
        self.staff_roster.get(staff_id).copied().unwrap_or(0)
    }

    pub fn total_vehicle_count(&self) -> u32 {
        self.owned_vehicles.values().sum()
    }

    pub fn total_staff_count(&self) -> u32 {
        self.staff_roster.values().sum()
    }

    /// Headcount that needs a vehicle seat. Staff whose catalog entry has
    /// vanished still count as seated rather than silently freeing seats.
    pub fn seated_staff_count(&self, catalog: &Catalog) -> u32 {
        self.staff_roster
            .iter()
            .filter(|(staff_id, _)| {
                catalog
                    .staff_member(staff_id)
                    .map(|s| s.requires_vehicle)
                    .unwrap_or(true)
            })
            .map(|(_, count)| *count)
            .sum()
    }

    /// Seats provided by the owned fleet.
    pub fn staff_seat_capacity(&self, catalog: &Catalog) -> u32 {
        self.owned_vehicles
            .iter()
            .filter_map(|(vehicle_id, count)| {
                catalog
                    .vehicle(vehicle_id)
                    .map(|v| v.seating_capacity * count)
            })
            .sum()
    }

    pub fn prisoner_capacity(&self, catalog: &Catalog) -> u32 {
        self.owned_vehicles
            .iter()
            .filter_map(|(vehicle_id, count)| {
                catalog
                    .vehicle(vehicle_id)
                    .map(|v| v.prisoner_capacity * count)
            })
            .sum()
    }

    pub fn add_vehicle(&mut self, vehicle_id: &str, quantity: u32) {
        *self
            .owned_vehicles
            .entry(vehicle_id.to_string())
            .or_insert(0) += quantity;
    }

    pub fn add_staff(&mut self, staff_id: &str, quantity: u32) {
        *self.staff_roster.entry(staff_id.to_string()).or_insert(0) += quantity;
    }

    pub fn add_equipment(&mut self, equipment_id: &str, quantity: u32) {
        *self
            .equipment_inventory
            .entry(equipment_id.to_string())
            .or_insert(0) += quantity;
    }

    /// Removes vehicles from the fleet. Depleting a type clears its cooldowns
    /// and its whole assignment bucket; partial removal truncates the
    /// cooldown multiset to the new owned count and evicts assignments that
    /// no longer fit the shrunken slot capacity. Freed equipment returns to
    /// unassigned storage.
    pub fn remove_vehicle(&mut self, vehicle_id: &str, quantity: u32, catalog: &Catalog) {
        let current = self.vehicle_count(vehicle_id);
        if quantity >= current {
            self.owned_vehicles.remove(vehicle_id);
            self.vehicle_cooldowns.remove(vehicle_id);
            self.equipment_assignments
                .clear_target(AssignmentTarget::Vehicles, vehicle_id);
            return;
        }

        let remaining = current - quantity;
        self.owned_vehicles
            .insert(vehicle_id.to_string(), remaining);
        if let Some(entries) = self.vehicle_cooldowns.get_mut(vehicle_id) {
            entries.truncate(remaining as usize);
        }
        let capacity = catalog
            .vehicle(vehicle_id)
            .map(|v| v.equipment_slots * remaining)
            .unwrap_or(0);
        self.evict_assignment_overflow(AssignmentTarget::Vehicles, vehicle_id, capacity, catalog);
    }

    /// Staff counterpart of [`Profile::remove_vehicle`].
    pub fn remove_staff(&mut self, staff_id: &str, quantity: u32, catalog: &Catalog) {
        let current = self.staff_count(staff_id);
        if quantity >= current {
            self.staff_roster.remove(staff_id);
            self.staff_cooldowns.remove(staff_id);
            self.equipment_assignments
                .clear_target(AssignmentTarget::Staff, staff_id);
            return;
        }

        let remaining = current - quantity;
        self.staff_roster.insert(staff_id.to_string(), remaining);
        if let Some(entries) = self.staff_cooldowns.get_mut(staff_id) {
            entries.truncate(remaining as usize);
        }
        let capacity = catalog
            .staff_member(staff_id)
            .map(|s| s.equipment_slots * remaining)
            .unwrap_or(0);
        self.evict_assignment_overflow(AssignmentTarget::Staff, staff_id, capacity, catalog);
    }

    /// Removes equipment from inventory without touching assignments; callers
    /// must check the unassigned count first.
    pub fn remove_equipment(&mut self, equipment_id: &str, quantity: u32) {
        let current = self
            .equipment_inventory
            .get(equipment_id)
            .copied()
            .unwrap_or(0);
        if quantity >= current {
            self.equipment_inventory.remove(equipment_id);
        } else {
            self.equipment_inventory
                .insert(equipment_id.to_string(), current - quantity);
        }
    }

    fn evict_assignment_overflow(
        &mut self,
        target: AssignmentTarget,
        target_id: &str,
        capacity: u32,
        catalog: &Catalog,
    ) {
        loop {
            let assigned = self.equipment_assignments.for_target(target, target_id);
            let used = used_slots(&assigned, catalog);
            if used <= capacity {
                return;
            }
            // Evict the first item that actually occupies capacity.
            let Some(equipment_id) = assigned
                .keys()
                .find(|id| {
                    catalog
                        .equipment_item(id)
                        .map(|e| e.slot_size > 0)
                        .unwrap_or(false)
                })
                .cloned()
            else {
                return;
            };
            self.equipment_assignments
                .remove(target, target_id, &equipment_id, 1);
        }
    }

    fn prune(cooldowns: &mut BTreeMap<String, Vec<DateTime<Utc>>>, now: DateTime<Utc>) {
        cooldowns.retain(|_, entries| {
            entries.retain(|ready_at| *ready_at > now);
            !entries.is_empty()
        });
    }

    /// Ready units of a vehicle type. Expired cooldown entries are pruned as
    /// a side effect of every availability query.
    pub fn available_vehicle_count(&mut self, vehicle_id: &str, now: DateTime<Utc>) -> u32 {
        let owned = self.vehicle_count(vehicle_id);
        if owned == 0 {
            return 0;
        }
        Self::prune(&mut self.vehicle_cooldowns, now);
        let busy = self
            .vehicle_cooldowns
            .get(vehicle_id)
            .map(|entries| entries.len() as u32)
            .unwrap_or(0);
        owned.saturating_sub(busy)
    }

    /// Ready members of a staff type.
    pub fn available_staff_count(&mut self, staff_id: &str, now: DateTime<Utc>) -> u32 {
        let owned = self.staff_count(staff_id);
        if owned == 0 {
            return 0;
        }
        Self::prune(&mut self.staff_cooldowns, now);
        let busy = self
            .staff_cooldowns
            .get(staff_id)
            .map(|entries| entries.len() as u32)
            .unwrap_or(0);
        owned.saturating_sub(busy)
    }

    pub fn is_vehicle_available(&mut self, vehicle_id: &str, now: DateTime<Utc>) -> bool {
        self.available_vehicle_count(vehicle_id, now) > 0
    }

    pub fn is_staff_available(&mut self, staff_id: &str, now: DateTime<Utc>) -> bool {
        self.available_staff_count(staff_id, now) > 0
    }

    /// Marks vehicles of one type busy until `ready_at`. Requests beyond the
    /// currently available count are clamped; callers are expected to have
    /// sized the request already.
    pub fn allocate_vehicles(
        &mut self,
        vehicle_id: &str,
        quantity: u32,
        ready_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) {
        if quantity == 0 {
            return;
        }
        let ready = self.available_vehicle_count(vehicle_id, now);
        let quantity = quantity.min(ready);
        if quantity == 0 {
            return;
        }
        let entries = self
            .vehicle_cooldowns
            .entry(vehicle_id.to_string())
            .or_default();
        entries.extend(std::iter::repeat(ready_at).take(quantity as usize));
    }

    /// Staff counterpart of [`Profile::allocate_vehicles`].
    pub fn allocate_staff(
        &mut self,
        staff_id: &str,
        quantity: u32,
        ready_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) {
        if quantity == 0 {
            return;
        }
        let ready = self.available_staff_count(staff_id, now);
        let quantity = quantity.min(ready);
        if quantity == 0 {
            return;
        }
        let entries = self
            .staff_cooldowns
            .entry(staff_id.to_string())
            .or_default();
        entries.extend(std::iter::repeat(ready_at).take(quantity as usize));
    }

    pub fn add_active_mission(&mut self, mission: ActiveMission) {
        self.active_missions.push(mission);
    }

    /// Equipment of one id sitting in storage, not slotted anywhere.
    pub fn unassigned_equipment(&self, equipment_id: &str) -> u32 {
        let owned = self
            .equipment_inventory
            .get(equipment_id)
            .copied()
            .unwrap_or(0);
        owned.saturating_sub(self.equipment_assignments.assigned_total(equipment_id))
    }

    pub fn vehicle_slot_usage(&self, vehicle_id: &str, catalog: &Catalog) -> SlotUsage {
        let total = catalog
            .vehicle(vehicle_id)
            .map(|v| v.equipment_slots * self.vehicle_count(vehicle_id))
            .unwrap_or(0);
        let assigned = self
            .equipment_assignments
            .for_target(AssignmentTarget::Vehicles, vehicle_id);
        SlotUsage {
            used: used_slots(&assigned, catalog),
            total,
        }
    }

    pub fn staff_slot_usage(&self, staff_id: &str, catalog: &Catalog) -> SlotUsage {
        let total = catalog
            .staff_member(staff_id)
            .map(|s| s.equipment_slots * self.staff_count(staff_id))
            .unwrap_or(0);
        let assigned = self
            .equipment_assignments
            .for_target(AssignmentTarget::Staff, staff_id);
        SlotUsage {
            used: used_slots(&assigned, catalog),
            total,
        }
    }

    /// Slots equipment onto a vehicle type if the item applies to it, enough
    /// unassigned pieces exist, and the bucket has free slot capacity. The
    /// checks commit atomically; a failed assignment changes nothing.
    pub fn assign_equipment_to_vehicle(
        &mut self,
        vehicle_id: &str,
        equipment_id: &str,
        quantity: u32,
        catalog: &Catalog,
    ) -> bool {
        let (Some(vehicle), Some(equipment)) = (
            catalog.vehicle(vehicle_id),
            catalog.equipment_item(equipment_id),
        ) else {
            return false;
        };
        if !equipment.applies_to_vehicle(&vehicle.vehicle_type) {
            return false;
        }

        let usage = self.vehicle_slot_usage(vehicle_id, catalog);
        let needed = equipment.slot_size * quantity;
        if needed > usage.free() {
            return false;
        }
        if self.unassigned_equipment(equipment_id) < quantity {
            return false;
        }

        self.equipment_assignments
            .add(AssignmentTarget::Vehicles, vehicle_id, equipment_id, quantity);
        true
    }

    /// Staff counterpart of [`Profile::assign_equipment_to_vehicle`].
    pub fn assign_equipment_to_staff(
        &mut self,
        staff_id: &str,
        equipment_id: &str,
        quantity: u32,
        catalog: &Catalog,
    ) -> bool {
        let (Some(staff), Some(equipment)) = (
            catalog.staff_member(staff_id),
            catalog.equipment_item(equipment_id),
        ) else {
            return false;
        };
        if !equipment.applies_to_staff(&staff.staff_type) {
            return false;
        }

        let usage = self.staff_slot_usage(staff_id, catalog);
        let needed = equipment.slot_size * quantity;
        if needed > usage.free() {
            return false;
        }
        if self.unassigned_equipment(equipment_id) < quantity {
            return false;
        }

        self.equipment_assignments
            .add(AssignmentTarget::Staff, staff_id, equipment_id, quantity);
        true
    }

    /// Unslots equipment from a target, returning it to storage.
    pub fn unassign_equipment(
        &mut self,
        target: AssignmentTarget,
        target_id: &str,
        equipment_id: &str,
        quantity: u32,
    ) -> bool {
        self.equipment_assignments
            .remove(target, target_id, equipment_id, quantity)
    }
}

fn used_slots(assigned: &BTreeMap<String, u32>, catalog: &Catalog) -> u32 {
    assigned
        .iter()
        .filter_map(|(equipment_id, count)| {
            catalog
                .equipment_item(equipment_id)
                .map(|e| e.slot_size * count)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::catalog::{Equipment, EquipmentEffect, EquipmentTarget, Staff, Vehicle};
    use chrono::Duration;

    fn test_catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.vehicles.insert(
            "patrol_car".into(),
            Vehicle {
                id: "patrol_car".into(),
                name: "Patrol Car".into(),
                description: String::new(),
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
        );
        catalog.staff.insert(
            "officer".into(),
            Staff {
                id: "officer".into(),
                name: "Officer".into(),
                description: String::new(),
                staff_type: "officer".into(),
                hire_cost: 300,
                salary_per_tick: 2,
                success_bonus: 1.05,
                cooldown_minutes: 10,
                requires_vehicle: true,
                equipment_slots: 1,
                min_station_level: 1,
            },
        );
        catalog.equipment.insert(
            "light_bar".into(),
            Equipment {
                id: "light_bar".into(),
                name: "Light Bar".into(),
                description: String::new(),
                target: EquipmentTarget::Vehicle,
                purchase_cost: 250,
                sell_value: 120,
                effect_type: EquipmentEffect::DurationMultiplier,
                effect_value: 0.9,
                slot_size: 1,
                allowed_vehicle_types: vec![],
                allowed_staff_types: vec![],
                min_station_level: 1,
            },
        );
        catalog.equipment.insert(
            "winch_rig".into(),
            Equipment {
                id: "winch_rig".into(),
                name: "Winch Rig".into(),
                description: String::new(),
                target: EquipmentTarget::Vehicle,
                purchase_cost: 600,
                sell_value: 250,
                effect_type: EquipmentEffect::SuccessBonus,
                effect_value: 0.03,
                slot_size: 3,
                allowed_vehicle_types: vec![],
                allowed_staff_types: vec![],
                min_station_level: 1,
            },
        );
        catalog
    }

    fn profile() -> Profile {
        Profile::new(7, &EngineConfig::default())
    }

    #[test]
    fn availability_stays_within_owned_bounds() {
        let mut profile = profile();
        let now = Utc::now();
        profile.add_vehicle("patrol_car", 2);

        assert_eq!(profile.available_vehicle_count("patrol_car", now), 2);

        profile.allocate_vehicles("patrol_car", 1, now + Duration::minutes(10), now);
        assert_eq!(profile.available_vehicle_count("patrol_car", now), 1);

        // Over-allocation clamps instead of going negative.
        profile.allocate_vehicles("patrol_car", 5, now + Duration::minutes(10), now);
        assert_eq!(profile.available_vehicle_count("patrol_car", now), 0);
        assert_eq!(profile.vehicle_count("patrol_car"), 2);
        assert_eq!(profile.vehicle_cooldowns["patrol_car"].len(), 2);
    }

    #[test]
    fn pruning_is_lazy_and_idempotent() {
        let mut profile = profile();
        let now = Utc::now();
        profile.add_vehicle("patrol_car", 2);
        profile.allocate_vehicles("patrol_car", 2, now + Duration::minutes(5), now);

        let later = now + Duration::minutes(6);
        assert_eq!(profile.available_vehicle_count("patrol_car", later), 2);
        let snapshot = profile.vehicle_cooldowns.clone();
        assert_eq!(profile.available_vehicle_count("patrol_car", later), 2);
        assert_eq!(profile.vehicle_cooldowns, snapshot);
        assert!(!profile.vehicle_cooldowns.contains_key("patrol_car"));
    }

    #[test]
    fn depleting_a_vehicle_type_frees_cooldowns_and_equipment() {
        let catalog = test_catalog();
        let mut profile = profile();
        let now = Utc::now();
        profile.add_vehicle("patrol_car", 1);
        profile.add_equipment("light_bar", 1);
        assert!(profile.assign_equipment_to_vehicle("patrol_car", "light_bar", 1, &catalog));
        profile.allocate_vehicles("patrol_car", 1, now + Duration::hours(1), now);

        profile.remove_vehicle("patrol_car", 1, &catalog);

        assert_eq!(profile.vehicle_count("patrol_car"), 0);
        assert!(!profile.vehicle_cooldowns.contains_key("patrol_car"));
        // The light bar survives the sale and is back in storage.
        assert_eq!(profile.unassigned_equipment("light_bar"), 1);
    }

    #[test]
    fn partial_removal_truncates_cooldowns_and_evicts_overflow() {
        let catalog = test_catalog();
        let mut profile = profile();
        let now = Utc::now();
        profile.add_vehicle("patrol_car", 2);
        profile.add_equipment("light_bar", 4);
        // 2 cars x 2 slots = 4 slots, fill them all.
        assert!(profile.assign_equipment_to_vehicle("patrol_car", "light_bar", 4, &catalog));
        profile.allocate_vehicles("patrol_car", 2, now + Duration::hours(1), now);

        profile.remove_vehicle("patrol_car", 1, &catalog);

        assert_eq!(profile.vehicle_count("patrol_car"), 1);
        assert_eq!(profile.vehicle_cooldowns["patrol_car"].len(), 1);
        let usage = profile.vehicle_slot_usage("patrol_car", &catalog);
        assert_eq!(usage.total, 2);
        assert!(usage.used <= usage.total);
        assert_eq!(profile.unassigned_equipment("light_bar"), 2);
    }

    #[test]
    fn assignment_beyond_slot_capacity_fails_without_side_effects() {
        let catalog = test_catalog();
        let mut profile = profile();
        profile.add_vehicle("patrol_car", 1);
        profile.add_equipment("winch_rig", 1);

        // 2 free slots, the rig needs 3.
        assert!(!profile.assign_equipment_to_vehicle("patrol_car", "winch_rig", 1, &catalog));
        assert_eq!(profile.unassigned_equipment("winch_rig"), 1);
        assert!(profile.equipment_assignments.vehicles.is_empty());
    }

    #[test]
    fn assignment_requires_unassigned_inventory() {
        let catalog = test_catalog();
        let mut profile = profile();
        profile.add_vehicle("patrol_car", 2);
        profile.add_equipment("light_bar", 1);

        assert!(profile.assign_equipment_to_vehicle("patrol_car", "light_bar", 1, &catalog));
        // The only piece is already slotted.
        assert!(!profile.assign_equipment_to_vehicle("patrol_car", "light_bar", 1, &catalog));
        assert_eq!(profile.unassigned_equipment("light_bar"), 0);
    }

    #[test]
    fn unassign_returns_items_to_storage() {
        let catalog = test_catalog();
        let mut profile = profile();
        profile.add_vehicle("patrol_car", 1);
        profile.add_equipment("light_bar", 2);
        assert!(profile.assign_equipment_to_vehicle("patrol_car", "light_bar", 2, &catalog));
        assert_eq!(profile.unassigned_equipment("light_bar"), 0);

        assert!(profile.unassign_equipment(
            AssignmentTarget::Vehicles,
            "patrol_car",
            "light_bar",
            1
        ));
        assert_eq!(profile.unassigned_equipment("light_bar"), 1);
    }

    #[test]
    fn seat_and_prisoner_capacity_follow_the_fleet() {
        let catalog = test_catalog();
        let mut profile = profile();
        profile.add_vehicle("patrol_car", 3);
        profile.add_staff("officer", 4);

        assert_eq!(profile.staff_seat_capacity(&catalog), 6);
        assert_eq!(profile.prisoner_capacity(&catalog), 3);
        assert_eq!(profile.seated_staff_count(&catalog), 4);
    }

    #[test]
    fn missing_profile_fields_deserialize_to_defaults() {
        let profile: Profile = serde_json::from_str(r#"{"user_id": 42}"#).unwrap();
        assert_eq!(profile.station_level, 1);
        assert_eq!(profile.reputation, 50);
        assert_eq!(profile.heat_level, 0);
        assert!(profile.unlocked_districts.contains(DEFAULT_STARTER_DISTRICT));
        assert_eq!(profile.current_district, DEFAULT_STARTER_DISTRICT);
        assert!(profile.last_tick_at.is_none());
        assert!(profile.active_missions.is_empty());
    }
}
