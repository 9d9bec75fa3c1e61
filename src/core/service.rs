//! Command/query facade over the simulation.
//!
//! Owns the catalog, the profile store, the ledger, and the engine config,
//! and runs every command under the owning user's advisory lock for the
//! whole load-mutate-persist sequence. Funds are reserved at the ledger
//! before profile state commits; a ledger failure leaves the profile
//! unmutated and unpersisted.

use std::sync::Mutex;

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::info;

use crate::content::catalog::Catalog;
use crate::core::locks::LockArena;
use crate::ledger::{Ledger, LedgerError};
use crate::simulation::config::EngineConfig;
use crate::simulation::mission::ActiveMission;
use crate::simulation::profile::{AssignmentTarget, Profile};
use crate::store::repository::{ProfileStore, StoreError};
use crate::systems::automation::{self, AutomationStatus};
use crate::systems::dispatch::{self, DispatchBlock};
use crate::systems::economy;
use crate::systems::resolution::{self, ResolutionReport};
use crate::systems::tick::{self, CatchupReport};

#[derive(Debug, Error)]
pub enum CommandError {
    /// A dispatch precondition was not met; carries the reason code.
    #[error("{0}")]
    Blocked(DispatchBlock),
    #[error("insufficient funds: need {needed}, balance {balance}")]
    InsufficientFunds { needed: i64, balance: i64 },
    #[error("ledger unavailable")]
    LedgerUnavailable,
    #[error("unknown {kind} id {id}")]
    UnknownContent { kind: &'static str, id: String },
    #[error("nothing of that kind is owned")]
    NotOwned,
    #[error("already owned")]
    AlreadyOwned,
    #[error("requires station level {required}")]
    StationLevel { required: u32 },
    #[error("vehicle capacity reached at station level {level}")]
    VehicleCapacity { level: u32 },
    #[error("not enough vehicle seats for more staff")]
    SeatCapacity,
    #[error("prerequisite upgrade {0} not owned")]
    PrerequisiteMissing(String),
    #[error("district {0} is not unlocked")]
    DistrictLocked(String),
    #[error("equipment must be unassigned first")]
    EquipmentAssigned,
    #[error("equipment cannot be slotted there")]
    AssignmentRejected,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DispatchBlock> for CommandError {
    fn from(block: DispatchBlock) -> Self {
        CommandError::Blocked(block)
    }
}

impl From<LedgerError> for CommandError {
    fn from(_: LedgerError) -> Self {
        CommandError::LedgerUnavailable
    }
}

/// What a dashboard refresh produced.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub profile: Profile,
    pub catchup: CatchupReport,
    pub resolution: ResolutionReport,
}

/// Receipt for a manual dispatch.
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    pub mission: ActiveMission,
    pub cost: i64,
}

pub struct GameService {
    config: EngineConfig,
    catalog: Catalog,
    store: Mutex<Box<dyn ProfileStore>>,
    ledger: Box<dyn Ledger>,
    locks: LockArena,
    rng: Mutex<ChaCha8Rng>,
}

impl GameService {
    pub fn new(
        config: EngineConfig,
        catalog: Catalog,
        store: Box<dyn ProfileStore>,
        ledger: Box<dyn Ledger>,
    ) -> Self {
        Self {
            config,
            catalog,
            store: Mutex::new(store),
            ledger,
            locks: LockArena::default(),
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }

    /// Fixes the outcome rolls, for deterministic tests and replays.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(ChaCha8Rng::seed_from_u64(seed));
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn load_or_create(&self, user_id: u64) -> Result<Profile, CommandError> {
        let mut store = self.store.lock().unwrap();
        if let Some(profile) = store.load(user_id)? {
            return Ok(profile);
        }
        let profile = Profile::new(user_id, &self.config);
        store.save(&profile)?;
        info!(target: "precinct.service", user_id, "created new profile");
        Ok(profile)
    }

    fn persist(&self, profile: &Profile) -> Result<(), CommandError> {
        self.store.lock().unwrap().save(profile)?;
        Ok(())
    }

    /// The dashboard entry point: sweep finished missions, catch up elapsed
    /// time, settle the combined net with the ledger in one transaction,
    /// persist.
    pub fn refresh(&self, user_id: u64) -> Result<RefreshOutcome, CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        let now = Utc::now();

        // Display/affordability snapshot; an unavailable ledger only blocks
        // automated spending, never the sweep itself.
        let balance = self.ledger.balance(user_id).ok();

        let (catchup, resolution) = {
            let mut rng = self.rng.lock().unwrap();
            // Settle whatever came due while the player was away first; that
            // frees dispatch tables before the replayed ticks try to use
            // them.
            let resolution = resolution::resolve_due_missions(&mut profile, now, &mut *rng);
            let catchup = tick::process_catchup(
                &self.config,
                &self.catalog,
                &mut profile,
                now,
                balance,
                &mut *rng,
            );
            (catchup, resolution)
        };

        let net = catchup.net_change() + resolution.income;
        self.ledger.apply_net(user_id, net)?;
        self.persist(&profile)?;

        Ok(RefreshOutcome {
            profile,
            catchup,
            resolution,
        })
    }

    /// Manually dispatches a mission, paying its operating cost upfront.
    pub fn dispatch(&self, user_id: u64, mission_id: &str) -> Result<DispatchReceipt, CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        let mission = self
            .catalog
            .mission(mission_id)
            .ok_or_else(|| CommandError::UnknownContent {
                kind: "mission",
                id: mission_id.to_string(),
            })?
            .clone();
        let now = Utc::now();

        dispatch::can_dispatch(&self.config, &self.catalog, &mut profile, &mission, now)?;

        let cost = economy::dispatch_cost(&self.config, &self.catalog, &profile, &mission);
        let needed = cost.max(self.config.minimum_dispatch_balance);
        let balance = self.ledger.balance(user_id)?;
        if balance < needed {
            return Err(CommandError::InsufficientFunds { needed, balance });
        }

        // Reserve the funds before committing any profile state.
        self.ledger.withdraw(user_id, cost)?;

        let outcome =
            match dispatch::dispatch_mission(&self.config, &self.catalog, &mut profile, &mission, now)
            {
                Ok(outcome) => outcome,
                Err(block) => {
                    // Preconditions were checked above; hand the money back
                    // on the off chance the walk still refused.
                    let _ = self.ledger.deposit(user_id, cost);
                    return Err(block.into());
                }
            };

        self.persist(&profile)?;
        Ok(DispatchReceipt {
            mission: outcome.mission,
            cost,
        })
    }

    pub fn purchase_vehicle(&self, user_id: u64, vehicle_id: &str) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        let vehicle = self
            .catalog
            .vehicle(vehicle_id)
            .ok_or_else(|| CommandError::UnknownContent {
                kind: "vehicle",
                id: vehicle_id.to_string(),
            })?;

        if profile.station_level < vehicle.min_station_level {
            return Err(CommandError::StationLevel {
                required: vehicle.min_station_level,
            });
        }
        if let Some(limit) = self.config.vehicle_capacity(profile.station_level) {
            if profile.total_vehicle_count() >= limit {
                return Err(CommandError::VehicleCapacity {
                    level: profile.station_level,
                });
            }
        }

        self.charge(user_id, vehicle.purchase_cost)?;
        profile.add_vehicle(vehicle_id, 1);
        self.persist(&profile)?;
        Ok(())
    }

    /// Sells one vehicle of a type. No refund; freed equipment returns to
    /// storage and busy units simply come off the books.
    pub fn sell_vehicle(&self, user_id: u64, vehicle_id: &str) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        if profile.vehicle_count(vehicle_id) == 0 {
            return Err(CommandError::NotOwned);
        }
        profile.remove_vehicle(vehicle_id, 1, &self.catalog);
        self.persist(&profile)?;
        Ok(())
    }

    pub fn hire_staff(&self, user_id: u64, staff_id: &str) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        let staff = self
            .catalog
            .staff_member(staff_id)
            .ok_or_else(|| CommandError::UnknownContent {
                kind: "staff",
                id: staff_id.to_string(),
            })?;

        if profile.station_level < staff.min_station_level {
            return Err(CommandError::StationLevel {
                required: staff.min_station_level,
            });
        }
        if staff.requires_vehicle {
            let seated = profile.seated_staff_count(&self.catalog);
            let seats = profile.staff_seat_capacity(&self.catalog);
            if seated >= seats {
                return Err(CommandError::SeatCapacity);
            }
        }

        self.charge(user_id, staff.hire_cost)?;
        profile.add_staff(staff_id, 1);
        self.persist(&profile)?;
        Ok(())
    }

    pub fn dismiss_staff(&self, user_id: u64, staff_id: &str) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        if profile.staff_count(staff_id) == 0 {
            return Err(CommandError::NotOwned);
        }
        profile.remove_staff(staff_id, 1, &self.catalog);
        self.persist(&profile)?;
        Ok(())
    }

    pub fn purchase_upgrade(&self, user_id: u64, upgrade_id: &str) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        let upgrade = self
            .catalog
            .upgrade(upgrade_id)
            .ok_or_else(|| CommandError::UnknownContent {
                kind: "upgrade",
                id: upgrade_id.to_string(),
            })?;

        if profile.has_upgrade(upgrade_id) {
            return Err(CommandError::AlreadyOwned);
        }
        if profile.station_level < upgrade.min_station_level {
            return Err(CommandError::StationLevel {
                required: upgrade.min_station_level,
            });
        }
        if let Some(required) = &upgrade.required_upgrade {
            if !profile.has_upgrade(required) {
                return Err(CommandError::PrerequisiteMissing(required.clone()));
            }
        }

        self.charge(user_id, upgrade.cost)?;
        profile.owned_upgrades.insert(upgrade_id.to_string());
        self.persist(&profile)?;
        Ok(())
    }

    pub fn unlock_district(&self, user_id: u64, district_id: &str) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        let district = self
            .catalog
            .district(district_id)
            .ok_or_else(|| CommandError::UnknownContent {
                kind: "district",
                id: district_id.to_string(),
            })?;

        if profile.has_district(district_id) {
            return Err(CommandError::AlreadyOwned);
        }
        if profile.station_level < district.min_station_level {
            return Err(CommandError::StationLevel {
                required: district.min_station_level,
            });
        }

        self.charge(user_id, district.unlock_cost)?;
        profile.unlocked_districts.insert(district_id.to_string());
        self.persist(&profile)?;
        Ok(())
    }

    /// Moves operations to an already-unlocked district (the current
    /// district is always a member of the unlocked set).
    pub fn set_current_district(&self, user_id: u64, district_id: &str) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        if !profile.has_district(district_id) {
            return Err(CommandError::DistrictLocked(district_id.to_string()));
        }
        profile.current_district = district_id.to_string();
        self.persist(&profile)?;
        Ok(())
    }

    pub fn purchase_equipment(&self, user_id: u64, equipment_id: &str) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        let equipment = self
            .catalog
            .equipment_item(equipment_id)
            .ok_or_else(|| CommandError::UnknownContent {
                kind: "equipment",
                id: equipment_id.to_string(),
            })?;

        if profile.station_level < equipment.min_station_level {
            return Err(CommandError::StationLevel {
                required: equipment.min_station_level,
            });
        }

        self.charge(user_id, equipment.purchase_cost)?;
        profile.add_equipment(equipment_id, 1);
        self.persist(&profile)?;
        Ok(())
    }

    /// Sells one unassigned piece of equipment and credits its sell value.
    pub fn sell_equipment(&self, user_id: u64, equipment_id: &str) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        let equipment = self
            .catalog
            .equipment_item(equipment_id)
            .ok_or_else(|| CommandError::UnknownContent {
                kind: "equipment",
                id: equipment_id.to_string(),
            })?;

        let owned = profile
            .equipment_inventory
            .get(equipment_id)
            .copied()
            .unwrap_or(0);
        if owned == 0 {
            return Err(CommandError::NotOwned);
        }
        if profile.unassigned_equipment(equipment_id) == 0 {
            return Err(CommandError::EquipmentAssigned);
        }

        self.ledger.deposit(user_id, equipment.sell_value)?;
        profile.remove_equipment(equipment_id, 1);
        self.persist(&profile)?;
        Ok(())
    }

    pub fn assign_equipment(
        &self,
        user_id: u64,
        target: AssignmentTarget,
        target_id: &str,
        equipment_id: &str,
        quantity: u32,
    ) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;

        let assigned = match target {
            AssignmentTarget::Vehicles => profile.assign_equipment_to_vehicle(
                target_id,
                equipment_id,
                quantity,
                &self.catalog,
            ),
            AssignmentTarget::Staff => profile.assign_equipment_to_staff(
                target_id,
                equipment_id,
                quantity,
                &self.catalog,
            ),
        };
        if !assigned {
            return Err(CommandError::AssignmentRejected);
        }

        self.persist(&profile)?;
        Ok(())
    }

    pub fn unassign_equipment(
        &self,
        user_id: u64,
        target: AssignmentTarget,
        target_id: &str,
        equipment_id: &str,
        quantity: u32,
    ) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        if !profile.unassign_equipment(target, target_id, equipment_id, quantity) {
            return Err(CommandError::AssignmentRejected);
        }
        self.persist(&profile)?;
        Ok(())
    }

    pub fn set_automation(&self, user_id: u64, enabled: bool) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        profile.automation_enabled = enabled;
        self.persist(&profile)?;
        Ok(())
    }

    /// Replaces the active policy list. Unknown ids are kept but match
    /// nothing until content for them ships.
    pub fn set_active_policies(
        &self,
        user_id: u64,
        policy_ids: Vec<String>,
    ) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        profile.active_policies = policy_ids;
        self.persist(&profile)?;
        Ok(())
    }

    pub fn rename_station(&self, user_id: u64, name: &str) -> Result<(), CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            profile.station_name = trimmed.to_string();
        }
        self.persist(&profile)?;
        Ok(())
    }

    /// Administrative reset: wholesale replacement with a fresh profile.
    pub fn reset(&self, user_id: u64) -> Result<Profile, CommandError> {
        let _guard = self.locks.lock(user_id);
        self.store.lock().unwrap().delete(user_id)?;
        let profile = Profile::new(user_id, &self.config);
        self.persist(&profile)?;
        info!(target: "precinct.service", user_id, "profile reset");
        Ok(profile)
    }

    /// Current profile snapshot; creates one on first access.
    pub fn profile(&self, user_id: u64) -> Result<Profile, CommandError> {
        let _guard = self.locks.lock(user_id);
        self.load_or_create(user_id)
    }

    /// Display-only balance; `None` when the ledger is unreachable.
    pub fn balance(&self, user_id: u64) -> Option<i64> {
        self.ledger.balance(user_id).ok()
    }

    /// Current automation readiness for the user's station.
    pub fn automation_status(&self, user_id: u64) -> Result<AutomationStatus, CommandError> {
        let _guard = self.locks.lock(user_id);
        let mut profile = self.load_or_create(user_id)?;
        Ok(automation::automation_status(
            &self.config,
            &self.catalog,
            &mut profile,
            Utc::now(),
        ))
    }

    /// Balance-gated withdrawal used by every purchase-style command.
    fn charge(&self, user_id: u64, cost: i64) -> Result<(), CommandError> {
        let balance = self.ledger.balance(user_id)?;
        if balance < cost {
            return Err(CommandError::InsufficientFunds {
                needed: cost,
                balance,
            });
        }
        self.ledger.withdraw(user_id, cost)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::standard_catalog;
    use crate::ledger::MemoryLedger;
    use crate::store::MemoryProfileStore;
    use std::sync::Arc;

    fn service_with_balance(balance: i64) -> (GameService, Arc<MemoryLedger>) {
        let ledger = Arc::new(MemoryLedger::with_balance(1, balance));
        let service = GameService::new(
            EngineConfig::default(),
            standard_catalog(),
            Box::new(MemoryProfileStore::new()),
            Box::new(ledger.clone()),
        )
        .with_rng_seed(4);
        (service, ledger)
    }

    #[test]
    fn purchases_debit_the_ledger_and_persist() {
        let (service, ledger) = service_with_balance(10_000);

        service.purchase_vehicle(1, "patrol_car").unwrap();
        assert_eq!(ledger.balance(1).unwrap(), 9_200);

        let profile = service.profile(1).unwrap();
        assert_eq!(profile.vehicle_count("patrol_car"), 1);
    }

    #[test]
    fn insufficient_funds_block_a_purchase() {
        let (service, ledger) = service_with_balance(100);

        let err = service.purchase_vehicle(1, "patrol_car").unwrap_err();
        assert!(matches!(err, CommandError::InsufficientFunds { .. }));
        assert_eq!(ledger.balance(1).unwrap(), 100);
        assert_eq!(service.profile(1).unwrap().total_vehicle_count(), 0);
    }

    #[test]
    fn vehicle_capacity_is_enforced_per_station_level() {
        let (service, _) = service_with_balance(100_000);

        service.purchase_vehicle(1, "patrol_car").unwrap();
        service.purchase_vehicle(1, "patrol_car").unwrap();
        let err = service.purchase_vehicle(1, "patrol_car").unwrap_err();
        assert!(matches!(err, CommandError::VehicleCapacity { level: 1 }));
    }

    #[test]
    fn seated_staff_need_seats_but_desk_staff_do_not() {
        let (service, _) = service_with_balance(100_000);

        let err = service.hire_staff(1, "officer").unwrap_err();
        assert!(matches!(err, CommandError::SeatCapacity));

        // Dispatchers work the desk.
        service.hire_staff(1, "dispatcher").unwrap();

        service.purchase_vehicle(1, "patrol_car").unwrap();
        service.hire_staff(1, "officer").unwrap();
    }

    #[test]
    fn upgrade_prerequisite_chain_is_enforced() {
        let (service, _) = service_with_balance(100_000);

        let err = service.purchase_upgrade(1, "extra_dispatch_table").unwrap_err();
        assert!(matches!(err, CommandError::PrerequisiteMissing(_)));

        service.purchase_upgrade(1, "dispatch_center").unwrap();
        service.purchase_upgrade(1, "extra_dispatch_table").unwrap();

        let err = service.purchase_upgrade(1, "dispatch_center").unwrap_err();
        assert!(matches!(err, CommandError::AlreadyOwned));
    }

    #[test]
    fn current_district_stays_within_the_unlocked_set() {
        let (service, _) = service_with_balance(100_000);

        let err = service.set_current_district(1, "harbor").unwrap_err();
        assert!(matches!(err, CommandError::DistrictLocked(_)));

        service.unlock_district(1, "harbor").unwrap();
        service.set_current_district(1, "harbor").unwrap();

        let profile = service.profile(1).unwrap();
        assert_eq!(profile.current_district, "harbor");
        assert!(profile.has_district("harbor"));
    }

    #[test]
    fn dispatch_debits_cost_and_records_the_mission() {
        let (service, ledger) = service_with_balance(100_000);
        service.purchase_vehicle(1, "patrol_car").unwrap();
        service.hire_staff(1, "dispatcher").unwrap();
        service.hire_staff(1, "officer").unwrap();

        let before = ledger.balance(1).unwrap();
        let receipt = service.dispatch(1, "shoplifting").unwrap();

        assert!(receipt.cost > 0);
        assert_eq!(ledger.balance(1).unwrap(), before - receipt.cost);
        let profile = service.profile(1).unwrap();
        assert_eq!(profile.active_missions.len(), 1);
        assert_eq!(profile.stats.expenses_paid, receipt.cost);
    }

    #[test]
    fn dispatch_preconditions_surface_as_reason_codes() {
        let (service, _) = service_with_balance(100_000);

        let err = service.dispatch(1, "shoplifting").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Blocked(DispatchBlock::NoDispatcher)
        ));

        let err = service.dispatch(1, "no_such_mission").unwrap_err();
        assert!(matches!(err, CommandError::UnknownContent { .. }));
    }

    #[test]
    fn offline_ledger_aborts_dispatch_without_mutating_state() {
        let (service, ledger) = service_with_balance(100_000);
        service.purchase_vehicle(1, "patrol_car").unwrap();
        service.hire_staff(1, "dispatcher").unwrap();
        service.hire_staff(1, "officer").unwrap();

        ledger.set_offline(true);
        let err = service.dispatch(1, "shoplifting").unwrap_err();
        assert!(matches!(err, CommandError::LedgerUnavailable));
        ledger.set_offline(false);

        let profile = service.profile(1).unwrap();
        assert!(profile.active_missions.is_empty());
        assert_eq!(profile.stats.expenses_paid, 0);
    }

    #[test]
    fn first_refresh_initializes_the_clock() {
        let (service, _) = service_with_balance(1_000);

        let outcome = service.refresh(1).unwrap();
        assert!(outcome.catchup.initialized);
        assert_eq!(outcome.catchup.ticks, 0);
        assert!(outcome.profile.last_tick_at.is_some());

        // The initialized clock was persisted.
        let profile = service.profile(1).unwrap();
        assert!(profile.last_tick_at.is_some());
    }

    #[test]
    fn selling_assigned_equipment_is_refused() {
        let (service, ledger) = service_with_balance(100_000);
        service.purchase_vehicle(1, "patrol_car").unwrap();
        service.purchase_equipment(1, "light_bar").unwrap();
        service
            .assign_equipment(1, AssignmentTarget::Vehicles, "patrol_car", "light_bar", 1)
            .unwrap();

        let err = service.sell_equipment(1, "light_bar").unwrap_err();
        assert!(matches!(err, CommandError::EquipmentAssigned));

        service
            .unassign_equipment(1, AssignmentTarget::Vehicles, "patrol_car", "light_bar", 1)
            .unwrap();
        let before = ledger.balance(1).unwrap();
        service.sell_equipment(1, "light_bar").unwrap();
        assert_eq!(ledger.balance(1).unwrap(), before + 120);
        assert_eq!(service.profile(1).unwrap().unassigned_equipment("light_bar"), 0);
    }

    #[test]
    fn reset_replaces_the_profile_wholesale() {
        let (service, _) = service_with_balance(100_000);
        service.purchase_vehicle(1, "patrol_car").unwrap();
        service.rename_station(1, "Harbor Watch HQ").unwrap();

        let fresh = service.reset(1).unwrap();
        assert_eq!(fresh.total_vehicle_count(), 0);

        let profile = service.profile(1).unwrap();
        assert_eq!(profile.station_name, EngineConfig::default().default_station_name);
        assert_eq!(profile.total_vehicle_count(), 0);
    }

    #[test]
    fn automation_status_reflects_the_gate() {
        let (service, _) = service_with_balance(100_000);
        assert_eq!(
            service.automation_status(1).unwrap(),
            AutomationStatus::Disabled
        );

        service.set_automation(1, true).unwrap();
        assert_eq!(
            service.automation_status(1).unwrap(),
            AutomationStatus::UpgradeRequired
        );
    }
}
