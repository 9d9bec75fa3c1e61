//! Catch-up scheduler: replays the ticks a profile missed while its player
//! was away.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use crate::content::catalog::Catalog;
use crate::simulation::config::EngineConfig;
use crate::simulation::profile::Profile;
use crate::systems::automation::{self, AutomationStatus};
use crate::systems::dispatch;
use crate::systems::economy;
use crate::systems::resolution;

/// Everything one catch-up invocation did, accumulated across all replayed
/// ticks. The caller applies [`CatchupReport::net_change`] to the ledger as
/// a single transaction.
#[derive(Debug, Clone, Default)]
pub struct CatchupReport {
    /// Whole ticks replayed.
    pub ticks: u32,
    /// True when the elapsed time was cut down to the catch-up window.
    pub capped: bool,
    /// True on first contact, when the clock was initialized and nothing ran.
    pub initialized: bool,
    pub recurring_costs: i64,
    pub auto_income: i64,
    pub auto_expenses: i64,
    pub auto_completed: u32,
    pub auto_failed: u32,
}

impl CatchupReport {
    pub fn net_change(&self) -> i64 {
        self.auto_income - self.recurring_costs - self.auto_expenses
    }
}

/// Replays the owed ticks for a profile.
///
/// Elapsed wall-clock time since the last processed tick is capped at the
/// configured window, then floor-divided into whole ticks; the sub-tick
/// remainder is dropped, not banked, and `last_tick_at` always advances to
/// `now`. Each tick accrues flat recurring costs and, when the automation
/// gate is open, auto-dispatches eligible missions first-fit in catalog
/// order. Automated missions settle synchronously within their tick rather
/// than waiting out their real duration.
///
/// `balance` is the ledger snapshot taken before the replay; `None` (ledger
/// unavailable) blocks every auto-dispatch but charges still accrue.
pub fn process_catchup(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &mut Profile,
    now: DateTime<Utc>,
    balance: Option<i64>,
    rng: &mut impl Rng,
) -> CatchupReport {
    let mut report = CatchupReport::default();

    let Some(last_tick) = profile.last_tick_at else {
        profile.last_tick_at = Some(now);
        report.initialized = true;
        return report;
    };

    let mut elapsed = now - last_tick;
    if elapsed > config.max_catchup_window() {
        elapsed = config.max_catchup_window();
        report.capped = true;
    }

    let tick_seconds = config.tick_interval().num_seconds();
    let ticks = (elapsed.num_seconds() / tick_seconds).max(0) as u32;
    report.ticks = ticks;

    for tick in 0..ticks {
        let upkeep = economy::tick_costs(catalog, profile);
        report.recurring_costs += upkeep.total;
        profile.stats.expenses_paid += upkeep.total;

        let status = automation::automation_status(config, catalog, profile, now);
        if !matches!(status, AutomationStatus::Ready { .. }) {
            debug!(target: "precinct.tick", user_id = profile.user_id, tick, %status, "automation idle");
            continue;
        }
        let Some(balance) = balance else {
            debug!(target: "precinct.tick", user_id = profile.user_id, tick, "ledger unavailable, skipping automation");
            continue;
        };

        auto_dispatch_tick(config, catalog, profile, now, balance, status.slots(), rng, &mut report);
    }

    profile.last_tick_at = Some(now);

    if ticks > 0 {
        info!(
            target: "precinct.tick",
            user_id = profile.user_id,
            ticks,
            capped = report.capped,
            recurring = report.recurring_costs,
            auto_completed = report.auto_completed,
            auto_failed = report.auto_failed,
            net = report.net_change(),
            "catch-up processed"
        );
    }

    report
}

/// One tick's worth of unattended dispatching: first-fit over the current
/// district's mission list, gated per mission by the active policies, the
/// dispatch preconditions, and the balance snapshot.
fn auto_dispatch_tick(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &mut Profile,
    now: DateTime<Utc>,
    balance: i64,
    slots: u32,
    rng: &mut impl Rng,
    report: &mut CatchupReport,
) {
    let missions = catalog.missions_for_district(&profile.current_district, profile.station_level);

    let mut dispatched = 0;
    for mission in missions {
        if dispatched >= slots {
            break;
        }
        if dispatch::can_dispatch(config, catalog, profile, mission, now).is_err() {
            continue;
        }
        if !automation::matches_active_policy(catalog, profile, mission) {
            continue;
        }

        let cost = economy::dispatch_cost(config, catalog, profile, mission);
        if balance < cost.max(config.minimum_dispatch_balance) {
            continue;
        }

        let Ok(outcome) = dispatch::dispatch_mission(config, catalog, profile, mission, now) else {
            continue;
        };
        report.auto_expenses += -outcome.balance_change;

        // Passive ticks fast-forward: the mission settles now instead of
        // waiting out its duration. The cooldowns it claimed still stand.
        let active = profile
            .active_missions
            .pop()
            .expect("dispatch just appended the mission");
        let settled = resolution::settle(profile, &active, rng);
        if settled.success {
            report.auto_income += settled.reward;
            report.auto_completed += 1;
        } else {
            report.auto_failed += 1;
        }

        dispatched += 1;
    }
}
