//! Resolution engine: settles missions whose time has run out.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

use crate::simulation::mission::ActiveMission;
use crate::simulation::profile::Profile;

/// What happened to one settled mission.
#[derive(Debug, Clone)]
pub struct MissionOutcome {
    pub mission_id: String,
    pub name: String,
    pub success: bool,
    /// Reward credited; zero on failure (the cost was paid at dispatch).
    pub reward: i64,
}

/// Aggregate result of one resolution sweep.
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    pub income: i64,
    pub completed: u32,
    pub failed: u32,
    pub outcomes: Vec<MissionOutcome>,
}

fn clamp_meter(value: i32) -> i32 {
    value.clamp(0, 100)
}

/// Rolls and applies the outcome of a single mission. One uniform draw in
/// 1..=100; success iff the roll is at or under the frozen chance.
///
/// Failure pays nothing, and always pushes heat up by the magnitude of the
/// frozen delta regardless of its sign.
pub fn settle(profile: &mut Profile, mission: &ActiveMission, rng: &mut impl Rng) -> MissionOutcome {
    let roll = rng.gen_range(1..=100);
    let success = roll <= mission.success_chance;

    if success {
        profile.stats.missions_completed += 1;
        profile.stats.income_earned += mission.potential_reward;
        profile.reputation = clamp_meter(profile.reputation + mission.reputation_success);
        profile.heat_level = clamp_meter(profile.heat_level + mission.heat_change);
    } else {
        profile.stats.missions_failed += 1;
        profile.reputation = clamp_meter(profile.reputation + mission.reputation_failure);
        profile.heat_level = clamp_meter(profile.heat_level + mission.heat_change.abs());
    }

    info!(
        target: "precinct.resolution",
        user_id = profile.user_id,
        mission_id = %mission.mission_id,
        roll,
        chance = mission.success_chance,
        success,
        "mission settled"
    );

    MissionOutcome {
        mission_id: mission.mission_id.clone(),
        name: mission.name.clone(),
        success,
        reward: if success { mission.potential_reward } else { 0 },
    }
}

/// Sweeps the active list: missions past their end time are settled, the
/// rest stay in flight.
pub fn resolve_due_missions(
    profile: &mut Profile,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> ResolutionReport {
    let mut report = ResolutionReport::default();

    let missions = std::mem::take(&mut profile.active_missions);
    let mut still_running = Vec::with_capacity(missions.len());

    for mission in missions {
        if !mission.is_due(now) {
            still_running.push(mission);
            continue;
        }

        let outcome = settle(profile, &mission, rng);
        if outcome.success {
            report.income += outcome.reward;
            report.completed += 1;
        } else {
            report.failed += 1;
        }
        report.outcomes.push(outcome);
    }

    profile.active_missions = still_running;
    report
}
