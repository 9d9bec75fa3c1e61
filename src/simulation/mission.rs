use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A mission currently in progress.
///
/// Economics are frozen at dispatch time; later profile changes never alter
/// the odds or payout of work already on the street.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveMission {
    pub mission_id: String,
    pub name: String,
    pub dispatched_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Operating cost already paid when the units rolled out.
    pub operating_cost: i64,
    pub potential_reward: i64,
    /// Success percentage, 5-95.
    pub success_chance: i32,
    pub heat_change: i32,
    pub reputation_success: i32,
    pub reputation_failure: i32,
}

impl ActiveMission {
    /// Minutes until completion, floored at zero.
    pub fn remaining_minutes(&self, now: DateTime<Utc>) -> i64 {
        (self.ends_at - now).num_minutes().max(0)
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.ends_at <= now
    }
}
