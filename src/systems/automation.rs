//! Automation gating and the policy matcher for unattended dispatch.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::content::catalog::{Catalog, Mission, UpgradeEffect};
use crate::simulation::config::EngineConfig;
use crate::simulation::profile::Profile;
use crate::systems::dispatch;

/// Whether unattended dispatch may run right now, and why not if it can't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationStatus {
    Ready { slots: u32 },
    Disabled,
    UpgradeRequired,
    NoDispatcher,
    TablesBusy,
}

impl AutomationStatus {
    pub fn slots(&self) -> u32 {
        match self {
            AutomationStatus::Ready { slots } => *slots,
            _ => 0,
        }
    }
}

impl fmt::Display for AutomationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomationStatus::Ready { slots } => {
                write!(f, "{} dispatch slot(s) available", slots)
            }
            AutomationStatus::Disabled => write!(f, "automation is disabled"),
            AutomationStatus::UpgradeRequired => write!(f, "dispatch center upgrade required"),
            AutomationStatus::NoDispatcher => write!(f, "no dispatcher on duty"),
            AutomationStatus::TablesBusy => write!(f, "all dispatch tables are currently busy"),
        }
    }
}

/// Automation access: an owned automation-unlock upgrade, or one of the
/// narrow override identities from the config.
pub fn has_automation_access(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &Profile,
) -> bool {
    if config.is_automation_override(profile.user_id) {
        return true;
    }
    profile.owned_upgrades.iter().any(|upgrade_id| {
        catalog
            .upgrade(upgrade_id)
            .map(|u| u.effect_type == UpgradeEffect::Automation)
            .unwrap_or(false)
    })
}

/// Evaluates the full automation gate: flag, access, dispatcher, free slots.
pub fn automation_status(
    config: &EngineConfig,
    catalog: &Catalog,
    profile: &mut Profile,
    now: DateTime<Utc>,
) -> AutomationStatus {
    if !profile.automation_enabled {
        return AutomationStatus::Disabled;
    }
    if !has_automation_access(config, catalog, profile) {
        return AutomationStatus::UpgradeRequired;
    }
    if !dispatch::has_active_dispatcher(config, profile, now) {
        return AutomationStatus::NoDispatcher;
    }
    let slots = dispatch::free_dispatch_slots(config, catalog, profile, now);
    if slots == 0 {
        return AutomationStatus::TablesBusy;
    }
    AutomationStatus::Ready { slots }
}

/// True when the mission passes any active policy's filters. No active
/// policy means everything qualifies; policy ids missing from the catalog
/// are ignored.
pub fn matches_active_policy(catalog: &Catalog, profile: &Profile, mission: &Mission) -> bool {
    if profile.active_policies.is_empty() {
        return true;
    }

    profile.active_policies.iter().any(|policy_id| {
        catalog
            .policy(policy_id)
            .map(|policy| policy.mission_filters.matches(mission))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::standard_catalog;

    fn automated_profile(config: &EngineConfig) -> Profile {
        let mut profile = Profile::new(1, config);
        profile.automation_enabled = true;
        profile.owned_upgrades.insert("dispatch_center".to_string());
        profile.add_staff("dispatcher", 1);
        profile
    }

    #[test]
    fn gate_walks_through_every_requirement() {
        let config = EngineConfig::default();
        let catalog = standard_catalog();
        let now = Utc::now();

        let mut profile = Profile::new(1, &config);
        assert_eq!(
            automation_status(&config, &catalog, &mut profile, now),
            AutomationStatus::Disabled
        );

        profile.automation_enabled = true;
        assert_eq!(
            automation_status(&config, &catalog, &mut profile, now),
            AutomationStatus::UpgradeRequired
        );

        profile.owned_upgrades.insert("dispatch_center".to_string());
        assert_eq!(
            automation_status(&config, &catalog, &mut profile, now),
            AutomationStatus::NoDispatcher
        );

        profile.add_staff("dispatcher", 1);
        assert_eq!(
            automation_status(&config, &catalog, &mut profile, now),
            AutomationStatus::Ready { slots: 1 }
        );
    }

    #[test]
    fn override_identities_skip_the_upgrade_requirement() {
        let mut config = EngineConfig::default();
        config.automation_override_users.push(9);
        let catalog = standard_catalog();

        let profile = Profile::new(9, &config);
        assert!(has_automation_access(&config, &catalog, &profile));

        let other = Profile::new(10, &config);
        assert!(!has_automation_access(&config, &catalog, &other));
    }

    #[test]
    fn busy_tables_report_no_slots() {
        let config = EngineConfig::default();
        let catalog = standard_catalog();
        let now = Utc::now();
        let mut profile = automated_profile(&config);

        // Fill the single table with an in-flight mission.
        profile.add_active_mission(crate::simulation::mission::ActiveMission {
            mission_id: "m".to_string(),
            name: "M".to_string(),
            dispatched_at: now,
            ends_at: now + chrono::Duration::minutes(30),
            operating_cost: 1,
            potential_reward: 2,
            success_chance: 50,
            heat_change: 0,
            reputation_success: 0,
            reputation_failure: 0,
        });

        assert_eq!(
            automation_status(&config, &catalog, &mut profile, now),
            AutomationStatus::TablesBusy
        );
    }

    #[test]
    fn no_active_policy_allows_everything() {
        let catalog = standard_catalog();
        let profile = Profile::new(1, &EngineConfig::default());
        let mission = catalog.mission("dockside_smuggling").unwrap();
        assert!(matches_active_policy(&catalog, &profile, mission));
    }

    #[test]
    fn policies_filter_by_reward_and_district() {
        let catalog = standard_catalog();
        let mut profile = Profile::new(1, &EngineConfig::default());
        profile.active_policies = vec!["small_calls_only".to_string()];

        let small = catalog.mission("noise_complaint").unwrap();
        let big = catalog.mission("dockside_smuggling").unwrap();
        assert!(matches_active_policy(&catalog, &profile, small));
        assert!(!matches_active_policy(&catalog, &profile, big));

        // An unknown policy id matches nothing instead of failing.
        profile.active_policies = vec!["withdrawn_policy".to_string()];
        assert!(!matches_active_policy(&catalog, &profile, small));

        // Any matching policy suffices.
        profile.active_policies =
            vec!["withdrawn_policy".to_string(), "downtown_watch".to_string()];
        assert!(matches_active_policy(&catalog, &profile, small));
    }
}
