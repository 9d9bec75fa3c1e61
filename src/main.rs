use std::env;

use precinct::simulation::profile::Profile;
use precinct::{
    data::standard_catalog, EngineConfig, GameService, MemoryLedger, SqliteProfileStore,
};

/// Headless demo: drives one player's station through a buy-hire-dispatch
/// loop against a SQLite store and an in-memory ledger.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let db_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "precinct-demo.db".to_string());
    let store = SqliteProfileStore::open(&db_path)?;

    let user_id = 1;
    let ledger = MemoryLedger::with_balance(user_id, 10_000);

    let service = GameService::new(
        EngineConfig::default(),
        standard_catalog(),
        Box::new(store),
        Box::new(ledger),
    );

    println!("== opening dashboard ==");
    let outcome = service.refresh(user_id)?;
    if outcome.catchup.initialized {
        println!("first visit, simulation clock initialized");
    } else {
        println!(
            "caught up {} tick(s), net change {}",
            outcome.catchup.ticks,
            outcome.catchup.net_change()
        );
    }
    for settled in &outcome.resolution.outcomes {
        let verdict = if settled.success { "completed" } else { "failed" };
        println!("mission {} {} (+{})", settled.name, verdict, settled.reward);
    }

    if outcome.profile.total_vehicle_count() == 0 {
        println!("== building up the station ==");
        service.purchase_vehicle(user_id, "patrol_car")?;
        service.hire_staff(user_id, "dispatcher")?;
        service.hire_staff(user_id, "officer")?;
        println!("bought a patrol car, hired a dispatcher and an officer");
    }

    match service.dispatch(user_id, "shoplifting") {
        Ok(receipt) => println!(
            "dispatched {} for {} credits, {}% success, done in {} minute(s)",
            receipt.mission.name,
            receipt.cost,
            receipt.mission.success_chance,
            receipt.mission.remaining_minutes(chrono::Utc::now()),
        ),
        Err(err) => println!("dispatch refused: {err}"),
    }

    print_station(&service.profile(user_id)?);
    println!(
        "ledger balance: {}",
        service
            .balance(user_id)
            .map(|b| b.to_string())
            .unwrap_or_else(|| "unavailable".to_string())
    );
    println!("(run again later to watch the catch-up settle the mission)");

    Ok(())
}

fn print_station(profile: &Profile) {
    println!("== {} ==", profile.station_name);
    println!(
        "level {} | district {} | reputation {} | heat {}",
        profile.station_level, profile.current_district, profile.reputation, profile.heat_level
    );
    println!(
        "fleet {} | staff {} | missions in flight {}",
        profile.total_vehicle_count(),
        profile.total_staff_count(),
        profile.active_missions.len()
    );
    println!(
        "lifetime: {} completed, {} failed, {} earned, {} spent",
        profile.stats.missions_completed,
        profile.stats.missions_failed,
        profile.stats.income_earned,
        profile.stats.expenses_paid
    );
}
