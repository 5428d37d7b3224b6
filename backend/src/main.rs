use marketplace_store::config::AppConfig;
use marketplace_store::{get_stats, SqliteStorage, Store};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = AppConfig::load()?;
    log::info!("Loaded config: {:?}", config);

    let storage = SqliteStorage::open(&config.database_url)
        .map_err(|e| format!("Failed to open storage: {}", e))?;
    let mut store = Store::new(storage);

    if config.seed_demo_data {
        store.initialize()?;
    }

    let stats = get_stats(&store)?;
    log::info!(
        "{} users, {} properties ({} approved), {} unread alerts",
        stats.total_users,
        stats.total_properties,
        stats
            .properties_by_status
            .get(&marketplace_store::ApprovalStatus::Approved)
            .copied()
            .unwrap_or(0),
        stats.unread_alerts
    );
    for (role, count) in &stats.users_by_role {
        log::info!("  {}: {}", role, count);
    }

    Ok(())
}
