//! Manual sweep command handler

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::sweep::SweepService;

pub async fn cmd_sweep(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let sweeper = SweepService::new(store, Arc::new(RwLock::new(config.clone())));

    match sweeper.run().await? {
        Some(outcome) => {
            println!("✓ Sweep complete");
            println!("  Examined: {}", outcome.examined);
            println!("  Archived: {}", outcome.archived);
            if outcome.skipped_malformed > 0 {
                println!(
                    "  Skipped (unreadable timestamps): {}",
                    outcome.skipped_malformed
                );
            }
        }
        None => println!("A sweep is already running."),
    }

    Ok(())
}
