//! List items command handler

use crate::config::Config;
use crate::db::Store;
use crate::lifecycle::ItemStatus;
use crate::models::ItemFilter;

pub async fn cmd_list_items(config: &Config, status: Option<&str>) -> anyhow::Result<()> {
    let filter = match status {
        None => ItemFilter::default(),
        Some(s) => match s.parse::<ItemStatus>() {
            Ok(parsed) => ItemFilter::by_status(parsed),
            Err(_) => {
                println!("Invalid status: {s}");
                println!("Expected one of: lost, collected, archived");
                return Ok(());
            }
        },
    };

    let store = Store::new(&config.general.database_path).await?;
    let items = store.list_items(&filter).await?;

    if items.is_empty() {
        println!("No items found.");
        return Ok(());
    }

    println!("Items ({} total)", items.len());
    println!("{:-<70}", "");

    for item in items {
        let status_indicator = match item.status {
            ItemStatus::Lost => "🔴",
            ItemStatus::Collected => "✓",
            ItemStatus::Archived => "📦",
        };

        let uploaded_date = item.uploaded_at.split('T').next().unwrap_or("?");

        println!("{} {} (ID: {})", status_indicator, item.description, item.id);
        println!(
            "  Found at: {} | Collect at: {} | Uploaded: {}",
            item.found_location, item.collect_location, uploaded_date
        );
    }

    println!();
    println!("Legend: 🔴 Lost | ✓ Collected | 📦 Archived");

    Ok(())
}
