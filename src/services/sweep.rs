use crate::config::Config;
use crate::db::{Store, StoreError};
use crate::lifecycle::{self, ItemStatus};
use crate::models::ItemFilter;
use anyhow::Result;
use chrono::{Days, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Counters reported by a completed sweep pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOutcome {
    pub examined: usize,
    pub archived: usize,
    pub skipped_malformed: usize,
}

/// Archives "lost" items that have sat unclaimed past the configured age.
///
/// A sweep never touches collected or archived items, so running it twice
/// in a row leaves the table unchanged. Rows whose upload timestamp cannot
/// be parsed are skipped and counted rather than failing the pass.
pub struct SweepService {
    store: Store,
    config: Arc<RwLock<Config>>,
    gate: Mutex<()>,
}

impl SweepService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self {
            store,
            config,
            gate: Mutex::const_new(()),
        }
    }

    /// Runs one sweep pass. Returns `Ok(None)` when another pass is already
    /// in flight; the scheduler and the manual trigger share this guard.
    pub async fn run(&self) -> Result<Option<SweepOutcome>> {
        let Ok(_guard) = self.gate.try_lock() else {
            debug!("Sweep already running, skipping");
            return Ok(None);
        };

        let archive_after_days = self.config.read().await.sweep.archive_after_days;

        let now = Utc::now();
        let Some(cutoff) = now.checked_sub_days(Days::new(u64::from(archive_after_days))) else {
            anyhow::bail!("archive_after_days {archive_after_days} is out of range");
        };

        let lost = self
            .store
            .list_items(&ItemFilter::by_status(ItemStatus::Lost))
            .await?;

        let mut outcome = SweepOutcome {
            examined: lost.len(),
            ..SweepOutcome::default()
        };

        for item in lost {
            let uploaded_at = match lifecycle::parse_stored_timestamp(&item.uploaded_at) {
                Ok(ts) => ts,
                Err(e) => {
                    warn!(
                        item_id = item.id,
                        raw = %item.uploaded_at,
                        "Skipping item with unparseable upload timestamp: {e}"
                    );
                    outcome.skipped_malformed += 1;
                    continue;
                }
            };

            if uploaded_at >= cutoff {
                continue;
            }

            match self.store.archive_item(item.id).await {
                Ok(_) => {
                    debug!(
                        item_id = item.id,
                        age_days = (now - uploaded_at).num_days(),
                        "Archived stale item"
                    );
                    outcome.archived += 1;
                }
                // The item moved on between listing and archiving. Leave it be.
                Err(StoreError::InvalidTransition { .. } | StoreError::ItemNotFound(_)) => {
                    debug!(item_id = item.id, "Item changed state mid-sweep, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            examined = outcome.examined,
            archived = outcome.archived,
            skipped_malformed = outcome.skipped_malformed,
            "Sweep complete"
        );

        Ok(Some(outcome))
    }
}
