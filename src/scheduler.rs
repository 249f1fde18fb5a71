use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::SweepConfig;
use crate::services::sweep::SweepOutcome;
use crate::state::SharedState;

pub struct Scheduler {
    state: Arc<SharedState>,
    config: SweepConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    #[must_use]
    pub fn new(state: Arc<SharedState>, config: SweepConfig) -> Self {
        Self {
            state,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Sweep scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background sweep scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let state = Arc::clone(&state);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                if let Err(e) = run_sweep(&state).await {
                    error!("Scheduled sweep failed: {}", e);
                }
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Sweep scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_mins = self.config.interval_minutes;

        info!("Sweep scheduler running every {} minutes", interval_mins);

        let mut sweep_interval = interval(Duration::from_secs(u64::from(interval_mins) * 60));

        loop {
            sweep_interval.tick().await;
            if !*self.running.read().await {
                break;
            }
            if let Err(e) = run_sweep(&self.state).await {
                error!("Scheduled sweep failed: {}", e);
            }
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping sweep scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Runs a single sweep pass outside the schedule. Used by the CLI and
    /// the manual trigger endpoint.
    pub async fn run_once(&self) -> Result<Option<SweepOutcome>> {
        info!("Running manual sweep...");
        self.state.sweeper.run().await
    }
}

async fn run_sweep(state: &Arc<SharedState>) -> Result<()> {
    state.sweeper.run().await?;
    Ok(())
}
