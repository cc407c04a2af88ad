//! Background task that drops abandoned workflow instances.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::service::WithdrawalService;

/// Reaper configuration
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    pub enabled: bool,
    /// Time between sweeps
    pub poll_interval: Duration,
    /// Instances untouched for this long are removed
    pub idle_ttl: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval: Duration::from_secs(60),
            idle_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl ReaperConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let enabled = std::env::var("ENABLE_REAPER")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(defaults.enabled);
        let poll_interval = std::env::var("REAPER_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);
        let idle_ttl = std::env::var("WORKFLOW_IDLE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.idle_ttl);

        Self {
            enabled,
            poll_interval,
            idle_ttl,
        }
    }
}

/// Spawn the reaper. Send `true` on the returned channel to stop it.
pub fn spawn_reaper(
    service: Arc<WithdrawalService>,
    config: ReaperConfig,
) -> (JoinHandle<()>, watch::Sender<bool>) {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        info!(
            poll_secs = config.poll_interval.as_secs(),
            ttl_secs = config.idle_ttl.as_secs(),
            "Workflow reaper started"
        );
        let mut ticker = tokio::time::interval(config.poll_interval);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let evicted = service.evict_idle(config.idle_ttl);
                    if evicted > 0 {
                        info!(evicted, remaining = service.active_workflows(), "Evicted idle workflows");
                    } else {
                        debug!("No idle workflows to evict");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Workflow reaper stopped");
    });

    (handle, shutdown_tx)
}
