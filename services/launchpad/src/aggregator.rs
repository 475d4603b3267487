//! Status aggregation: periodic probe fan-out over the configured applications

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::config::Application;
use crate::probe::Prober;
use crate::status::{AppStatus, BoardHandle, Status, StatusBoard};
use crate::store::ConfigStore;

/// Orchestrates probing of every configured application and publishes the
/// resulting board.
pub struct Aggregator {
    store: Arc<ConfigStore>,
    prober: Arc<dyn Prober>,
    board: BoardHandle,
    max_concurrent_probes: usize,
    refresh_interval: Duration,
}

impl Aggregator {
    pub fn new(
        store: Arc<ConfigStore>,
        prober: Arc<dyn Prober>,
        board: BoardHandle,
        max_concurrent_probes: usize,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            store,
            prober,
            board,
            max_concurrent_probes: max_concurrent_probes.max(1),
            refresh_interval,
        }
    }

    /// Run one refresh cycle and publish the result.
    ///
    /// The configuration is read once at cycle start; applications added
    /// mid-cycle are picked up on the next one. When the configuration
    /// cannot be read the previously published board stays current.
    pub async fn refresh(&self) -> crate::Result<StatusBoard> {
        let config = self.store.get().await.map_err(|e| {
            crate::LaunchpadError::Refresh(format!("Configuration unreadable: {}", e))
        })?;

        tracing::debug!("Refreshing status of {} apps", config.apps.len());
        let entries = self.probe_all(config.apps).await;
        let checked_at = current_epoch_ms();

        let mut board = self.board.write().await;
        board.publish(entries, checked_at);
        tracing::debug!(
            "Refresh complete: {}/{} online",
            board.summary.online,
            board.summary.total
        );
        Ok(board.clone())
    }

    /// Probe every application, at most `max_concurrent_probes` in flight,
    /// preserving configuration order in the result.
    async fn probe_all(&self, apps: Vec<Application>) -> Vec<AppStatus> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_probes));
        let mut handles = Vec::with_capacity(apps.len());

        for app in &apps {
            let prober = Arc::clone(&self.prober);
            let semaphore = Arc::clone(&semaphore);
            let target = app.probe_target().to_string();
            let verify_tls = app.verify_tls;
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                prober.probe(&target, verify_tls).await
            }));
        }

        let mut entries = Vec::with_capacity(handles.len());
        for (app, handle) in apps.into_iter().zip(handles) {
            // A panicked probe task counts as offline, not as a lost entry
            let status = handle.await.unwrap_or(Status::Offline);
            entries.push(AppStatus { app, status });
        }
        entries
    }

    /// Refresh on a fixed cadence until cancelled. Manual [`refresh`] calls
    /// in between do not move the schedule.
    ///
    /// [`refresh`]: Aggregator::refresh
    pub async fn run(&self, cancel: CancellationToken) {
        loop {
            if let Err(e) = self.refresh().await {
                tracing::warn!("Refresh cycle skipped: {}", e);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.refresh_interval) => {}
                _ = cancel.cancelled() => {
                    tracing::debug!("Refresh loop cancelled");
                    break;
                }
            }
        }
    }
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
