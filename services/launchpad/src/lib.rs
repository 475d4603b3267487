//! Launchpad - self-hosted service launcher dashboard
//!
//! Stores the user's application list, probes each entry for reachability,
//! and serves the aggregate status over an HTTP/JSON API.

pub mod access;
pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod probe;
pub mod status;
pub mod store;

pub use config::{Application, Configuration};
pub use error::{LaunchpadError, Result};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::aggregator::Aggregator;
use crate::dashboard::ApiState;
use crate::probe::{HttpProber, Prober};
use crate::status::{new_board_handle, StatusBoard};
use crate::store::ConfigStore;

/// Runtime settings, normally taken from the command line
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub port: u16,
    pub probe_timeout: Duration,
    pub refresh_interval: Duration,
    pub max_concurrent_probes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            port: 5000,
            probe_timeout: Duration::from_secs(5),
            refresh_interval: Duration::from_secs(60),
            max_concurrent_probes: 8,
        }
    }
}

/// Run the launchpad service with the given settings until ctrl-c
pub async fn run(settings: Settings) -> Result<()> {
    let store = Arc::new(ConfigStore::open(&settings.data_dir)?);
    let prober: Arc<dyn Prober> = Arc::new(HttpProber::new(settings.probe_timeout)?);

    let initial = store.get().await?;
    let board = new_board_handle(StatusBoard::pending(&initial.apps));

    let aggregator = Arc::new(Aggregator::new(
        Arc::clone(&store),
        Arc::clone(&prober),
        Arc::clone(&board),
        settings.max_concurrent_probes,
        settings.refresh_interval,
    ));

    let cancel = CancellationToken::new();

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    // Start the periodic refresh loop
    let aggregator_for_loop = Arc::clone(&aggregator);
    let cancel_for_loop = cancel.clone();
    let refresh_task = tokio::spawn(async move {
        aggregator_for_loop.run(cancel_for_loop).await;
    });

    let router = dashboard::build_router(ApiState {
        store,
        board,
        aggregator,
        prober,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| LaunchpadError::Server(format!("Binding {}: {}", addr, e)))?;
    tracing::info!("Launchpad listening on http://{}", addr);

    let cancel_for_server = cancel.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel_for_server.cancelled().await;
        })
        .await
        .map_err(|e| LaunchpadError::Server(format!("Serving HTTP: {}", e)))?;

    cancel.cancel();
    let _ = refresh_task.await;
    tracing::info!("Launchpad stopped");

    Ok(())
}
