//! Launchpad CLI
//!
//! Command-line interface for the service launcher dashboard.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use launchpad::Settings;
use tracing::Level;

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Self-hosted service launcher dashboard")]
#[command(version)]
struct Args {
    /// Directory holding the persisted configuration
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Port for the HTTP API and dashboard
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Probe timeout in seconds
    #[arg(long, default_value_t = 5)]
    probe_timeout_seconds: u64,

    /// Interval between automatic status refreshes in seconds
    #[arg(long, default_value_t = 60)]
    refresh_interval_seconds: u64,

    /// Maximum number of concurrent outbound probes
    #[arg(long, default_value_t = 8)]
    max_concurrent_probes: usize,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::info!("Starting launchpad");
    tracing::debug!(
        "data_dir={:?}, port={}, probe_timeout={}s, refresh_interval={}s, max_concurrent_probes={}",
        args.data_dir,
        args.port,
        args.probe_timeout_seconds,
        args.refresh_interval_seconds,
        args.max_concurrent_probes
    );

    launchpad::run(Settings {
        data_dir: args.data_dir,
        port: args.port,
        probe_timeout: Duration::from_secs(args.probe_timeout_seconds),
        refresh_interval: Duration::from_secs(args.refresh_interval_seconds),
        max_concurrent_probes: args.max_concurrent_probes,
    })
    .await?;

    Ok(())
}
