//! Shared status board published by the aggregator

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::Application;

/// Liveness classification of one application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Online,
    Offline,
    /// Transient state before a refresh cycle has completed
    Pending,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Online => write!(f, "online"),
            Status::Offline => write!(f, "offline"),
            Status::Pending => write!(f, "pending"),
        }
    }
}

/// One application together with its probed status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppStatus {
    #[serde(flatten)]
    pub app: Application,
    pub status: Status,
}

/// Aggregate counts over a status board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
}

impl StatusSummary {
    pub fn over(entries: &[AppStatus]) -> Self {
        Self {
            total: entries.len(),
            online: entries
                .iter()
                .filter(|e| e.status == Status::Online)
                .count(),
            offline: entries
                .iter()
                .filter(|e| e.status == Status::Offline)
                .count(),
        }
    }
}

/// The last published refresh result
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusBoard {
    pub apps: Vec<AppStatus>,
    pub summary: StatusSummary,
    /// Wall-clock completion time of the last finished cycle, 0 = never
    pub checked_at_epoch_ms: u64,
}

impl StatusBoard {
    /// Board shown before the first refresh cycle completes
    pub fn pending(apps: &[Application]) -> Self {
        let apps: Vec<AppStatus> = apps
            .iter()
            .cloned()
            .map(|app| AppStatus {
                app,
                status: Status::Pending,
            })
            .collect();
        let summary = StatusSummary::over(&apps);
        Self {
            apps,
            summary,
            checked_at_epoch_ms: 0,
        }
    }

    /// Replace the board contents. `checked_at_epoch_ms` never moves
    /// backwards, even when overlapping cycles finish out of order.
    pub fn publish(&mut self, apps: Vec<AppStatus>, checked_at_epoch_ms: u64) {
        self.summary = StatusSummary::over(&apps);
        self.apps = apps;
        self.checked_at_epoch_ms = self.checked_at_epoch_ms.max(checked_at_epoch_ms);
    }
}

/// Thread-safe handle shared between the aggregator and the API
pub type BoardHandle = Arc<RwLock<StatusBoard>>;

pub fn new_board_handle(board: StatusBoard) -> BoardHandle {
    Arc::new(RwLock::new(board))
}
