//! Shared dashboard state: the channel board and the latest stats snapshot.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use wavechat_core::stats::fallback_stats;
use wavechat_core::ChannelBoard;

/// Resolved service configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub addr: String,
    pub gateway: String,
    pub channels: Option<PathBuf>,
    pub poll_interval: Duration,
    pub log_level: String,
}

/// Process-wide state shared between request handlers and the poller task.
/// The board has one writer path (the select/event handlers), the stats
/// snapshot another (the poller); every reader takes a consistent snapshot
/// under the read lock.
pub struct AppState {
    pub board: RwLock<ChannelBoard>,
    pub stats: RwLock<Value>,
}

impl AppState {
    pub fn new(board: ChannelBoard) -> Self {
        Self {
            board: RwLock::new(board),
            stats: RwLock::new(fallback_stats()),
        }
    }
}
