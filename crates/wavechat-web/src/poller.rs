//! Periodic gateway stats poll feeding the dashboard's summary snapshot.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use wavechat_core::stats::normalize_stats;

use crate::state::{AppState, Config};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Spawn the poll loop and hand back its abort handle. One request per
/// cycle; the next cycle starts a full interval after the previous one
/// completes, so a slow gateway can never stack requests. A failed poll
/// keeps the last-known-good snapshot and never stops the loop.
pub fn spawn(state: Arc<AppState>, config: &Config) -> tokio::task::JoinHandle<()> {
    let url = format!("{}/stats", config.gateway.trim_end_matches('/'));
    let interval = config.poll_interval;
    let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
        Ok(client) => client,
        Err(err) => {
            warn!(event = "stats_poll_error", error = %err, "http client unavailable; stats stay at fallback");
            return tokio::spawn(async {});
        }
    };
    tokio::spawn(async move {
        loop {
            match fetch_stats(&client, &url).await {
                Ok(raw) => {
                    let normalized = normalize_stats(raw);
                    *state.stats.write().await = normalized;
                    debug!(event = "stats_poll_ok", url = %url);
                }
                Err(err) => {
                    warn!(event = "stats_poll_error", url = %url, error = %err);
                }
            }
            tokio::time::sleep(interval).await;
        }
    })
}

async fn fetch_stats(client: &reqwest::Client, url: &str) -> Result<Value, reqwest::Error> {
    client.get(url).send().await?.error_for_status()?.json().await
}
