use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wavechat_core::stats::StatsSummary;
use wavechat_core::{channel_slug, scroll_decision, ChannelBoard, ChannelEvent};
use wavechat_web::state::{AppState, Config};
use wavechat_web::{poller, views};

const RECENT_MESSAGE_LIMIT: usize = 50;

#[derive(Parser, Debug)]
#[command(name = "wavechat-web", version)]
struct Args {
    /// Address to serve the dashboard on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,
    /// Base URL of the gateway whose stats feed the summary display.
    #[arg(long, default_value = "http://127.0.0.1:8043")]
    gateway: String,
    /// Channel bootstrap file: an ordered JSON array of channel objects.
    #[arg(long)]
    channels: Option<PathBuf>,
    /// Seconds between stats polls, measured from request completion.
    #[arg(long, default_value_t = 60)]
    poll_interval: u64,
    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = resolve_config(Args::parse());
    init_logging(&config.log_level);

    let entries = load_bootstrap(config.channels.as_deref())?;
    let (board, rejected) = ChannelBoard::bootstrap(&entries);
    for err in &rejected {
        warn!(event = "channel_rejected", error = %err);
    }
    info!(
        event = "board_bootstrap",
        channels = board.tabs().len(),
        rejected = rejected.len()
    );

    let state = Arc::new(AppState::new(board));
    let poller = poller::spawn(state.clone(), &config);

    let app = Router::new()
        .route("/", get(dashboard))
        .route("/stats", get(stats_snapshot))
        .route("/messages/:channel", get(channel_messages))
        .route("/channels/:channel/select", post(select_channel))
        .route("/events", post(ingest_event))
        .route("/health", get(|| async { "ok" }))
        .with_state(state);

    let addr: SocketAddr = config
        .addr
        .parse()
        .with_context(|| format!("invalid listen address {}", config.addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(event = "server_start", addr = %addr, gateway = %config.gateway);

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;
    poller.abort();
    served.context("server error")?;
    Ok(())
}

fn resolve_config(args: Args) -> Config {
    Config {
        addr: args.addr,
        gateway: args.gateway,
        channels: args.channels,
        poll_interval: Duration::from_secs(args.poll_interval.max(1)),
        log_level: args.log_level,
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_bootstrap(path: Option<&std::path::Path>) -> Result<Vec<Value>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read channels file {}", path.display()))?;
    let entries: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("channels file {} is not a JSON array", path.display()))?;
    Ok(entries)
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let board = state.board.read().await;
    let stats = state.stats.read().await;
    let summary = StatsSummary::from_stats(&stats);
    Html(views::dashboard_page(&board, &summary, &stats).into_string())
}

async fn stats_snapshot(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.stats.read().await.clone())
}

async fn channel_messages(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
) -> impl IntoResponse {
    let board = state.board.read().await;
    match board.recent_messages(&channel, RECENT_MESSAGE_LIMIT) {
        Some(messages) => Json(messages.to_vec()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Pane metrics reported by the styling layer alongside a tab click; both
/// absent when the pane has not been measured.
#[derive(Debug, Deserialize)]
struct SelectParams {
    #[serde(default)]
    content_height: Option<f64>,
    #[serde(default)]
    client_height: Option<f64>,
}

async fn select_channel(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
    Query(params): Query<SelectParams>,
) -> impl IntoResponse {
    let mut board = state.board.write().await;
    match board.select(&channel) {
        Ok(()) => {
            let scroll = params
                .client_height
                .and_then(|client| scroll_decision(params.content_height, client));
            info!(
                event = "channel_select",
                channel = %channel,
                scroll = scroll.map(|decision| decision.as_str()).unwrap_or("none")
            );
            Json(serde_json::json!({
                "channel": channel_slug(&channel),
                "scroll": scroll.map(|decision| decision.as_str()),
            }))
            .into_response()
        }
        Err(err) => {
            warn!(event = "unknown_channel", channel = %channel, error = %err);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn ingest_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<ChannelEvent>,
) -> impl IntoResponse {
    let mut board = state.board.write().await;
    let known_channels = board.tabs().len();
    match board.apply(event) {
        Ok(()) => {
            if board.tabs().len() > known_channels {
                info!(event = "channel_created", channels = board.tabs().len());
            }
            StatusCode::ACCEPTED
        }
        Err(err) => {
            warn!(event = "event_rejected", error = %err);
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}
