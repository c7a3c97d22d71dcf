//! Headless TV display: syncs with the hub, writes frames and player commands
//! to stdout as JSON lines and reads player events (`ended`, `error`) from stdin.

use std::io;

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, watch},
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use venue_display_sync::{
    config::DisplayClientConfig,
    display::{DisplayRuntime, JsonLinesSink, PlayerEvent, SyncClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = DisplayClientConfig::from_env();
    info!(url = %config.hub_url, "starting display");

    let (updates_tx, updates_rx) = mpsc::channel(64);
    let (player_tx, player_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let client = SyncClient::new(
        config.hub_url.clone(),
        config.reconnect_delay,
        updates_tx,
        shutdown_rx,
    );
    let sync_task = tokio::spawn(client.run());
    tokio::spawn(read_player_events(player_tx));

    let runtime = DisplayRuntime::new(JsonLinesSink::new(io::stdout()), config.video_retry_delay);
    let mut display_task = tokio::spawn(runtime.run(updates_rx, player_rx));

    tokio::select! {
        result = &mut display_task => {
            shutdown_tx.send_replace(true);
            result
                .context("joining display runtime")?
                .context("writing display output")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("installing Ctrl+C handler")?;
            info!("shutting down display");
            shutdown_tx.send_replace(true);
            display_task
                .await
                .context("joining display runtime")?
                .context("writing display output")?;
        }
    }

    sync_task
        .await
        .context("joining sync client")?
        .context("sync client failed")?;
    Ok(())
}

/// Forward media element feedback from stdin, one event per line.
async fn read_player_events(tx: mpsc::Sender<PlayerEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match line.parse::<PlayerEvent>() {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
                Err(err) => warn!(error = %err, "ignoring player input"),
            },
            Ok(None) => return,
            Err(err) => {
                warn!(error = %err, "failed to read player events");
                return;
            }
        }
    }
}

/// Log to stderr so stdout stays a clean stream of frames.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
