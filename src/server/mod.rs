//! Chat API server: router construction, presence sweeper and lifecycle.

pub mod error;
pub mod http;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::storage::ChatStorage;

pub use error::ApiError;
pub use http::{DEFAULT_MAX_BODY_BYTES, SESSION_HEADER, create_router};

/// Settings the server needs at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub sweep_interval: Duration,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            bind_address: config.bind_address,
            sweep_interval: Duration::from_secs(config.sweep_interval_secs.max(1)),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

/// Handle to a running server. Dropping it closes the shutdown channel, which
/// stops the server without waiting for it.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    server_task: JoinHandle<std::io::Result<()>>,
    sweeper_task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Signal shutdown and wait for in-flight requests to drain.
    pub async fn shutdown(self) -> std::io::Result<()> {
        let _ = self.shutdown_tx.send(true);
        let result = match self.server_task.await {
            Ok(result) => result,
            Err(err) => Err(std::io::Error::other(err)),
        };
        if let Err(err) = self.sweeper_task.await {
            log::warn!("Presence sweeper ended abnormally: {err}");
        }
        result
    }
}

/// Bind the listener (port 0 picks an ephemeral port) and serve in the background.
pub async fn start_server(
    config: ServerConfig,
    storage: Arc<dyn ChatStorage>,
) -> std::io::Result<ServerHandle> {
    let app = create_router(storage.clone(), config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    let local_addr = listener.local_addr()?;
    log::info!("Chat API listening on http://{local_addr}");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper_task = tokio::spawn(presence_sweep_loop(
        storage,
        config.sweep_interval,
        shutdown_rx.clone(),
    ));

    let server_task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
            .await
    });

    Ok(ServerHandle {
        local_addr,
        shutdown_tx,
        server_task,
        sweeper_task,
    })
}

async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        if shutdown_rx.changed().await.is_err() {
            break;
        }
    }
}

/// Periodically drop expired presence entries so idle sessions do not pile up.
pub async fn presence_sweep_loop(
    storage: Arc<dyn ChatStorage>,
    every: Duration,
    shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let shutdown = wait_for_shutdown(shutdown_rx);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => match storage.sweep_expired() {
                Ok(0) => {}
                Ok(removed) => log::debug!("Expired {removed} idle session(s)"),
                Err(err) => log::warn!("Presence sweep failed: {err}"),
            },
        }
    }
    log::debug!("Presence sweeper stopped");
}
