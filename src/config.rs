use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::network::DEFAULT_POLL_INTERVAL;
use crate::storage::DEFAULT_ONLINE_WINDOW;

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the API server listens on.
    pub bind_address: SocketAddr,
    /// Base URL the desktop client talks to.
    pub server_url: String,
    pub poll_interval_secs: u64,
    pub online_window_secs: u64,
    pub sweep_interval_secs: u64,
    pub max_body_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5000)),
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            online_window_secs: DEFAULT_ONLINE_WINDOW.as_secs(),
            sweep_interval_secs: 5,
            max_body_bytes: crate::server::DEFAULT_MAX_BODY_BYTES,
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

/// Apply `PORT` and `CHAT_SERVER_URL` from the environment (after `.env`).
pub fn apply_env_overrides(config: AppConfig) -> AppConfig {
    apply_overrides(
        config,
        std::env::var("PORT").ok(),
        std::env::var("CHAT_SERVER_URL").ok(),
    )
}

pub fn apply_overrides(
    mut config: AppConfig,
    port: Option<String>,
    server_url: Option<String>,
) -> AppConfig {
    if let Some(port) = port {
        match port.trim().parse::<u16>() {
            Ok(port) => config.bind_address.set_port(port),
            Err(err) => log::warn!("Ignoring invalid PORT `{port}`: {err}"),
        }
    }

    if let Some(url) = server_url.filter(|url| !url.trim().is_empty()) {
        config.server_url = url.trim().to_string();
    }

    config
}
