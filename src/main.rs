use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anon_chat::config::{self, AppConfig};
use anon_chat::network::{ChatApiClient, PollingClient};
use anon_chat::server::{self, ServerConfig};
use anon_chat::storage::MemStorage;
use anon_chat::ui::ChatApp;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "anon_chat", version, about = "Anonymous polling chat")]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Chat API base URL (client mode)
    #[arg(long, value_name = "URL")]
    server_url: Option<String>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
enum Mode {
    /// Run the chat API server (no UI)
    Server {
        /// Address to listen on, e.g. 0.0.0.0:5000
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::apply_env_overrides(config::load_config(&cli.config));

    match cli.mode {
        Some(Mode::Server { bind }) => {
            if let Some(bind) = bind {
                app_config.bind_address = bind;
            }
            run_server(app_config).await?;
        }
        None => {
            if let Some(url) = cli.server_url {
                app_config.server_url = url;
            }
            run_client(app_config).await?;
        }
    }

    Ok(())
}

async fn run_server(app_config: AppConfig) -> std::io::Result<()> {
    let storage = Arc::new(MemStorage::new(Duration::from_secs(
        app_config.online_window_secs,
    )));
    let handle = server::start_server(ServerConfig::from_app_config(&app_config), storage).await?;

    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {err}");
    }
    log::info!("Shutting down chat API on {}", handle.local_addr());
    handle.shutdown().await
}

async fn run_client(app_config: AppConfig) -> Result<(), eframe::Error> {
    // UI -> polling task
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // polling task -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    let session_id = Uuid::new_v4().to_string();
    let api = ChatApiClient::new(app_config.server_url.clone(), session_id);
    let poll_interval = Duration::from_secs(app_config.poll_interval_secs.max(1));
    tokio::spawn(PollingClient::new(api, event_tx, cmd_rx, poll_interval).run());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([420.0, 720.0]),
        ..Default::default()
    };
    let mut event_rx = Some(event_rx);

    eframe::run_native(
        "Anonymous Chat",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("ChatApp should only be initialized once");

            log::info!("Client started against {}", app_config.server_url);

            Ok(Box::new(ChatApp::new(cc, cmd_tx.clone(), event_receiver)))
        }),
    )
}
