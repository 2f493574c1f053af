use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::common::{ClientCommand, ClientEvent};

use super::api::ChatApiClient;

/// Poll interval used when the config does not say otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Background task bridging the UI and the chat API.
///
/// Refetches the thread and online count on a fixed interval whatever the
/// user is doing, and executes commands coming from the UI.
pub struct PollingClient {
    api: ChatApiClient,
    event_sender: mpsc::Sender<ClientEvent>,
    command_receiver: mpsc::Receiver<ClientCommand>,
    poll_interval: Duration,
}

impl PollingClient {
    pub fn new(
        api: ChatApiClient,
        event_sender: mpsc::Sender<ClientEvent>,
        command_receiver: mpsc::Receiver<ClientCommand>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            api,
            event_sender,
            command_receiver,
            poll_interval,
        }
    }

    /// Runs until the UI drops its command sender.
    pub async fn run(mut self) {
        log::info!(
            "Polling {} every {:?} as session {}",
            self.api.base_url(),
            self.poll_interval,
            self.api.session_id()
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => self.handle_command(command).await,
                        None => break,
                    }
                }
                _ = ticker.tick() => self.refresh().await,
            }
        }

        log::info!("Polling client stopped");
    }

    async fn handle_command(&mut self, command: ClientCommand) {
        match command {
            ClientCommand::SendMessage(content) => {
                match self.api.create_message(&content).await {
                    Ok(message) => {
                        self.emit(ClientEvent::MessageSent(message)).await;
                        self.refresh().await;
                    }
                    Err(err) => {
                        log::warn!("Failed to send message: {err}");
                        self.emit(ClientEvent::SendFailed(err.to_string())).await;
                    }
                }
            }
            ClientCommand::Refresh => self.refresh().await,
        }
    }

    async fn refresh(&mut self) {
        match self.api.fetch_messages().await {
            Ok(messages) => self.emit(ClientEvent::MessagesLoaded(messages)).await,
            Err(err) => {
                log::warn!("Failed to fetch messages: {err}");
                self.emit(ClientEvent::PollFailed(err.to_string())).await;
            }
        }

        match self.api.fetch_online_count().await {
            Ok(count) => self.emit(ClientEvent::OnlineCount(count)).await,
            Err(err) => log::warn!("Failed to fetch online count: {err}"),
        }
    }

    async fn emit(&self, event: ClientEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to notify UI: {err}");
        }
    }
}
