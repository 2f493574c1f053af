use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{ClientCommand, ClientEvent};

use super::components::{chat_area, header, input_bar};
use super::state::AppState;

pub struct ChatApp {
    state: AppState,
    command_sender: mpsc::Sender<ClientCommand>,
    event_receiver: mpsc::Receiver<ClientEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        command_sender: mpsc::Sender<ClientCommand>,
        event_receiver: mpsc::Receiver<ClientEvent>,
    ) -> Self {
        Self {
            state: AppState::new(),
            command_sender,
            event_receiver,
        }
    }

    fn handle_client_events(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply_event(event, now);
        }
        self.state.expire_toast(now);
    }

    fn send_command(&mut self, command: ClientCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to polling client: {err}");
            // Nothing will answer this send, so unlock the composer now.
            self.state.apply_event(
                ClientEvent::SendFailed(err.to_string()),
                Instant::now(),
            );
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_client_events();

        egui::TopBottomPanel::top("chat_header").show(ctx, |ui| {
            ui.add_space(4.0);
            header::render(ui, &self.state);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("chat_input").show(ctx, |ui| {
            ui.add_space(4.0);
            if let Some(toast) = &self.state.toast {
                ui.colored_label(
                    egui::Color32::LIGHT_RED,
                    format!("{}: {}", toast.title, toast.text),
                );
            }
            if let Some(content) = input_bar::render(ui, &mut self.state) {
                self.send_command(ClientCommand::SendMessage(content));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            chat_area::render(ui, &mut self.state);
        });

        // Poll results arrive from another task; keep checking the channel.
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}
