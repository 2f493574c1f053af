use eframe::egui;

use crate::common::Message;
use crate::ui::state::{AppState, format_time, is_cosmetically_sent};

const SENT_FILL: egui::Color32 = egui::Color32::from_rgb(0xdc, 0xf8, 0xc6);
const RECEIVED_FILL: egui::Color32 = egui::Color32::from_rgb(0xff, 0xff, 0xff);

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    if !state.loaded {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("Loading messages...").weak());
        });
        return;
    }

    if state.messages.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("👋\nNo messages yet. Be the first to say hello!").weak(),
            );
        });
        return;
    }

    let scroll_to_bottom = state.take_scroll_request();
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in &state.messages {
                render_message(ui, message);
                ui.add_space(6.0);
            }
            if scroll_to_bottom {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });
}

fn render_message(ui: &mut egui::Ui, message: &Message) {
    let sent = is_cosmetically_sent(&message.id);
    let layout = if sent {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::group(ui.style())
            .fill(if sent { SENT_FILL } else { RECEIVED_FILL })
            .show(ui, |ui| {
                ui.set_max_width(320.0);
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&message.content).color(egui::Color32::DARK_GRAY));
                    let mut time = format_time(&message.timestamp);
                    if sent {
                        time.push_str(" ✓✓");
                    }
                    ui.label(egui::RichText::new(time).small().color(egui::Color32::GRAY));
                });
            });
    });
}
