use eframe::egui;

use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        ui.heading("Anonymous Chat");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            match state.online_count {
                Some(1) => ui.label("1 person online"),
                Some(count) => ui.label(format!("{count} people online")),
                None => ui.label(egui::RichText::new("connecting...").weak()),
            };
            if state.poll_error.is_some() {
                ui.colored_label(egui::Color32::YELLOW, "⚠ reconnecting");
            }
        });
    });
}
