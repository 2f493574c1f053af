use eframe::egui;

use crate::ui::state::AppState;

/// Draws the composer. Returns the trimmed content when the user submits.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> Option<String> {
    let mut send = false;
    ui.horizontal(|ui| {
        let input_width = ui.available_width() - 60.0;
        let response = ui.add_enabled(
            !state.sending,
            egui::TextEdit::singleline(&mut state.input_text)
                .hint_text("Type a message...")
                .desired_width(input_width),
        );

        let can_send = state.can_send();
        if ui
            .add_enabled(can_send, egui::Button::new("Send"))
            .clicked()
        {
            send = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
            response.request_focus();
        }
    });

    ui.horizontal(|ui| {
        if state.sending {
            ui.label(egui::RichText::new("Sending...").small().weak());
        } else {
            ui.label(egui::RichText::new(" ").small());
        }
    });

    if send {
        return state.take_submission();
    }

    None
}
