// src/gui/components/history_panel.rs
//
// Right-hand list of history cards, newest first.

use eframe::egui::{self, Color32, RichText};
use crate::gui::app::App;

const GAIN: Color32 = Color32::from_rgb(0x5C, 0xC8, 0x5C);
const LOSS: Color32 = Color32::from_rgb(0xDC, 0x61, 0x49);

fn tint(delta_text: &str) -> Option<Color32> {
    if delta_text.ends_with(|c: char| c.is_ascii_digit()) {
        match delta_text.rsplit(' ').next().and_then(|d| d.chars().next()) {
            Some('+') => return Some(GAIN),
            Some('-') => return Some(LOSS),
            _ => {}
        }
    }
    None
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("History");
    ui.separator();

    if app.history.is_empty() {
        ui.label("No runs recorded yet.");
        return;
    }

    egui::ScrollArea::vertical()
        .id_salt("history_panel_scroll")
        .show(ui, |ui| {
            for card in app.history.cards() {
                let total = RichText::new(format!("{:+}", card.total)).strong();
                let total = match card.total.signum() {
                    1 => total.color(GAIN),
                    -1 => total.color(LOSS),
                    _ => total,
                };
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&card.timestamp).monospace());
                    ui.label(total);
                });
                if card.lines.is_empty() {
                    ui.label(RichText::new("no changes").weak());
                }
                for line in &card.lines {
                    let mut rt = RichText::new(line);
                    if let Some(c) = tint(line) {
                        rt = rt.color(c);
                    }
                    ui.label(rt);
                }
                ui.separator();
            }
        });
}
