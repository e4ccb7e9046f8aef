// src/gui/components/action_bar.rs
//
// Source / output fields, the REFRESH action and the status line.

use eframe::egui::{self, Checkbox};
use crate::{config::options::SourceKind, gui::app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    // --- Source ---
    ui.horizontal(|ui| {
        ui.label("Source:");
        let before = app.source_kind;
        ui.selectable_value(&mut app.source_kind, SourceKind::Markup, "Profile page");
        ui.selectable_value(&mut app.source_kind, SourceKind::Structured, "API JSON");
        if app.source_kind != before {
            logf!("UI: source kind → {:?}", app.source_kind);
        }
        ui.add(egui::TextEdit::singleline(&mut app.source_text)
            .font(egui::TextStyle::Monospace)
            .desired_width(f32::INFINITY));
    });

    // --- Output ---
    ui.horizontal(|ui| {
        ui.label("Output:");
        if ui
            .add(egui::TextEdit::singleline(&mut app.out_path_text)
                .font(egui::TextStyle::Monospace))
            .changed()
        {
            logd!("UI: out_path_text changed → {}", app.out_path_text);
        }
        let opts = &mut app.state.options;
        if ui.add(Checkbox::new(&mut opts.persist_synthesized_overrides, "Save default overrides")).changed() {
            logf!("UI: persist_synthesized_overrides → {}", opts.persist_synthesized_overrides);
        }
    });

    // --- View filters ---
    let mut view_changed = false;
    ui.horizontal(|ui| {
        let gui = &mut app.state.gui;
        ui.label("Filter:");
        view_changed |= ui.add(egui::TextEdit::singleline(&mut gui.name_filter).desired_width(160.0)).changed();
        view_changed |= ui.checkbox(&mut gui.hide_total, "Hide TOTAL").changed();
        ui.checkbox(&mut gui.show_history, "History");
    });
    if view_changed {
        app.rebuild_view();
    }

    // --- Actions ---
    ui.horizontal(|ui| {
        let gold = egui::Color32::from_rgb(0xF0, 0xC0, 0x20);
        let refresh = ui.add(
            egui::Button::new(egui::RichText::new("REFRESH").color(egui::Color32::BLACK).strong())
                .fill(gold),
        );
        if refresh.clicked() {
            app.refresh();
        }

        if ui.button("Reload").on_hover_text("Re-read output and history from disk").clicked() {
            app.sync_fields_into_options();
            app.reload();
        }

        if ui.button("Generate overrides").on_hover_text("Rebuild overrides.json from the current output").clicked() {
            app.generate_overrides();
        }

        ui.label(app.status_text());
    });
}
