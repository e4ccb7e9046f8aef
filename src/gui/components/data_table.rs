// src/gui/components/data_table.rs
//
// Draws the records table from `app.table`. Purely a view.

use eframe::egui::{self, Align, Layout, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};
use crate::gui::app::App;
use crate::model::COL_NAME;

fn preferred_width(header: &str) -> f32 {
    if header == COL_NAME { 160.0 } else { 90.0 }
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let table = &app.table;
    if table.is_empty() {
        ui.label("No data yet. Press REFRESH to export.");
        return;
    }

    // Reserve space for scroll bars instead of overlaying content
    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;
        s.bar_width = 10.0;
        s.handle_min_length = 48.0;
        let visuals = &mut ui.style_mut().visuals;
        visuals.extreme_bg_color = visuals.panel_fill;
    }

    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .min_scrolled_height(0.0)
        .id_salt(("records", table.ncols()));
    for h in &table.headers {
        builder = builder.column(Column::initial(preferred_width(h)).resizable(true).clip(true).at_least(20.0));
    }

    builder
        .header(24.0, |mut header| {
            for (ci, h) in table.headers.iter().enumerate() {
                header.col(|ui| {
                    ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                    let label = egui::Label::new(RichText::new(h).strong()).selectable(false);
                    if table.is_text_column(ci) {
                        ui.with_layout(Layout::left_to_right(Align::Center), |ui| { ui.add(label); });
                    } else {
                        ui.centered_and_justified(|ui| { ui.add(label); });
                    }
                });
            }
        })
        .body(|body| {
            body.rows(20.0, table.nrows(), |mut row| {
                let ri = row.index();
                let Some(cells) = table.rows.get(ri) else { return };
                let is_total = table.total_ix == Some(ri);
                for (ci, cell) in cells.iter().enumerate() {
                    row.col(|ui| {
                        ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                        let mut rt = RichText::new(cell);
                        if is_total {
                            rt = rt.strong();
                        }
                        if table.is_text_column(ci) {
                            ui.with_layout(Layout::left_to_right(Align::Center), |ui| { ui.label(rt); });
                        } else {
                            ui.centered_and_justified(|ui| { ui.label(rt); });
                        }
                    });
                }
            });
        });
}
