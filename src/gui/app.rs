// src/gui/app.rs
use std::{
    error::Error,
    sync::{Arc, Mutex},
};

use eframe::egui;

use crate::{
    config::{
        options::{SourceKind, SourceSpec},
        state::AppState,
    },
    history::HistoryLog,
    model::Row,
    runner::{self, RunSummary},
    store,
};

use super::{
    progress::GuiProgress,
    table_model::{TableData, ViewFilter},
};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "Brawl Export",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // source/output text fields (mapped into RunOptions on refresh)
    pub source_text: String,
    pub source_kind: SourceKind,
    pub out_path_text: String,

    // what is on disk right now
    pub rows: Vec<Row>,
    pub history: HistoryLog,

    // derived view of `rows`
    pub table: TableData,

    pub status: Arc<Mutex<String>>,
    pub last_summary: Option<RunSummary>,
}

impl App {
    pub fn new(mut state: AppState) -> Self {
        state.options.env = crate::config::options::EnvFlags::from_env();

        let source_text = state.options.source.describe();
        let source_kind = state.options.source.kind();
        let out_path_text = state.options.output.to_string_lossy().into_owned();

        let mut app = Self {
            state,
            source_text,
            source_kind,
            out_path_text,
            rows: Vec::new(),
            history: HistoryLog::new(),
            table: TableData::default(),
            status: Arc::new(Mutex::new(s!("Idle"))),
            last_summary: None,
        };
        app.reload();
        logf!("Init: rows={}, history cards={}", app.rows.len(), app.history.len());
        app
    }

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Re-read output and history from disk, then rebuild the view.
    pub fn reload(&mut self) {
        let opts = &self.state.options;
        match store::load_rows(&opts.output) {
            Ok(rows) => {
                if !rows.is_empty() {
                    self.status(format!("Loaded {} row(s) from {}", rows.len(), opts.output.display()));
                }
                self.rows = rows;
            }
            Err(e) => {
                loge!("Cache: {e}");
                self.status(e.to_string());
            }
        }
        match store::load_history(&opts.history_path(), opts.history_limit) {
            Ok(h) => self.history = h,
            Err(e) => loge!("Cache: {e}"),
        }
        self.rebuild_view();
    }

    pub fn rebuild_view(&mut self) {
        let gui = &self.state.gui;
        self.table = TableData::from_rows(
            &self.rows,
            ViewFilter { name_contains: &gui.name_filter, hide_total: gui.hide_total },
        );
    }

    /// Map the text fields back into the run options.
    pub fn sync_fields_into_options(&mut self) {
        let text = self.source_text.trim();
        let kind = self.source_kind;
        self.state.options.source = if text.starts_with("http://") || text.starts_with("https://") {
            SourceSpec::Url { url: s!(text), kind }
        } else {
            SourceSpec::File { path: text.into(), kind }
        };
        let out = self.out_path_text.trim();
        if !out.is_empty() {
            self.state.options.output = out.into();
        }
    }

    /// Fetch, export and reload. Runs on the UI thread.
    pub fn refresh(&mut self) {
        self.sync_fields_into_options();
        logf!("UI: refresh from {}", self.state.options.source.describe());

        let mut progress = GuiProgress::new(self.status.clone());
        match runner::run(&self.state.options, Some(&mut progress)) {
            Ok(summary) => {
                self.reload();
                self.status(summary.describe());
                self.last_summary = Some(summary);
            }
            Err(e) => {
                loge!("UI: refresh failed: {e}");
                self.status(format!("Refresh failed: {e}"));
            }
        }
    }

    pub fn generate_overrides(&mut self) {
        self.sync_fields_into_options();
        match runner::generate_overrides(&self.state.options) {
            Ok((path, n)) => self.status(format!("Wrote {n} override(s) to {}", path.display())),
            Err(e) => self.status(e.to_string()),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.gui.show_history {
            egui::SidePanel::right("history")
                .resizable(true)
                .default_width(240.0)
                .show(ctx, |ui| {
                    crate::gui::components::history_panel::draw(ui, self);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            crate::gui::components::action_bar::draw(ui, self);

            ui.separator();

            crate::gui::components::data_table::draw(ui, self);
        });
    }
}
