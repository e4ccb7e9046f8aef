// src/config/state.rs
use super::options::RunOptions;

#[derive(Clone, Debug)]
pub struct GuiState {
    pub window_w: u32,
    pub window_h: u32,

    /// Show the history side panel
    pub show_history: bool,

    /// Hide the TOTAL row in the table (it is still written to disk)
    pub hide_total: bool,

    /// Case-insensitive name filter for the table
    pub name_filter: String,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            window_w: 1100,
            window_h: 700,
            show_history: true,
            hide_total: false,
            name_filter: s!(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: RunOptions,
    pub gui: GuiState,
}
