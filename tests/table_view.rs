// tests/table_view.rs
//
// Table view built from exported rows, without UI.
use brawl_export::config::state::AppState;
use brawl_export::gui::table_model::{TableData, ViewFilter};
use brawl_export::model::Row;
use serde_json::json;

fn exported() -> Vec<Row> {
    serde_json::from_value(json!([
        {"Brawler": "Shelly", "Power": 9, "Trophies": 1045, "Hypercharge": "Yes"},
        {"Brawler": "El Primo", "Power": 7, "Trophies": 512, "Hypercharge": "Yes"},
        {"Brawler": "TOTAL", "Power": "", "Trophies": 1557}
    ]))
    .unwrap()
}

#[test]
fn default_state_shows_everything() {
    let state = AppState::default();
    let gui = &state.gui;
    let t = TableData::from_rows(
        &exported(),
        ViewFilter { name_contains: &gui.name_filter, hide_total: gui.hide_total },
    );
    assert_eq!(t.nrows(), 3);
    assert_eq!(t.headers, vec!["Brawler", "Power", "Trophies", "Hypercharge"]);
    assert_eq!(t.rows[2], vec!["TOTAL", "", "1557", ""]);
}

#[test]
fn filter_by_name_keeps_total_visible() {
    let t = TableData::from_rows(&exported(), ViewFilter { name_contains: " primo ", hide_total: false });
    let names: Vec<&str> = t.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(names, vec!["El Primo", "TOTAL"]);
}
