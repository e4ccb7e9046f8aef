// tests/pipeline_e2e.rs
use std::fs;
use std::path::{Path, PathBuf};

use brawl_export::config::options::{RunOptions, SourceKind, SourceSpec};
use brawl_export::model::{COL_COINS, COL_NAME, COL_POINTS, COL_TROPHIES};
use brawl_export::runner::{generate_overrides, run_at, RunSummary};
use brawl_export::store;
use serde_json::Value;

const FIXTURE: &str = include_str!("fixtures/profile.html");

fn options(dir: &Path, page: PathBuf) -> RunOptions {
    let mut opts = RunOptions::default();
    opts.source = SourceSpec::File { path: page, kind: SourceKind::Markup };
    opts.output = dir.join("public").join("brawlers.json");
    opts
}

fn write_page(dir: &Path, html: &str) -> PathBuf {
    let p = dir.join("profile.html");
    fs::write(&p, html).unwrap();
    p
}

fn read_json(p: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(p).unwrap()).unwrap()
}

#[test]
fn first_run_writes_rows_total_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path(), write_page(dir.path(), FIXTURE));

    let summary = run_at(&opts, "2026-10-19 09:00", None).unwrap();
    let RunSummary::Written { brawlers, card, backed_up, overrides_written, .. } = summary else {
        panic!("expected a written output");
    };
    assert_eq!(brawlers, 3);
    assert!(!backed_up);
    assert!(!overrides_written);
    assert_eq!(card.lines, vec!["Colt +800", "El Primo +512", "Shelly +1045"]);
    assert_eq!(card.total, 2357);

    let out = read_json(&opts.output);
    let rows = out.as_array().unwrap();
    assert_eq!(rows.len(), 4);

    assert_eq!(rows[0][COL_NAME], "Shelly");
    assert_eq!(rows[0]["Power"], 9);
    assert_eq!(rows[0][COL_TROPHIES], 1045);
    assert_eq!(rows[0]["Gadgets"], 2);
    assert_eq!(rows[0]["Star Powers"], 1);
    assert_eq!(rows[0]["Gears"], 3);
    assert_eq!(rows[0][COL_POINTS], 2330);
    assert_eq!(rows[0][COL_COINS], 4675);
    assert_eq!(rows[0]["Hypercharge"], "Yes");

    assert_eq!(rows[1][COL_POINTS], 0);
    assert_eq!(rows[2][COL_NAME], "El Primo");
    assert_eq!(rows[2]["Gadgets"], 1);
    assert_eq!(rows[2]["Gears"], 0);
    assert_eq!(rows[2][COL_POINTS], 3220);

    let total = &rows[3];
    assert_eq!(total[COL_NAME], "TOTAL");
    assert_eq!(total[COL_TROPHIES], 2357);
    assert_eq!(total[COL_POINTS], 5550);
    assert_eq!(total[COL_COINS], 11400);
    assert_eq!(total["Gadgets"], "");
    assert!(total.get("Hypercharge").is_none());

    // overrides are synthesized in memory only unless asked for
    assert!(!opts.overrides_path().exists());
    let history = read_json(&opts.history_path());
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[test]
fn second_run_backs_up_and_diffs() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(dir.path(), FIXTURE);
    let opts = options(dir.path(), page.clone());
    run_at(&opts, "t0", None).unwrap();
    let first_output = fs::read_to_string(&opts.output).unwrap();

    fs::write(&page, FIXTURE.replace("1,045", "1,060").replace(">800<", ">790<")).unwrap();
    let summary = run_at(&opts, "t1", None).unwrap();
    let RunSummary::Written { card, backed_up, .. } = summary else {
        panic!("expected a written output");
    };
    assert!(backed_up);
    assert_eq!(card.lines, vec!["Colt -10", "Shelly +15"]);
    assert_eq!(card.total, 5);
    assert_eq!(fs::read_to_string(opts.previous_path()).unwrap(), first_output);

    let log = store::load_history(&opts.history_path(), opts.history_limit).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log.latest().unwrap().timestamp, "t1");

    // unchanged page → quiet card
    let summary = run_at(&opts, "t2", None).unwrap();
    let RunSummary::Written { card, .. } = summary else { panic!() };
    assert!(card.lines.is_empty());
    assert_eq!(card.total, 0);
}

#[test]
fn user_overrides_are_merged() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path(), write_page(dir.path(), FIXTURE));
    fs::create_dir_all(opts.output.parent().unwrap()).unwrap();
    fs::write(
        opts.overrides_path(),
        r#"{"Colt": {"Hypercharge": "No", "Main": true}, "Shelly": {"Power": "MAX"}}"#,
    )
    .unwrap();

    run_at(&opts, "t", None).unwrap();
    let out = read_json(&opts.output);
    assert_eq!(out[0]["Power"], "MAX");
    assert!(out[0].get("Hypercharge").is_none());
    assert_eq!(out[1]["Hypercharge"], "No");
    assert_eq!(out[1]["Main"], "true");
    assert!(out[2].get("Hypercharge").is_none());
}

#[test]
fn synthesized_overrides_persist_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path(), write_page(dir.path(), FIXTURE));
    opts.persist_synthesized_overrides = true;

    let RunSummary::Written { overrides_written, .. } = run_at(&opts, "t", None).unwrap() else {
        panic!("expected a written output");
    };
    assert!(overrides_written);
    let map = store::load_overrides(&opts.overrides_path()).unwrap();
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["Colt", "El Primo", "Shelly"]);

    // a second run uses the file and does not rewrite it
    let RunSummary::Written { overrides_written, .. } = run_at(&opts, "t2", None).unwrap() else {
        panic!("expected a written output");
    };
    assert!(!overrides_written);
}

#[test]
fn empty_page_leaves_previous_output_alone() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(dir.path(), FIXTURE);
    let opts = options(dir.path(), page.clone());
    run_at(&opts, "t0", None).unwrap();
    let before = fs::read_to_string(&opts.output).unwrap();

    fs::write(&page, "<html><body>Profile not found</body></html>").unwrap();
    assert_eq!(run_at(&opts, "t1", None).unwrap(), RunSummary::NoEntities);
    assert_eq!(fs::read_to_string(&opts.output).unwrap(), before);
    assert_eq!(store::load_history(&opts.history_path(), 24).unwrap().len(), 1);
}

#[test]
fn structured_payload_run() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("brawlers_api.json");
    fs::write(
        &payload,
        r#"{"items": [
            {"id": 16000000, "name": "SHELLY", "power": 7, "trophies": 300,
             "gadgets": [{"id": 1}], "starPowers": [], "gears": [{"id": 2}, {"id": 3}]}
        ]}"#,
    )
    .unwrap();
    let mut opts = RunOptions::default();
    opts.source = SourceSpec::File { path: payload, kind: SourceKind::Structured };
    opts.output = dir.path().join("brawlers.json");

    run_at(&opts, "t", None).unwrap();
    let out = read_json(&opts.output);
    assert_eq!(out[0][COL_NAME], "SHELLY");
    assert_eq!(out[0]["Gears"], 2);
    assert_eq!(out[0][COL_POINTS], 3220);
    assert_eq!(out[0][COL_COINS], 6725);
    assert_eq!(out[1][COL_NAME], "TOTAL");
}

#[test]
fn generate_overrides_from_written_output() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path(), write_page(dir.path(), FIXTURE));
    run_at(&opts, "t", None).unwrap();

    let (path, n) = generate_overrides(&opts).unwrap();
    assert_eq!(n, 3);
    let doc = read_json(&path);
    assert_eq!(doc["El Primo"]["Hypercharge"], "Yes");
    assert!(doc.get("TOTAL").is_none());
}
