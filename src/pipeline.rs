// src/pipeline.rs
//
// Pure export pipeline:
//   source → specs (extract) → normalize → rows + TOTAL → overrides → history
//
// No I/O happens here. Inputs are loaded by the caller beforehand and the
// produced artifacts are persisted by the caller afterwards.

use serde_json::Value;

use crate::config::consts::{DIFF_LINE_LIMIT, HISTORY_LIMIT};
use crate::config::options::SourceKind;
use crate::history::{self, HistoryCard, HistoryLog};
use crate::model::{total_row, RawRecord, Row};
use crate::normalize::normalize_all;
use crate::overrides::{self, OverrideMap};
use crate::specs;

/// A fetched document, read-only.
#[derive(Clone, Copy, Debug)]
pub enum Source<'a> {
    Markup(&'a str),
    Structured(&'a Value),
}

impl Source<'_> {
    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Markup(_) => SourceKind::Markup,
            Source::Structured(_) => SourceKind::Structured,
        }
    }
}

/// State carried over from earlier runs. Every part may be empty.
#[derive(Clone, Debug, Default)]
pub struct Inputs {
    /// Rows of the previous output, TOTAL included or not.
    pub previous: Vec<Row>,
    /// `None` when no override file exists.
    pub overrides: Option<OverrideMap>,
    pub history: HistoryLog,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub history_limit: usize,
    pub diff_limit: usize,
    /// Opaque label stored on the new history card.
    pub timestamp: String,
}

impl PipelineConfig {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self { history_limit: HISTORY_LIMIT, diff_limit: DIFF_LINE_LIMIT, timestamp: timestamp.into() }
    }
}

#[derive(Clone, Debug)]
pub struct Artifacts {
    /// Brawler rows with overrides merged, TOTAL last.
    pub rows: Vec<Row>,
    pub overrides: OverrideMap,
    /// True when `overrides` was synthesized rather than loaded.
    pub overrides_synthesized: bool,
    pub card: HistoryCard,
    pub history: HistoryLog,
}

#[derive(Clone, Debug)]
pub enum Outcome {
    /// Nothing was extracted; the caller keeps whatever it had.
    Empty,
    Produced(Artifacts),
}

pub fn extract(source: Source) -> Vec<RawRecord> {
    match source {
        Source::Markup(doc) => specs::profile::parse_doc(doc),
        Source::Structured(payload) => specs::api::parse_payload(payload),
    }
}

pub fn run(source: Source, inputs: Inputs, config: &PipelineConfig) -> Outcome {
    let raws = extract(source);
    if raws.is_empty() {
        logw!("Pipeline: no brawlers found in {:?} source", source.kind());
        return Outcome::Empty;
    }

    let records = normalize_all(&raws);
    let (override_map, overrides_synthesized) = overrides::resolve(inputs.overrides, &records);

    let mut rows: Vec<Row> = records.iter().map(|r| r.to_row()).collect();
    rows.push(total_row(&records));
    let rows = overrides::merge(rows, &override_map);

    let card = history::build_card(&config.timestamp, &inputs.previous, &rows, config.diff_limit);
    let mut history = inputs.history;
    history.record(card.clone(), config.history_limit);

    logf!(
        "Pipeline: {} brawler(s), {} change line(s), total delta {:+}",
        records.len(), card.lines.len(), card.total
    );

    Outcome::Produced(Artifacts {
        rows,
        overrides: override_map,
        overrides_synthesized,
        card,
        history,
    })
}
