// src/runner.rs
//
// One export run end to end: fetch → load previous state → pipeline →
// write output, previous snapshot, history (and overrides when asked).

use std::path::PathBuf;

use serde_json::Value;

use crate::{
    config::{consts::HISTORY_TIMESTAMP_FMT, options::{RunOptions, SourceKind}},
    core::net::{fetch, FetchOutcome},
    error::{Error, Result},
    history::HistoryCard,
    overrides,
    pipeline::{self, Inputs, Outcome, PipelineConfig, Source},
    progress::Progress,
    store,
};

const STAGES: usize = 3;

/// What a run did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunSummary {
    Written {
        output: PathBuf,
        /// Brawler rows, TOTAL not counted.
        brawlers: usize,
        card: HistoryCard,
        backed_up: bool,
        overrides_written: bool,
    },
    /// The source held no brawlers; nothing was touched.
    NoEntities,
    /// Fetch failed but an earlier output exists and was left in place.
    KeptExisting { reason: String },
}

impl RunSummary {
    /// One line for a status bar or the terminal.
    pub fn describe(&self) -> String {
        match self {
            RunSummary::Written { output, brawlers, card, .. } => format!(
                "Wrote {brawlers} brawler(s) to {} ({} change(s), {:+} trophies)",
                output.display(), card.lines.len(), card.total
            ),
            RunSummary::NoEntities => s!("No brawlers found, existing output left untouched"),
            RunSummary::KeptExisting { reason } => format!("Fetch failed ({reason}), kept existing output"),
        }
    }
}

pub fn now_stamp() -> String {
    chrono::Local::now().format(HISTORY_TIMESTAMP_FMT).to_string()
}

/// Top-level runner, stamped with the local time.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(opts: &RunOptions, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    run_at(opts, &now_stamp(), progress)
}

/// Same as `run` with an explicit history timestamp.
pub fn run_at(
    opts: &RunOptions,
    timestamp: &str,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(STAGES);
    }
    report(&mut progress, &format!("Fetching {}", opts.source.describe()));

    let fetched = fetch(&opts.source, &opts.env);
    stage_done(&mut progress, "fetch");

    let decoded = match fetched {
        FetchOutcome::Failed(reason) => Err(reason),
        FetchOutcome::Fetched(body) => decode(opts.source.kind(), &body).map(|doc| (doc, body)),
    };
    stage_done(&mut progress, "parse");

    let summary = match decoded {
        Err(reason) => fetch_failed(opts, reason),
        Ok((doc, body)) => export(opts, timestamp, doc.as_source(&body)),
    };
    stage_done(&mut progress, "write");

    match &summary {
        Ok(s) => report(&mut progress, &s.describe()),
        Err(e) => report(&mut progress, &format!("Export failed: {e}")),
    }
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    summary
}

fn report(progress: &mut Option<&mut dyn Progress>, msg: &str) {
    logf!("Runner: {msg}");
    if let Some(p) = progress.as_deref_mut() {
        p.log(msg);
    }
}

fn stage_done(progress: &mut Option<&mut dyn Progress>, stage: &str) {
    if let Some(p) = progress.as_deref_mut() {
        p.stage_done(stage);
    }
}

/// Parsed payload, borrowed back as a pipeline source.
enum Decoded {
    Markup,
    Structured(Value),
}

impl Decoded {
    fn as_source<'a>(&'a self, body: &'a str) -> Source<'a> {
        match self {
            Decoded::Markup => Source::Markup(body),
            Decoded::Structured(v) => Source::Structured(v),
        }
    }
}

fn decode(kind: SourceKind, body: &str) -> std::result::Result<Decoded, String> {
    match kind {
        SourceKind::Markup => Ok(Decoded::Markup),
        SourceKind::Structured => serde_json::from_str(body)
            .map(Decoded::Structured)
            .map_err(|e| format!("payload is not valid JSON: {e}")),
    }
}

fn fetch_failed(opts: &RunOptions, reason: String) -> Result<RunSummary> {
    if opts.output.is_file() {
        logw!("Runner: {reason}; using existing output file {}", opts.output.display());
        Ok(RunSummary::KeptExisting { reason })
    } else {
        loge!("Runner: {reason}; no output to fall back on");
        Err(Error::Fetch(reason))
    }
}

fn export(opts: &RunOptions, timestamp: &str, source: Source) -> Result<RunSummary> {
    let inputs = Inputs {
        previous: store::load_rows(&opts.output)?,
        overrides: store::load_overrides(&opts.overrides_path()),
        history: store::load_history(&opts.history_path(), opts.history_limit)?,
    };
    let config = PipelineConfig { history_limit: opts.history_limit, ..PipelineConfig::new(timestamp) };

    let artifacts = match pipeline::run(source, inputs, &config) {
        Outcome::Empty => return Ok(RunSummary::NoEntities),
        Outcome::Produced(a) => a,
    };

    let backed_up = match store::backup_previous(&opts.output, &opts.previous_path()) {
        Ok(done) => done,
        Err(e) => {
            logw!("Runner: backup skipped: {e}");
            false
        }
    };
    store::save_json(&opts.output, &artifacts.rows)?;
    store::save_json(&opts.history_path(), &artifacts.history)?;

    let overrides_written = artifacts.overrides_synthesized && opts.persist_synthesized_overrides;
    if overrides_written {
        store::save_json(&opts.overrides_path(), &artifacts.overrides)?;
    }

    Ok(RunSummary::Written {
        output: opts.output.clone(),
        brawlers: artifacts.rows.iter().filter(|r| !r.is_total()).count(),
        card: artifacts.card,
        backed_up,
        overrides_written,
    })
}

/// Rebuild the override file from the current output: one default
/// attribute set per brawler. Returns the path written and the entry count.
pub fn generate_overrides(opts: &RunOptions) -> Result<(PathBuf, usize)> {
    if !opts.output.is_file() {
        return Err(Error::NoOutput(opts.output.clone()));
    }
    let rows = store::load_rows(&opts.output)?;
    let map = overrides::from_rows(&rows);
    let path = opts.overrides_path();
    store::save_json(&path, &map)?;
    logf!("Runner: wrote {} override(s) to {}", map.len(), path.display());
    Ok((path, map.len()))
}
