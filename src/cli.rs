// src/cli.rs
use std::path::PathBuf;

use color_eyre::eyre::{bail, eyre, Result};

use crate::config::consts::DEFAULT_OUTPUT_FILE;
use crate::config::options::{RunOptions, SourceKind, SourceSpec};
use crate::file::resolve_out_path;
use crate::runner::{self, RunSummary};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Export(RunOptions),
    GenerateOverrides(RunOptions),
    Help,
}

pub fn run() -> Result<()> {
    match parse_args(std::env::args().skip(1))? {
        Command::Help => eprintln!("{}", include_str!("cli_help.txt")),
        Command::GenerateOverrides(opts) => {
            let (path, n) = runner::generate_overrides(&opts)?;
            println!("Wrote {n} override(s) to {}", path.display());
        }
        Command::Export(opts) => {
            let summary = runner::run(&opts, None)?;
            if let RunSummary::Written { card, .. } = &summary {
                for line in &card.lines {
                    println!("  {line}");
                }
            }
            println!("{}", summary.describe());
        }
    }
    Ok(())
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut opts = RunOptions::from_env();
    let mut generate = false;

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        let mut value = |what: &str| args.next().ok_or_else(|| eyre!("Missing value for {a} ({what})"));
        match a.as_str() {
            "-u" | "--url" => {
                opts.source = SourceSpec::Url { url: value("URL")?, kind: SourceKind::Markup };
            }
            "--api-url" => {
                opts.source = SourceSpec::Url { url: value("URL")?, kind: SourceKind::Structured };
            }
            "-f" | "--html-file" => {
                opts.source = SourceSpec::File { path: value("path")?.into(), kind: SourceKind::Markup };
            }
            "--json-file" => {
                opts.source = SourceSpec::File { path: value("path")?.into(), kind: SourceKind::Structured };
            }
            "-o" | "--output" => opts.output = resolve_out_path(&value("path")?, DEFAULT_OUTPUT_FILE)?,
            "--previous" => opts.set_previous_path(PathBuf::from(value("path")?)),
            "--overrides" => opts.set_overrides_path(PathBuf::from(value("path")?)),
            "--history" => opts.set_history_path(PathBuf::from(value("path")?)),
            "--history-limit" => {
                let n: usize = value("count")?.parse()?;
                if n == 0 {
                    bail!("--history-limit must be at least 1");
                }
                opts.history_limit = n;
            }
            "--write-overrides" => opts.persist_synthesized_overrides = true,
            "--generate-overrides" => generate = true,
            "-h" | "--help" => return Ok(Command::Help),
            _ => bail!("Unknown arg: {a}"),
        }
    }

    Ok(if generate { Command::GenerateOverrides(opts) } else { Command::Export(opts) })
}
