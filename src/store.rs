// src/store.rs
//
// On-disk documents of the exporter: output rows, previous snapshot,
// overrides and history. All JSON. A missing document loads as empty.

use std::{fs, io, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::file::{ensure_parent, write_replace};
use crate::history::{HistoryCard, HistoryLog};
use crate::model::Row;
use crate::overrides::{self, OverrideMap};

/// `Ok(None)` when the file does not exist.
fn read_text(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let Some(text) = read_text(path)? else {
        logd!("Store: {} not found, starting empty", path.display());
        return Ok(T::default());
    };
    serde_json::from_str(&text).map_err(|e| Error::json(path, e))
}

pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let rows: Vec<Row> = load_json(path)?;
    logd!("Store: loaded {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn load_history(path: &Path, limit: usize) -> Result<HistoryLog> {
    let cards: Vec<HistoryCard> = load_json(path)?;
    Ok(HistoryLog::from_cards(cards, limit))
}

/// Overrides are hand-edited: anything unreadable counts as absent.
pub fn load_overrides(path: &Path) -> Option<OverrideMap> {
    let text = match read_text(path) {
        Ok(Some(t)) => t,
        Ok(None) => return None,
        Err(e) => {
            logw!("Store: {e}, ignoring overrides");
            return None;
        }
    };
    let doc: Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            logw!("Store: malformed overrides in {}: {e}, ignoring", path.display());
            return None;
        }
    };
    let map = overrides::from_json(&doc);
    if map.is_none() {
        logw!("Store: {} is not an object, ignoring", path.display());
    }
    map
}

/// Pretty-printed JSON with a trailing newline.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| Error::json(path, e))?;
    text.push('\n');
    write_replace(path, text.as_bytes())?;
    logd!("Store: wrote {}", path.display());
    Ok(())
}

/// Copy the current output aside before it gets replaced. Returns whether
/// there was anything to copy.
pub fn backup_previous(output: &Path, previous: &Path) -> Result<bool> {
    if !output.is_file() {
        return Ok(false);
    }
    ensure_parent(previous)?;
    fs::copy(output, previous).map_err(|e| Error::io(previous, e))?;
    logd!("Store: backed up {} to {}", output.display(), previous.display());
    Ok(true)
}
