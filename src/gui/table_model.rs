// src/gui/table_model.rs
//! TableData: display view of the exported rows.
//!
//! - Columns are the union of row keys in first-seen order, so override
//!   attributes (e.g. `Hypercharge`) show up after the fixed columns.
//! - Cells are rendered as text; missing keys become empty cells.
//! - The name filter and the TOTAL toggle only affect the view, never the
//!   rows on disk.

use crate::model::{Row, COL_NAME, COLUMNS};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Index into `rows` of the aggregate row, if shown.
    pub total_ix: Option<usize>,
}

/// What to keep when building the view.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewFilter<'a> {
    pub name_contains: &'a str,
    pub hide_total: bool,
}

fn union_headers(rows: &[Row]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for key in rows.iter().flat_map(|r| r.keys()) {
        if !headers.iter().any(|h| h == key) {
            headers.push(s!(key));
        }
    }
    if headers.is_empty() {
        headers = COLUMNS.iter().map(|c| s!(*c)).collect();
    }
    headers
}

impl TableData {
    pub fn from_rows(rows: &[Row], filter: ViewFilter) -> Self {
        let headers = union_headers(rows);
        let needle = filter.name_contains.trim().to_lowercase();

        let mut out = Self { headers, ..Self::default() };
        for row in rows {
            let total = row.is_total();
            if total && filter.hide_total {
                continue;
            }
            // TOTAL stays visible while filtering by name
            if !total && !needle.is_empty() {
                let name = row.name().unwrap_or_default().to_lowercase();
                if !name.contains(&needle) {
                    continue;
                }
            }
            if total {
                out.total_ix = Some(out.rows.len());
            }
            out.rows.push(out.headers.iter().map(|h| row.cell_text(h)).collect());
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ncols(&self) -> usize {
        self.headers.len()
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Left-aligned text columns; everything else is centered like numbers.
    pub fn is_text_column(&self, ci: usize) -> bool {
        self.headers.get(ci).is_some_and(|h| h == COL_NAME)
    }
}
