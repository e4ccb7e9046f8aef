// src/history.rs
//
// Trophy changes between two snapshots, summarized as a card, kept in a
// bounded most-recent-first log.
//
// Note: both the line list and the running total stop after `cap` non-zero
// entries, so with more than `cap` changed brawlers the card total covers
// only the listed ones.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::Row;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryCard {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub total: i64,
}

/// Name → trophies, without the aggregate row. A repeated name keeps its
/// last value.
pub fn trophy_map(rows: &[Row]) -> BTreeMap<String, i64> {
    rows.iter()
        .filter(|r| !r.is_total())
        .filter_map(|r| r.name().map(|n| (s!(n), r.trophies())))
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diff {
    pub lines: Vec<String>,
    pub total: i64,
}

/// Per-name `current - previous` over the union of names (a missing side
/// counts as 0), zero deltas skipped, names ascending. Lines look like
/// `"Shelly +12"` / `"Colt -8"`.
pub fn diff(previous: &BTreeMap<String, i64>, current: &BTreeMap<String, i64>, cap: usize) -> Diff {
    let names: BTreeSet<&String> = previous.keys().chain(current.keys()).collect();
    let mut out = Diff::default();

    for name in names {
        if out.lines.len() >= cap {
            break;
        }
        let before = previous.get(name).copied().unwrap_or(0);
        let after = current.get(name).copied().unwrap_or(0);
        let delta = after.saturating_sub(before);
        if delta == 0 {
            continue;
        }
        out.lines.push(format!("{name} {delta:+}"));
        out.total = out.total.saturating_add(delta);
    }
    out
}

/// Card comparing two row snapshots.
pub fn build_card(timestamp: &str, previous: &[Row], current: &[Row], cap: usize) -> HistoryCard {
    let d = diff(&trophy_map(previous), &trophy_map(current), cap);
    HistoryCard { timestamp: s!(timestamp), lines: d.lines, total: d.total }
}

/// Most-recent-first list of cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    cards: Vec<HistoryCard>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap cards already in most-recent-first order, trimmed to `limit`.
    pub fn from_cards(mut cards: Vec<HistoryCard>, limit: usize) -> Self {
        cards.truncate(limit);
        Self { cards }
    }

    pub fn cards(&self) -> &[HistoryCard] {
        &self.cards
    }

    pub fn latest(&self) -> Option<&HistoryCard> {
        self.cards.first()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Put `card` in front and drop whatever falls past `limit`.
    pub fn record(&mut self, card: HistoryCard, limit: usize) {
        self.cards.insert(0, card);
        if self.cards.len() > limit {
            logd!("History: trimming {} old card(s)", self.cards.len() - limit);
            self.cards.truncate(limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::consts::{DIFF_LINE_LIMIT, HISTORY_LIMIT};
    use serde_json::json;

    fn snap(pairs: &[(&str, i64)]) -> BTreeMap<String, i64> {
        pairs.iter().map(|(n, t)| (s!(*n), *t)).collect()
    }

    fn rows(v: serde_json::Value) -> Vec<Row> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn union_diff_skips_unchanged() {
        let d = diff(
            &snap(&[("A", 100), ("B", 50)]),
            &snap(&[("A", 120), ("B", 50), ("C", 10)]),
            DIFF_LINE_LIMIT,
        );
        assert_eq!(d.lines, vec!["A +20", "C +10"]);
        assert_eq!(d.total, 30);
    }

    #[test]
    fn vanished_brawler_counts_as_loss() {
        let d = diff(&snap(&[("Z", 40), ("A", 5)]), &snap(&[("A", 2)]), DIFF_LINE_LIMIT);
        assert_eq!(d.lines, vec!["A -3", "Z -40"]);
        assert_eq!(d.total, -43);
    }

    #[test]
    fn identical_snapshots_are_quiet() {
        let s = snap(&[("A", 1), ("B", 2)]);
        assert_eq!(diff(&s, &s, DIFF_LINE_LIMIT), Diff::default());
        assert_eq!(diff(&BTreeMap::new(), &BTreeMap::new(), DIFF_LINE_LIMIT), Diff::default());
    }

    #[test]
    fn cap_stops_lines_and_total_together() {
        let prev = BTreeMap::new();
        let cur: BTreeMap<String, i64> = (0..30).map(|i| (format!("B{i:02}"), 1)).collect();
        let d = diff(&prev, &cur, DIFF_LINE_LIMIT);
        assert_eq!(d.lines.len(), 24);
        assert_eq!(d.total, 24);
        assert_eq!(d.lines.last().map(String::as_str), Some("B23 +1"));
    }

    #[test]
    fn extreme_previous_values_saturate() {
        let card = build_card(
            "t",
            &rows(json!([{"Brawler": "A", "Trophies": "-9223372036854775808"}])),
            &rows(json!([{"Brawler": "A", "Trophies": 5}])),
            DIFF_LINE_LIMIT,
        );
        assert_eq!(card.lines, vec![format!("A +{}", i64::MAX)]);
        assert_eq!(card.total, i64::MAX);

        let d = diff(&snap(&[("A", i64::MIN), ("B", i64::MIN)]), &snap(&[("A", 1), ("B", 1)]), DIFF_LINE_LIMIT);
        assert_eq!(d.total, i64::MAX);
    }

    #[test]
    fn trophy_map_excludes_total_in_any_case() {
        let r = rows(json!([
            {"Brawler": "A", "Trophies": 10},
            {"Brawler": "total", "Trophies": 999},
            {"Brawler": "TOTAL", "Trophies": 999},
            {"Trophies": 5}
        ]));
        assert_eq!(trophy_map(&r), snap(&[("A", 10)]));
    }

    #[test]
    fn card_from_rows() {
        let prev = rows(json!([{"Brawler": "A", "Trophies": "100"}, {"Brawler": "TOTAL", "Trophies": 100}]));
        let cur = rows(json!([{"Brawler": "A", "Trophies": 95}, {"Brawler": "TOTAL", "Trophies": 95}]));
        let card = build_card("2026-10-19 09:00", &prev, &cur, DIFF_LINE_LIMIT);
        assert_eq!(card.lines, vec!["A -5"]);
        assert_eq!(card.total, -5);
        assert_eq!(card.timestamp, "2026-10-19 09:00");
    }

    #[test]
    fn log_is_bounded_and_newest_first() {
        let mut log = HistoryLog::new();
        for i in 0..40 {
            log.record(HistoryCard { timestamp: format!("t{i}"), ..Default::default() }, HISTORY_LIMIT);
            assert!(log.len() <= HISTORY_LIMIT);
        }
        assert_eq!(log.len(), HISTORY_LIMIT);
        assert_eq!(log.latest().map(|c| c.timestamp.as_str()), Some("t39"));
        assert_eq!(log.cards().last().map(|c| c.timestamp.as_str()), Some("t16"));
    }

    #[test]
    fn log_file_shape() {
        let log: HistoryLog = serde_json::from_value(json!([
            {"timestamp": "b", "lines": ["A +1"], "total": 1},
            {"timestamp": "a"}
        ])).unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.cards()[1].lines.is_empty());
        let back = serde_json::to_value(&log).unwrap();
        assert_eq!(back[0]["total"], 1);
        assert_eq!(HistoryLog::from_cards(log.cards().to_vec(), 1).len(), 1);
    }
}
