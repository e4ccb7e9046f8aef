// src/model.rs
//
// Record shapes flowing through the pipeline:
//   RawRecord  what an extractor could read, pre-normalization
//   Record     canonical per-brawler values
//   Row        ordered JSON object written to the output file

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::consts::TOTAL_NAME;
use crate::normalize::value_to_int;

pub const COL_NAME: &str = "Brawler";
pub const COL_POWER: &str = "Power";
pub const COL_TROPHIES: &str = "Trophies";
pub const COL_GADGETS: &str = "Gadgets";
pub const COL_STAR_POWERS: &str = "Star Powers";
pub const COL_GEARS: &str = "Gears";
pub const COL_POINTS: &str = "Points to MAX";
pub const COL_COINS: &str = "Coins to MAX";

/// Canonical column order of the output.
pub const COLUMNS: [&str; 8] = [
    COL_NAME, COL_POWER, COL_TROPHIES, COL_GADGETS,
    COL_STAR_POWERS, COL_GEARS, COL_POINTS, COL_COINS,
];

/// True for the aggregate row's name, in any case and ignoring padding.
pub fn is_total_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(TOTAL_NAME)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub name: Option<String>,
    pub power: i64,
    pub trophies: i64,
    pub gadgets: i64,
    pub star_powers: i64,
    pub gears: i64,
    /// Site-reported remaining cost, when the source shows one.
    pub reported_points: Option<i64>,
    pub reported_coins: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub level: u32,
    pub trophies: u64,
    pub gadgets: u32,
    pub star_powers: u32,
    pub gears: u32,
    pub points_to_max: u64,
    pub coins_to_max: u64,
}

impl Record {
    pub fn to_row(&self) -> Row {
        let mut m = Map::new();
        m.insert(s!(COL_NAME), Value::from(self.name.clone()));
        m.insert(s!(COL_POWER), Value::from(self.level));
        m.insert(s!(COL_TROPHIES), Value::from(self.trophies));
        m.insert(s!(COL_GADGETS), Value::from(self.gadgets));
        m.insert(s!(COL_STAR_POWERS), Value::from(self.star_powers));
        m.insert(s!(COL_GEARS), Value::from(self.gears));
        m.insert(s!(COL_POINTS), Value::from(self.points_to_max));
        m.insert(s!(COL_COINS), Value::from(self.coins_to_max));
        Row(m)
    }
}

/// The synthetic aggregate row: sums trophies and remaining cost, leaves the
/// per-brawler count columns blank.
pub fn total_row(records: &[Record]) -> Row {
    let sum = |f: fn(&Record) -> u64| records.iter().fold(0u64, |acc, r| acc.saturating_add(f(r)));
    let trophies = sum(|r| r.trophies);
    let points = sum(|r| r.points_to_max);
    let coins = sum(|r| r.coins_to_max);

    let blank = || Value::from("");
    let mut m = Map::new();
    m.insert(s!(COL_NAME), Value::from(TOTAL_NAME));
    m.insert(s!(COL_POWER), blank());
    m.insert(s!(COL_TROPHIES), Value::from(trophies));
    m.insert(s!(COL_GADGETS), blank());
    m.insert(s!(COL_STAR_POWERS), blank());
    m.insert(s!(COL_GEARS), blank());
    m.insert(s!(COL_POINTS), Value::from(points));
    m.insert(s!(COL_COINS), Value::from(coins));
    Row(m)
}

/// One output object. Key order is insertion order: canonical columns
/// first, merged override keys after.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(pub Map<String, Value>);

impl Row {
    pub fn name(&self) -> Option<&str> {
        self.0.get(COL_NAME).and_then(Value::as_str)
    }

    pub fn is_total(&self) -> bool {
        self.name().is_some_and(is_total_name)
    }

    /// Trophy count, tolerant of numbers stored as text.
    pub fn trophies(&self) -> i64 {
        self.0.get(COL_TROPHIES).map(value_to_int).unwrap_or(0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Insert or overwrite; an existing key keeps its position.
    pub fn set(&mut self, key: &str, value: Value) {
        self.0.insert(s!(key), value);
    }

    /// Display text of one cell ("" when absent).
    pub fn cell_text(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => s!(),
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
}
