// src/normalize.rs
//
// Tolerant coercion and the raw → canonical record step.

use serde_json::Value;

use crate::config::consts::{MAX_LEVEL, UNKNOWN_NAME};
use crate::core::sanitize::{digits_only, normalize_ws, signed_digits};
use crate::cost::remaining_cost;
use crate::model::{RawRecord, Record};

/// Digits only, then parse; 0 when nothing numeric is left.
pub fn to_int(s: &str) -> i64 {
    digits_only(s).parse().unwrap_or(0)
}

/// Like `to_int` but keeps a minus sign; 0 on any parse failure.
pub fn to_int_signed(s: &str) -> i64 {
    signed_digits(s).parse().unwrap_or(0)
}

/// JSON numbers are taken as-is (floats truncate), text goes through
/// `to_int_signed`, everything else is 0.
pub fn value_to_int(v: &Value) -> i64 {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => to_int_signed(s),
        _ => 0,
    }
}

pub fn clamp_level(level: i64) -> u32 {
    level.clamp(1, MAX_LEVEL) as u32
}

fn non_negative(v: i64) -> u64 {
    v.max(0) as u64
}

fn count(v: i64) -> u32 {
    u32::try_from(v.max(0)).unwrap_or(u32::MAX)
}

fn clean_name(name: Option<&str>) -> String {
    let n = name.map(normalize_ws).unwrap_or_default();
    if n.is_empty() { s!(UNKNOWN_NAME) } else { n }
}

pub fn normalize(raw: &RawRecord) -> Record {
    let name = clean_name(raw.name.as_deref());
    let level = clamp_level(raw.power);
    let (points_to_max, coins_to_max) = remaining_cost(i64::from(level));

    if let Some(p) = raw.reported_points.filter(|&p| non_negative(p) != points_to_max) {
        logd!("Normalize: {name} site reports {p} points to max, model says {points_to_max}");
    }
    if let Some(c) = raw.reported_coins.filter(|&c| non_negative(c) != coins_to_max) {
        logd!("Normalize: {name} site reports {c} coins to max, model says {coins_to_max}");
    }

    Record {
        name,
        level,
        trophies: non_negative(raw.trophies),
        gadgets: count(raw.gadgets),
        star_powers: count(raw.star_powers),
        gears: count(raw.gears),
        points_to_max,
        coins_to_max,
    }
}

pub fn normalize_all(raws: &[RawRecord]) -> Vec<Record> {
    raws.iter().map(normalize).collect()
}
