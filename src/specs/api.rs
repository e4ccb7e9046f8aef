// src/specs/api.rs
//
// REST payload → one RawRecord per brawler object.
//
// Accepted payloads: a bare array of brawler objects, or an object holding
// that array under one of `ENTITY_LIST_KEYS`. Count fields come either as
// lists (official API: `"gadgets": [{…}, {…}]`) or as plain numbers.

use serde_json::{Map, Value};

use crate::model::RawRecord;
use crate::normalize::value_to_int;

/// Where a wrapped payload keeps its brawler list, in lookup order.
pub const ENTITY_LIST_KEYS: &[&str] = &["items", "brawlers"];

/// Key aliases per count field, canonical key first.
pub const GADGET_KEYS: &[&str] = &["gadgets", "gadgetCount"];
pub const STAR_POWER_KEYS: &[&str] = &["starPowers", "star_powers"];
pub const GEAR_KEYS: &[&str] = &["gears", "gearCount"];

/// Capability check: does this value have a number of elements?
pub trait SizedCollection {
    fn collection_len(&self) -> Option<usize>;
}

impl SizedCollection for Value {
    fn collection_len(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.len()),
            Value::Object(o) => Some(o.len()),
            _ => None,
        }
    }
}

/// First alias present with a non-null value.
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
}

/// Collections count their elements; anything else is coerced.
pub fn count_of(v: &Value) -> i64 {
    match v.collection_len() {
        Some(n) => i64::try_from(n).unwrap_or(i64::MAX),
        None => value_to_int(v),
    }
}

fn count_field(obj: &Map<String, Value>, keys: &[&str]) -> i64 {
    lookup(obj, keys).map(count_of).unwrap_or(0)
}

fn name_of(obj: &Map<String, Value>) -> Option<String> {
    let text = |v: &Value| match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    ["name", "id"]
        .iter()
        .filter_map(|k| obj.get(*k).and_then(text))
        .find(|s| !s.is_empty())
}

pub fn extract_entity(obj: &Map<String, Value>) -> RawRecord {
    let int = |k: &str| obj.get(k).map(value_to_int).unwrap_or(0);

    RawRecord {
        name: name_of(obj),
        power: int("power"),
        trophies: int("trophies"),
        gadgets: count_field(obj, GADGET_KEYS),
        star_powers: count_field(obj, STAR_POWER_KEYS),
        gears: count_field(obj, GEAR_KEYS),
        reported_points: None,
        reported_coins: None,
    }
}

fn entity_list(payload: &Value) -> Option<&Vec<Value>> {
    match payload {
        Value::Array(a) => Some(a),
        Value::Object(o) => ENTITY_LIST_KEYS
            .iter()
            .find_map(|k| o.get(*k).and_then(Value::as_array)),
        _ => None,
    }
}

/// Every brawler object in the payload; non-object entries are skipped.
pub fn parse_payload(payload: &Value) -> Vec<RawRecord> {
    let Some(list) = entity_list(payload) else {
        logw!("Api: payload holds no brawler list");
        return Vec::new();
    };
    let out: Vec<RawRecord> = list
        .iter()
        .filter_map(Value::as_object)
        .map(extract_entity)
        .collect();
    if out.len() != list.len() {
        logd!("Api: skipped {} non-object entries", list.len() - out.len());
    }
    out
}
