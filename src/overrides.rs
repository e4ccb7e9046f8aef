// src/overrides.rs
//
// User-maintained extra attributes per brawler (e.g. `"Hypercharge": "Yes"`),
// merged shallowly onto the output rows. Override values win on key clashes.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::consts::{DEFAULT_OVERRIDE_KEY, DEFAULT_OVERRIDE_VALUE};
use crate::model::{is_total_name, Record, Row};

/// Attribute name → text value, in the order the user wrote them.
pub type Attributes = Map<String, Value>;

/// Brawler name → attributes.
pub type OverrideMap = BTreeMap<String, Attributes>;

fn default_attributes() -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert(s!(DEFAULT_OVERRIDE_KEY), Value::from(DEFAULT_OVERRIDE_VALUE));
    attrs
}

fn defaults_for<'a>(names: impl Iterator<Item = &'a str>) -> OverrideMap {
    names
        .filter(|n| !n.is_empty() && !is_total_name(n))
        .map(|n| (s!(n), default_attributes()))
        .collect()
}

/// One default attribute set per non-aggregate record.
pub fn synthesize(records: &[Record]) -> OverrideMap {
    defaults_for(records.iter().map(|r| r.name.as_str()))
}

/// Same as `synthesize`, from an already written output file.
pub fn from_rows(rows: &[Row]) -> OverrideMap {
    defaults_for(rows.iter().filter_map(Row::name))
}

/// Use the loaded map when there is one, otherwise synthesize defaults.
/// The flag tells the caller whether the map was synthesized.
pub fn resolve(loaded: Option<OverrideMap>, records: &[Record]) -> (OverrideMap, bool) {
    match loaded {
        Some(map) => (map, false),
        None => {
            let map = synthesize(records);
            logf!("Overrides: none on disk, synthesized {} default entries", map.len());
            (map, true)
        }
    }
}

/// Lenient reading of an override document. Strings are kept, numbers and
/// booleans are stringified, anything else is dropped.
pub fn from_json(doc: &Value) -> Option<OverrideMap> {
    let top = doc.as_object()?;
    let mut out = OverrideMap::new();

    for (name, attrs) in top {
        let Some(attrs) = attrs.as_object() else {
            logd!("Overrides: entry '{name}' is not an object, skipped");
            continue;
        };
        let mut kept = Attributes::new();
        for (k, v) in attrs {
            let text = match v {
                Value::String(_) => v.clone(),
                Value::Number(n) => Value::from(n.to_string()),
                Value::Bool(b) => Value::from(b.to_string()),
                _ => {
                    logd!("Overrides: '{name}.{k}' has a nested value, skipped");
                    continue;
                }
            };
            kept.insert(k.clone(), text);
        }
        out.insert(name.clone(), kept);
    }
    Some(out)
}

pub fn merge_row(row: &mut Row, map: &OverrideMap) {
    if row.is_total() {
        return;
    }
    let Some(extra) = row.name().and_then(|n| map.get(n)) else { return };
    for (k, v) in extra {
        row.set(k, v.clone());
    }
}

/// Shallow, override-wins merge. Rows without an entry pass through.
pub fn merge(mut rows: Vec<Row>, map: &OverrideMap) -> Vec<Row> {
    for row in rows.iter_mut() {
        merge_row(row, map);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{total_row, COLUMNS, COL_POWER};
    use serde_json::json;

    fn rec(name: &str) -> Record {
        Record {
            name: s!(name), level: 9, trophies: 10,
            gadgets: 0, star_powers: 0, gears: 0,
            points_to_max: 0, coins_to_max: 0,
        }
    }

    #[test]
    fn synthesized_map_skips_total() {
        let map = synthesize(&[rec("A"), rec("B"), rec("Total")]);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(map["A"].get(DEFAULT_OVERRIDE_KEY).and_then(Value::as_str), Some(DEFAULT_OVERRIDE_VALUE));
    }

    #[test]
    fn resolve_prefers_loaded_map() {
        let loaded = OverrideMap::from([(s!("A"), Attributes::new())]);
        let (map, synthesized) = resolve(Some(loaded.clone()), &[rec("A"), rec("B")]);
        assert!(!synthesized);
        assert_eq!(map, loaded);

        let (map, synthesized) = resolve(None, &[rec("A"), rec("B")]);
        assert!(synthesized);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn override_wins_and_other_keys_survive() {
        let attrs = json!({COL_POWER: "MAX", "Note": "main"}).as_object().cloned().unwrap();
        let map = OverrideMap::from([(s!("A"), attrs)]);
        let rows = merge(vec![rec("A").to_row(), rec("B").to_row()], &map);
        assert_eq!(rows[0].cell_text(COL_POWER), "MAX");
        assert_eq!(rows[0].cell_text("Note"), "main");
        assert_eq!(rows[0].trophies(), 10);
        assert_eq!(rows[1], rec("B").to_row());
    }

    #[test]
    fn merge_is_idempotent() {
        let map = synthesize(&[rec("A"), rec("B")]);
        let rows = vec![rec("A").to_row(), rec("B").to_row(), total_row(&[rec("A"), rec("B")])];
        let once = merge(rows, &map);
        let twice = merge(once.clone(), &map);
        assert_eq!(once, twice);
    }

    #[test]
    fn total_row_is_never_looked_up() {
        let map = OverrideMap::from([(s!("TOTAL"), default_attributes())]);
        let rows = merge(vec![total_row(&[rec("A")])], &map);
        assert!(rows[0].get(DEFAULT_OVERRIDE_KEY).is_none());
    }

    #[test]
    fn lenient_json_reading() {
        let doc = json!({
            "A": {"Hypercharge": "No", "Rank": 25, "Fav": true, "Nested": {"x": 1}},
            "B": "not an object"
        });
        let map = from_json(&doc).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["A"]["Rank"], "25");
        assert_eq!(map["A"]["Fav"], "true");
        assert!(!map["A"].contains_key("Nested"));
        assert!(from_json(&json!([1, 2])).is_none());
    }

    #[test]
    fn attribute_order_follows_the_file() {
        let doc: Value = serde_json::from_str(
            r#"{"A": {"Zeta": "1", "Hypercharge": "No", "Alpha": 2}}"#,
        ).unwrap();
        let map = from_json(&doc).unwrap();
        assert_eq!(map["A"].keys().collect::<Vec<_>>(), vec!["Zeta", "Hypercharge", "Alpha"]);

        let rows = merge(vec![rec("A").to_row()], &map);
        let keys: Vec<&str> = rows[0].keys().skip(COLUMNS.len()).collect();
        assert_eq!(keys, vec!["Zeta", "Hypercharge", "Alpha"]);
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"A":{"Zeta":"1","Hypercharge":"No","Alpha":"2"}}"#);
    }

    #[test]
    fn from_rows_matches_generate_utility() {
        let rows = vec![rec("A").to_row(), total_row(&[rec("A")])];
        assert_eq!(from_rows(&rows), synthesize(&[rec("A")]));
    }
}
