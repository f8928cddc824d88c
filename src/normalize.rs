// Record extraction from API payloads of unknown shape.
//
// The Tap Sim API has moved its lists between `rows`, `data`, `items` and
// endpoint-specific keys across releases.
// Everything here degrades to an empty list instead of failing.

use serde::Serialize;
use serde_json::Value;

/// Keys probed, in order, for the list of records in an object payload.
pub const CONTAINER_KEYS: &[&str] = &[
    "rows",
    "data",
    "items",
    "results",
    "list",
    "payload",
    "eggs",
    "pets",
    "ads",
    "snipes",
    "enchants",
    "entries",
    "leaderboard",
];

/// One opaque API entity (egg, item, pet, ad, enchant).
///
/// No schema is assumed. Keyed access on a record that is not a JSON object
/// simply yields nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Value stored under `key`, if this record is an object that has it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Extract the ordered record list from an arbitrary decoded JSON document.
///
/// - an array is returned element for element;
/// - an object is probed for [`CONTAINER_KEYS`] holding an array, then for
///   its first array-valued property in document order;
/// - anything else yields an empty list. Nested objects are not searched, so
///   `{"data": {"rows": [...]}}` is empty too.
pub fn extract_records(payload: &Value) -> Vec<Record> {
    find_list(payload)
        .map(|items| items.iter().cloned().map(Record).collect())
        .unwrap_or_default()
}

fn find_list(payload: &Value) -> Option<&Vec<Value>> {
    let obj = match payload {
        Value::Array(items) => return Some(items),
        Value::Object(obj) => obj,
        _ => return None,
    };

    if let Some(items) = CONTAINER_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_array))
    {
        return Some(items);
    }

    obj.values().find_map(Value::as_array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(records: &[Record]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.get("name").and_then(Value::as_str).unwrap_or(""))
            .collect()
    }

    #[test]
    fn test_array_is_returned_unchanged() {
        let payload = json!([{"name": "A"}, 3, "loose", {"name": "B"}]);
        let records = extract_records(&payload);
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].as_value(), &json!(3));
        assert_eq!(records[3].get("name"), Some(&json!("B")));
    }

    #[test]
    fn test_rows_container() {
        let payload = json!({"total": 2, "rows": [{"name": "Egg"}, {"name": "Pet"}]});
        assert_eq!(names(&extract_records(&payload)), vec!["Egg", "Pet"]);
    }

    #[test]
    fn test_container_key_priority() {
        // `rows` beats `items` regardless of document order.
        let payload = json!({"items": [{"name": "late"}], "rows": [{"name": "first"}]});
        assert_eq!(names(&extract_records(&payload)), vec!["first"]);
    }

    #[test]
    fn test_container_key_must_hold_array() {
        let payload = json!({"data": "nope", "snipes": [{"name": "S"}]});
        assert_eq!(names(&extract_records(&payload)), vec!["S"]);
    }

    #[test]
    fn test_first_array_property_fallback() {
        let payload = json!({"meta": {"page": 1}, "weird": [{"name": "W"}], "other": [{"name": "O"}]});
        assert_eq!(names(&extract_records(&payload)), vec!["W"]);
    }

    #[test]
    fn test_wrapped_list_is_not_searched() {
        // lists nested inside objects are not looked at
        let payload = json!({"ok": true, "data": {"page": 1, "rows": [{"name": "Deep"}]}});
        assert!(extract_records(&payload).is_empty());
    }

    #[test]
    fn test_nested_object_without_arrays_is_empty() {
        let payload = json!({"a": {"b": {"c": {"d": 1}}}, "e": "f"});
        assert!(extract_records(&payload).is_empty());
    }

    #[test]
    fn test_primitives_are_empty() {
        for payload in [json!(null), json!(42), json!("rows"), json!(true)] {
            assert!(extract_records(&payload).is_empty());
        }
    }

    #[test]
    fn test_record_get_on_non_object() {
        let record = Record::new(json!([1, 2]));
        assert!(record.get("name").is_none());
    }
}
