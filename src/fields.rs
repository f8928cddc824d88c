// Semantic field resolution over schema-less records.
//
// Callers ask for *what* they want (a token value, an egg cost) and the
// candidate-key table below decides *where* it lives. When upstream renames
// or nests a field, the fix is an edit to `Field::candidate_keys`.

use serde_json::Value;

use crate::normalize::Record;

/// Display name used when a record carries no usable name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A semantic field that can be resolved from a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    /// Trade value in tokens.
    TokenValue,
    /// Price in clicks (eggs, plaza listings).
    Cost,
    /// How many copies exist.
    Exist,
    /// Snipe discount relative to value.
    Percent,
    Offering,
    Wanting,
}

impl Field {
    /// Keys probed, in order, to resolve this field.
    pub fn candidate_keys(&self) -> &'static [&'static str] {
        match self {
            Field::Name => &["name", "title", "petName", "eggName", "displayName", "itemName"],
            Field::TokenValue => &["tokenValue", "tokens", "value", "token_value", "worth"],
            Field::Cost => &["cost", "price", "eggCost", "clickCost", "clicks"],
            Field::Exist => &["exist", "exists", "existCount", "count", "circulation"],
            Field::Percent => &["percent", "percentage", "pct", "discount"],
            Field::Offering => &["offering", "offer", "giving", "have"],
            Field::Wanting => &["wanting", "want", "looking", "lookingFor"],
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::TokenValue => write!(f, "tokenValue"),
            Field::Cost => write!(f, "cost"),
            Field::Exist => write!(f, "exist"),
            Field::Percent => write!(f, "percent"),
            Field::Offering => write!(f, "offering"),
            Field::Wanting => write!(f, "wanting"),
        }
    }
}

/// The record's display name, or [`UNKNOWN_NAME`].
pub fn resolve_name(record: &Record) -> String {
    Field::Name
        .candidate_keys()
        .iter()
        .filter_map(|key| record.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}

/// Resolve a numeric field.
///
/// For each candidate key in order: a number or numeric-looking string is
/// returned directly; an object or array is searched depth-first for its
/// first numeric leaf. Keys that are missing or yield nothing are skipped.
pub fn resolve_number(record: &Record, field: Field) -> Option<f64> {
    field
        .candidate_keys()
        .iter()
        .filter_map(|key| record.get(key))
        .find_map(first_numeric_leaf)
}

/// Resolve a free-text field (ad offering/wanting).
///
/// Strings are returned trimmed, numbers as text, and arrays of scalars are
/// joined with `", "`.
pub fn resolve_string(record: &Record, field: Field) -> Option<String> {
    field
        .candidate_keys()
        .iter()
        .filter_map(|key| record.get(key))
        .find_map(text_of)
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(_) => name_if_any(item),
                    other => text_of(other),
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(_) => name_if_any(value),
        _ => None,
    }
}

fn name_if_any(value: &Value) -> Option<String> {
    let name = resolve_name(&Record::new(value.clone()));
    (name != UNKNOWN_NAME).then_some(name)
}

fn first_numeric_leaf(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_numeric(s),
        Value::Array(items) => items.iter().find_map(first_numeric_leaf),
        Value::Object(obj) => obj.values().find_map(first_numeric_leaf),
        Value::Bool(_) | Value::Null => None,
    }
}

/// Parse a numeric-looking string such as `"1,250"` or `" 3.5 "`.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|f| f.is_finite())
}
