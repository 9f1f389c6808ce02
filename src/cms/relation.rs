use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A Directus primary key. Collections use either integer or string keys,
/// and relation fields carry whichever form the collection defines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    pub fn as_string(&self) -> String {
        match self {
            Key::Int(n) => n.to_string(),
            Key::Str(s) => s.clone(),
        }
    }

    /// Deterministic index for rotating placeholder assets by record id.
    pub fn as_index(&self) -> usize {
        match self {
            Key::Int(n) => n.unsigned_abs() as usize,
            Key::Str(s) => s.bytes().map(usize::from).sum(),
        }
    }
}

impl Default for Key {
    fn default() -> Self {
        Key::Str(String::new())
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{}", n),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

/// A relation field that may arrive either expanded (when the field list asks
/// for nested attributes) or as the bare foreign key.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Relation<T> {
    Resolved(T),
    Unresolved(Key),
}

impl<T> Relation<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Relation::Resolved(value) => Some(value),
            Relation::Unresolved(_) => None,
        }
    }

    pub fn into_resolved(self) -> Option<T> {
        match self {
            Relation::Resolved(value) => Some(value),
            Relation::Unresolved(_) => None,
        }
    }
}

/// Extract the keys of a many-to-many relation value. Elements may be bare
/// keys or expanded objects carrying an `id` attribute; anything else is
/// skipped.
pub fn relation_keys(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Object(obj) => obj.get("id").and_then(|id| match id {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            _ => None,
        })
        .collect()
}

/// Parse a repeatable field. Directus delivers these either as a JSON array
/// or, for legacy rows, as a JSON-encoded string. A parse failure of either
/// form degrades to an empty collection.
pub fn parse_repeatable<T: DeserializeOwned>(value: Option<&Value>) -> Vec<T> {
    let parsed: Option<Vec<T>> = match value {
        Some(array @ Value::Array(_)) => serde_json::from_value(array.clone()).ok(),
        Some(Value::String(raw)) => serde_json::from_str(raw).ok(),
        _ => None,
    };
    parsed.unwrap_or_default()
}

/// Order repeatable rows ascending by their numeric `sort` attribute.
/// Missing values count as 0; the sort is stable, so rows sharing a value
/// keep their input order.
pub fn sort_rows<T, F>(mut rows: Vec<T>, sort_key: F) -> Vec<T>
where
    F: Fn(&T) -> Option<i64>,
{
    rows.sort_by_key(|row| sort_key(row).unwrap_or(0));
    rows
}
