//! Raw monitoring payloads and lenient value coercion.
//!
//! The backend's JSON is not a stable schema: fields come and go between
//! releases, numbers sometimes arrive as strings, and lists are sometimes
//! objects. The helpers here read a value if it is usable and return `None`
//! otherwise; the normalizer supplies the defaults.

use serde_json::{Map, Value};

/// An undecoded monitoring response. Always a JSON object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPayload(Map<String, Value>);

impl RawPayload {
    /// Wrap a JSON value. Returns `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// The top-level object.
    pub fn root(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a nested key by path, e.g. `["system", "hostname"]`.
    pub fn at(&self, path: &[&str]) -> Option<&Value> {
        lookup(&self.0, path)
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Walk nested objects. An empty path yields `None`.
pub fn lookup<'a>(root: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = root.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// Look up `key` on a value that may not be an object.
pub fn field<'a>(value: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    value?.as_object()?.get(key)
}

/// The first candidate that is present and not `null`.
pub fn first_present<'a, I>(candidates: I) -> Option<&'a Value>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    candidates.into_iter().flatten().find(|v| !v.is_null())
}

/// A finite, non-negative number from a JSON number or numeric string.
pub fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n)
}

/// [`number`], defaulting to zero.
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    number(value).unwrap_or(0.0)
}

/// A non-empty string. Numbers are accepted and formatted (some backends
/// send versions like `12.4` as floats).
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// [`text`], defaulting to [`UNKNOWN`](rigwatch_types::UNKNOWN).
pub fn text_or_unknown(value: Option<&Value>) -> String {
    text(value).unwrap_or_else(|| rigwatch_types::UNKNOWN.to_string())
}

/// A boolean, accepting `true`/`false` and their common string spellings.
pub fn flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Names from a file listing.
///
/// Accepts an array of strings, an array of objects carrying `name` or
/// `filename`, or an object keyed by name. Anything else is an empty list.
pub fn name_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(obj) => text(first_present([obj.get("name"), obj.get("filename")])),
                other => text(Some(other)),
            })
            .collect(),
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// The elements of an array, or a lone object treated as a one-element list.
pub fn records(value: Option<&Value>) -> Vec<&Map<String, Value>> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        Some(Value::Object(obj)) => vec![obj],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested() {
        let payload = RawPayload::from_value(json!({"system": {"hostname": "rig"}})).unwrap();
        assert_eq!(payload.at(&["system", "hostname"]), Some(&json!("rig")));
        assert_eq!(payload.at(&["system", "missing"]), None);
        assert_eq!(payload.at(&["system", "hostname", "deeper"]), None);
        assert_eq!(payload.at(&[]), None);
    }

    #[test]
    fn test_from_value_requires_object() {
        assert!(RawPayload::from_value(json!([1, 2])).is_none());
        assert!(RawPayload::from_value(json!("text")).is_none());
        assert!(RawPayload::from_value(json!({})).is_some());
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(number(Some(&json!(42))), Some(42.0));
        assert_eq!(number(Some(&json!("64.5"))), Some(64.5));
        assert_eq!(number(Some(&json!(" 8 "))), Some(8.0));
        assert_eq!(number(Some(&json!("n/a"))), None);
        assert_eq!(number(Some(&json!("NaN"))), None);
        assert_eq!(number(Some(&json!("inf"))), None);
        assert_eq!(number(Some(&json!(-3))), None);
        assert_eq!(number(Some(&json!(true))), None);
        assert_eq!(number(None), None);
        assert_eq!(number_or_zero(Some(&json!("garbage"))), 0.0);
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(text(Some(&json!("  Ubuntu "))), Some("Ubuntu".to_string()));
        assert_eq!(text(Some(&json!(""))), None);
        assert_eq!(text(Some(&json!(12.4))), Some("12.4".to_string()));
        assert_eq!(text(Some(&json!(null))), None);
        assert_eq!(text_or_unknown(None), "unknown");
    }

    #[test]
    fn test_first_present_skips_null() {
        let a = json!(null);
        let b = json!("second");
        assert_eq!(first_present([Some(&a), Some(&b)]), Some(&b));
        assert_eq!(first_present([None, None]), None);
    }

    #[test]
    fn test_name_list_shapes() {
        assert_eq!(name_list(Some(&json!(["a.safetensors", "b.ckpt"]))).len(), 2);
        assert_eq!(
            name_list(Some(&json!([{"name": "llama3:8b"}, {"filename": "x.json"}, {"size": 1}]))),
            vec!["llama3:8b".to_string(), "x.json".to_string()]
        );
        let mut keyed = name_list(Some(&json!({"b.pt": {}, "a.pt": {}})));
        keyed.sort();
        assert_eq!(keyed, vec!["a.pt".to_string(), "b.pt".to_string()]);
        assert!(name_list(Some(&json!(null))).is_empty());
        assert!(name_list(Some(&json!(7))).is_empty());
    }

    #[test]
    fn test_records_accepts_lone_object() {
        assert_eq!(records(Some(&json!({"name": "gpu"}))).len(), 1);
        assert_eq!(records(Some(&json!([{"a": 1}, 2, {"b": 2}]))).len(), 2);
        assert!(records(None).is_empty());
    }

    #[test]
    fn test_flag() {
        assert_eq!(flag(Some(&json!(true))), Some(true));
        assert_eq!(flag(Some(&json!("No"))), Some(false));
        assert_eq!(flag(Some(&json!("maybe"))), None);
    }
}
