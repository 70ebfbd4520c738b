//! Canonical request signatures for in-flight request tracking.
//!
//! T010: Implement request_key with order-independent parameter serialization

use serde_json::Value;

/// Build the canonical signature for a request.
///
/// The key is derived from the HTTP method, the URL, and a canonical
/// serialization of the parameters. Two requests that differ only in
/// parameter property ordering produce the same key; any difference in
/// method, URL, or parameter values produces a different key.
pub fn request_key(method: &str, url: &str, params: Option<&Value>) -> String {
    let params = params.map(canonical_json).unwrap_or_default();
    format!("{}:{}:{}", method.to_ascii_uppercase(), url, params)
}

/// Serialize a JSON value with object keys sorted at every level.
///
/// Array element order is preserved; it is significant.
fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(key, _)| *key);

            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(value, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}
