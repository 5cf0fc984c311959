//! Config redaction: produce safe-to-share config snapshots by masking secrets.

use serde_json::Value;

/// Keys whose string values are secrets.
static SECRET_KEYS: &[&str] = &[
    "botToken",
    "bot_token",
    "token",
    "apiKey",
    "api_key",
    "secret",
    "password",
];

/// Redact a config JSON value, replacing secret fields with a short hint.
///
/// The resulting value is safe to log or print.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if !is_secret_key(key) || s.is_empty() || s.starts_with("${") {
        return Value::String(s.to_string());
    }
    // Preserve a hint: the first 4 chars, then ***.
    let hint: String = s.chars().take(4).collect();
    if s.chars().count() > 4 {
        Value::String(format!("{hint}***"))
    } else {
        Value::String("***".to_string())
    }
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}
