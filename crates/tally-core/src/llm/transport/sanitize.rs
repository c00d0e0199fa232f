//! Redaction of remote error bodies before they reach errors or logs

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const MAX_ERROR_BODY_CHARS: usize = 1_024;
const REDACTED: &str = "[REDACTED]";

static BEARER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bBearer\s+[A-Za-z0-9._\-+/=]{8,}").expect("valid bearer regex")
});

static ANTHROPIC_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bsk-ant-[A-Za-z0-9_\-]{8,}").expect("valid key regex"));

static KEY_VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(x-api-key|api[_-]?key|access[_-]?token|token|secret|password|authorization)\b\s*[:=]\s*["']?[^"',\s}]+"#,
    )
    .expect("valid key/value regex")
});

/// Redact secrets from an error body and cap its length.
///
/// JSON bodies keep their shape with sensitive members replaced; anything
/// else is scrubbed as plain text.
pub fn sanitize_error_body(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty error response body>".to_string();
    }

    if let Ok(mut json) = serde_json::from_str::<Value>(trimmed) {
        redact_json(&mut json);
        let rendered =
            serde_json::to_string(&json).unwrap_or_else(|_| "<unserializable error>".to_string());
        return truncate(rendered);
    }

    truncate(redact_inline(trimmed))
}

/// Pull the human-readable message out of an `{"error":{"message":..}}` body
pub fn error_message(raw: &str) -> Option<String> {
    let json: Value = serde_json::from_str(raw.trim()).ok()?;
    json.get("error")?
        .get("message")?
        .as_str()
        .map(|message| truncate(redact_inline(message)))
}

fn redact_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if is_sensitive_key(key) {
                    *val = Value::String(REDACTED.to_string());
                } else {
                    redact_json(val);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json),
        Value::String(s) => *s = redact_inline(s),
        _ => {}
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.to_ascii_lowercase().replace(['-', ' '], "_");
    ["api_key", "token", "secret", "password", "authorization", "cookie"]
        .iter()
        .any(|needle| normalized.contains(needle))
}

fn redact_inline(input: &str) -> String {
    let step = BEARER_RE.replace_all(input, "Bearer [REDACTED]");
    let step = ANTHROPIC_KEY_RE.replace_all(&step, REDACTED);
    KEY_VALUE_RE.replace_all(&step, "$1=[REDACTED]").into_owned()
}

fn truncate(input: String) -> String {
    let char_count = input.chars().count();
    if char_count <= MAX_ERROR_BODY_CHARS {
        return input;
    }

    let kept: String = input.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!(
        "{}... [truncated {} chars]",
        kept,
        char_count - MAX_ERROR_BODY_CHARS
    )
}
