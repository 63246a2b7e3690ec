//! Minimal chat-component rendering.
//!
//! Backend display names arrive as JSON components; the client wants a
//! plain string. Translation keys are passed through verbatim — resolving
//! them against locale tables is the bootstrap's concern.

use serde_json::Value;

/// Render a JSON chat component to plain text for the given locale.
pub fn render_message(json: &str, _locale: &str) -> String {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::String(text)) => text,
        Ok(value) => {
            let mut out = String::new();
            walk(&value, &mut out);
            out
        }
        // Not a component at all; show it as-is rather than losing it.
        Err(_) => json.to_string(),
    }
}

fn walk(value: &Value, out: &mut String) {
    if let Some(text) = value.get("text").and_then(Value::as_str) {
        out.push_str(text);
    } else if let Some(key) = value.get("translate").and_then(Value::as_str) {
        out.push_str(key);
    }
    if let Some(extra) = value.get("extra").and_then(Value::as_array) {
        for child in extra {
            match child {
                Value::String(s) => out.push_str(s),
                other => walk(other, out),
            }
        }
    }
}
