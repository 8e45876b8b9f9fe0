//! API error body
//!
//! The backend reports failures in a few shapes:
//! ```json
//! { "detail": "Authentication credentials were not provided." }
//! { "error": "Only 3 items available." }
//! { "quantity": ["Ensure this value is greater than or equal to 1."] }
//! ```
//! `ApiErrorBody` keeps the raw payload and extracts a human-readable message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error payload returned with a non-success status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiErrorBody(pub Value);

impl ApiErrorBody {
    /// Parse a response body. Non-JSON bodies are kept as a JSON string.
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_else(|_| Self(Value::String(text.to_string())))
    }

    /// Best-effort human-readable message
    pub fn message(&self) -> Option<String> {
        match &self.0 {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(map) => {
                for key in ["detail", "error", "message"] {
                    if let Some(Value::String(s)) = map.get(key) {
                        return Some(s.clone());
                    }
                }
                if let Some(msg) = map.get("non_field_errors").and_then(first_string) {
                    return Some(msg);
                }
                // Field validation errors: report the first one
                map.iter()
                    .find_map(|(field, v)| first_string(v).map(|msg| format!("{field}: {msg}")))
            }
            Value::Array(_) => first_string(&self.0),
            _ => None,
        }
    }
}

fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_string),
        _ => None,
    }
}
