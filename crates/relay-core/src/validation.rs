//! JSON payload validation for the text and chat routes.
//!
//! Bodies are taken as raw bytes so each failure maps to its own
//! `ValidationError` instead of axum's generic JSON rejection.

use relay_types::{ContentPart, Role, Turn, ValidationError};
use serde_json::{Map, Value};

/// Parse a body into a JSON object.
///
/// Empty body or `null` is `MissingPayload`; anything but an object
/// (arrays included) is `InvalidPayloadType`.
pub fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::MissingPayload);
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ValidationError::MalformedJson { message: e.to_string() })?;
    match value {
        Value::Null => Err(ValidationError::MissingPayload),
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::InvalidPayloadType),
    }
}

/// Extract the `message` of a `/generate-text` body.
pub fn text_message(body: &[u8]) -> Result<String, ValidationError> {
    let mut payload = parse_object(body)?;
    match payload.remove("message") {
        Some(Value::String(message)) if !message.is_empty() => Ok(message),
        _ => Err(ValidationError::InvalidMessage),
    }
}

/// Convert a `/chat` body (`{ conversation: [{ role, message }] }`) into turns.
pub fn conversation(body: &[u8]) -> Result<Vec<Turn>, ValidationError> {
    let mut payload = parse_object(body)?;
    let entries = match payload.remove("conversation") {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        Some(Value::Array(_)) => return Err(invalid("conversation is empty")),
        _ => return Err(invalid("conversation must be an array")),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let Value::Object(mut entry) = entry else {
                return Err(invalid(format!("entry {} is not an object", idx)));
            };
            let role = entry
                .get("role")
                .and_then(Value::as_str)
                .and_then(Role::parse)
                .ok_or_else(|| invalid(format!("entry {} has an unknown role", idx)))?;
            let message = match entry.remove("message") {
                Some(Value::String(message)) if !message.is_empty() => message,
                _ => return Err(invalid(format!("entry {} has no message", idx))),
            };
            Ok(Turn { role, parts: vec![ContentPart::text(message)] })
        })
        .collect()
}

fn invalid(message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidConversation { message: message.into() }
}
