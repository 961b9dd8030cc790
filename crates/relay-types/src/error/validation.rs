//! Request validation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems with what the caller sent. All map to 4xx responses.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ValidationError {
    /// Empty body or JSON `null`
    #[error("No payload was sent")]
    MissingPayload,

    /// Body could not be parsed as JSON
    #[error("Payload is not valid JSON: {message}")]
    MalformedJson { message: String },

    /// JSON body is not an object
    #[error("Payload type is invalid")]
    InvalidPayloadType,

    /// `message` absent, empty, or not a string
    #[error("Message is missing or has an invalid format")]
    InvalidMessage,

    /// Multipart request without the file field
    #[error("No file was uploaded in field '{field}'")]
    MissingAttachment { field: String },

    /// Image requests must carry a prompt
    #[error("Prompt is required")]
    MissingPrompt,

    #[error("Invalid conversation: {message}")]
    InvalidConversation { message: String },

    #[error("Unsupported media type for '{file_name}'")]
    UnsupportedMediaType { file_name: String },

    #[error("Attachment too large ({size} bytes, limit is {limit} bytes)")]
    InlineTooLarge { size: u64, limit: u64 },

    #[error("Malformed multipart body: {message}")]
    Multipart { message: String },
}

impl ValidationError {
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InlineTooLarge { .. } => 413,
            _ => 400,
        }
    }
}
