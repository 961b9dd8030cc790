//! Normalized request content sent to the generation provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single unit of request content.
#[derive(Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text { value: String },
    /// File already living in the provider's file store.
    RemoteRef { uri: String, media_type: String },
    /// Raw bytes embedded in the request (base64 on the wire).
    Inline { data: Vec<u8>, media_type: String },
}

impl ContentPart {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text { value: value.into() }
    }

    pub fn media_type(&self) -> Option<&str> {
        match self {
            Self::Text { .. } => None,
            Self::RemoteRef { media_type, .. } | Self::Inline { media_type, .. } => Some(media_type),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value } => Some(value),
            Self::RemoteRef { .. } | Self::Inline { .. } => None,
        }
    }
}

// Inline payloads can be megabytes; log their size instead of their bytes.
impl fmt::Debug for ContentPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { value } => f.debug_struct("Text").field("value", value).finish(),
            Self::RemoteRef { uri, media_type } => f
                .debug_struct("RemoteRef")
                .field("uri", uri)
                .field("media_type", media_type)
                .finish(),
            Self::Inline { data, media_type } => f
                .debug_struct("Inline")
                .field("len", &data.len())
                .field("media_type", media_type)
                .finish(),
        }
    }
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant", alias = "bot")]
    Model,
}

impl Role {
    /// Parses the role names browser clients send.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Self::User),
            "model" | "assistant" | "bot" => Some(Self::Model),
            _ => None,
        }
    }
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<ContentPart>,
}

impl Turn {
    pub fn user(parts: Vec<ContentPart>) -> Self {
        Self { role: Role::User, parts }
    }
}
