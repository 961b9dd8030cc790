//! Input modalities and the model identifier assigned to each one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of user input. Determines validation, encoding, and model choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
    Document,
    Audio,
}

/// How an uploaded attachment is turned into a content part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentPolicy {
    /// Upload to the provider file store and reference the returned URI.
    RemoteReference,
    /// Read the whole file and embed it as base64.
    Inline,
}

impl Modality {
    pub const ALL: [Modality; 4] = [Self::Text, Self::Image, Self::Document, Self::Audio];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Document => "document",
            Self::Audio => "audio",
        }
    }

    /// Prompt used when the caller does not send one.
    ///
    /// Image requests have no default: the caller must describe what to do
    /// with the picture.
    pub fn default_prompt(self) -> Option<&'static str> {
        match self {
            Self::Document => Some("describe the following document"),
            Self::Audio => Some("describe the following audio"),
            Self::Text | Self::Image => None,
        }
    }

    /// Multipart field carrying the file, `None` for text.
    pub fn upload_field(self) -> Option<&'static str> {
        match self {
            Self::Text => None,
            Self::Image => Some("image"),
            Self::Document => Some("document"),
            Self::Audio => Some("audio"),
        }
    }

    pub fn attachment_policy(self) -> Option<AttachmentPolicy> {
        match self {
            Self::Text => None,
            Self::Image => Some(AttachmentPolicy::RemoteReference),
            Self::Document | Self::Audio => Some(AttachmentPolicy::Inline),
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model identifier per modality, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub text: String,
    pub image: String,
    pub document: String,
    pub audio: String,
}

impl ModelSelection {
    pub const DEFAULT_TEXT: &'static str = "gemini-2.5-flash-lite";
    pub const DEFAULT_IMAGE: &'static str = "gemini-2.5-flash";
    pub const DEFAULT_DOCUMENT: &'static str = "gemini-2.5-flash-lite";
    pub const DEFAULT_AUDIO: &'static str = "gemini-2.5-flash";

    pub fn for_modality(&self, modality: Modality) -> &str {
        match modality {
            Modality::Text => &self.text,
            Modality::Image => &self.image,
            Modality::Document => &self.document,
            Modality::Audio => &self.audio,
        }
    }
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            text: Self::DEFAULT_TEXT.to_string(),
            image: Self::DEFAULT_IMAGE.to_string(),
            document: Self::DEFAULT_DOCUMENT.to_string(),
            audio: Self::DEFAULT_AUDIO.to_string(),
        }
    }
}
