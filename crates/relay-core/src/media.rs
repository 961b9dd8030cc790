//! Media type resolution for uploaded attachments.
//!
//! Order: the content type declared on the multipart field, then magic bytes,
//! then the file extension. Generic declarations such as
//! `application/octet-stream` are ignored.

use relay_types::Modality;
use std::path::Path;

const GENERIC_TYPES: &[&str] = &["application/octet-stream", "binary/octet-stream"];

/// Resolve the media type of an upload, `None` when nothing matches.
pub fn resolve_media_type(
    modality: Modality,
    declared: Option<&str>,
    file_name: Option<&str>,
    head: &[u8],
) -> Option<String> {
    if let Some(declared) = declared.map(normalize_declared).filter(|d| is_specific(d)) {
        return Some(declared);
    }
    if let Some(sniffed) = detect_from_bytes(modality, head) {
        return Some(sniffed.to_string());
    }
    file_name.and_then(|name| detect_from_extension(modality, name)).map(str::to_string)
}

fn normalize_declared(raw: &str) -> String {
    raw.split(';').next().unwrap_or(raw).trim().to_ascii_lowercase()
}

fn is_specific(media_type: &str) -> bool {
    !media_type.is_empty() && media_type.contains('/') && !GENERIC_TYPES.contains(&media_type)
}

/// Detect MIME type from file magic bytes (signature)
pub fn detect_from_bytes(modality: Modality, data: &[u8]) -> Option<&'static str> {
    match modality {
        Modality::Image => detect_image(data),
        Modality::Audio => detect_audio(data),
        Modality::Document => detect_document(data),
        Modality::Text => None,
    }
}

fn detect_image(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("image/png");
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    None
}

fn detect_audio(data: &[u8]) -> Option<&'static str> {
    if data.len() < 12 {
        return None;
    }

    // MP3: starts with ID3 tag or frame sync
    if data.starts_with(b"ID3") || (data[0] == 0xFF && (data[1] & 0xE0) == 0xE0) {
        return Some("audio/mp3");
    }
    if data.starts_with(b"RIFF") && &data[8..12] == b"WAVE" {
        return Some("audio/wav");
    }
    if data.starts_with(b"fLaC") {
        return Some("audio/flac");
    }
    if data.starts_with(b"OggS") {
        return Some("audio/ogg");
    }
    if data.starts_with(b"FORM") && &data[8..12] == b"AIFF" {
        return Some("audio/aiff");
    }
    // M4A/AAC: ftyp (ISO Base Media)
    if &data[4..8] == b"ftyp" {
        return Some("audio/aac");
    }
    None
}

fn detect_document(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    None
}

/// Detect MIME type from filename extension (fallback)
pub fn detect_from_extension(modality: Modality, file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();

    match (modality, ext.as_str()) {
        (Modality::Image, "png") => Some("image/png"),
        (Modality::Image, "jpg" | "jpeg") => Some("image/jpeg"),
        (Modality::Image, "gif") => Some("image/gif"),
        (Modality::Image, "webp") => Some("image/webp"),
        (Modality::Image, "heic") => Some("image/heic"),
        (Modality::Audio, "mp3") => Some("audio/mp3"),
        (Modality::Audio, "wav") => Some("audio/wav"),
        (Modality::Audio, "m4a" | "aac") => Some("audio/aac"),
        (Modality::Audio, "ogg") => Some("audio/ogg"),
        (Modality::Audio, "flac") => Some("audio/flac"),
        (Modality::Audio, "aiff" | "aif") => Some("audio/aiff"),
        (Modality::Document, "pdf") => Some("application/pdf"),
        (Modality::Document, "txt") => Some("text/plain"),
        (Modality::Document, "md") => Some("text/markdown"),
        (Modality::Document, "html" | "htm") => Some("text/html"),
        (Modality::Document, "csv") => Some("text/csv"),
        (Modality::Document, "json") => Some("application/json"),
        (Modality::Document, "xml") => Some("text/xml"),
        _ => None,
    }
}
