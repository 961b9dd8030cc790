//! Upstream error sanitization.
//!
//! Gemini error bodies can echo request fragments and key metadata. The raw
//! body is logged server-side; clients only get a category and the status.

/// Sanitize an upstream error for client consumption.
pub fn sanitize_upstream_error(status_code: u16, raw_text: &str) -> String {
    let category = classify_error(status_code, raw_text);
    match category {
        ErrorCategory::RateLimited => format!("Rate limited (HTTP {})", status_code),
        ErrorCategory::QuotaExhausted => format!("Quota exhausted (HTTP {})", status_code),
        ErrorCategory::Unauthorized => format!("Authentication failed (HTTP {})", status_code),
        ErrorCategory::ModelNotFound => format!("Model not available (HTTP {})", status_code),
        ErrorCategory::InvalidArgument => format!("Request rejected by provider (HTTP {})", status_code),
        ErrorCategory::TooLarge => format!("Payload too large for provider (HTTP {})", status_code),
        ErrorCategory::ServerError => format!("Upstream server error (HTTP {})", status_code),
        ErrorCategory::Unknown => format!("Upstream error (HTTP {})", status_code),
    }
}

enum ErrorCategory {
    RateLimited,
    QuotaExhausted,
    Unauthorized,
    ModelNotFound,
    InvalidArgument,
    TooLarge,
    ServerError,
    Unknown,
}

fn classify_error(status_code: u16, raw_text: &str) -> ErrorCategory {
    match status_code {
        429 => {
            if raw_text.contains("quota") || raw_text.contains("QUOTA") {
                ErrorCategory::QuotaExhausted
            } else {
                ErrorCategory::RateLimited
            }
        },
        401 | 403 => ErrorCategory::Unauthorized,
        // Gemini reports a bad key as 400 INVALID_ARGUMENT
        400 if raw_text.contains("API_KEY_INVALID") => ErrorCategory::Unauthorized,
        400 => ErrorCategory::InvalidArgument,
        404 => ErrorCategory::ModelNotFound,
        413 => ErrorCategory::TooLarge,
        500..=599 => ErrorCategory::ServerError,
        _ => ErrorCategory::Unknown,
    }
}
