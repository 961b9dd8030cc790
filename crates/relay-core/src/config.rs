//! Runtime configuration, assembled once at startup and shared read-only.

use relay_types::ModelSelection;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MAX_INLINE_BYTES: u64 = 20 * 1024 * 1024;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 100 * 1024 * 1024;

/// Credentials and endpoint for the Gemini API.
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Option<Duration>,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), base_url: DEFAULT_BASE_URL.to_string(), request_timeout: None }
    }

    /// Override the API base URL. Trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, url::ParseError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        url::Url::parse(trimmed)?;
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Everything the HTTP layer needs besides the provider itself.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub models: ModelSelection,
    pub staging_dir: PathBuf,
    /// Largest document/audio file embedded inline.
    pub max_inline_bytes: u64,
    pub body_limit_bytes: usize,
    /// Optional directory served as the fallback (browser chat client).
    pub static_dir: Option<PathBuf>,
}

impl GatewayConfig {
    pub fn default_staging_dir() -> PathBuf {
        std::env::temp_dir().join("gemini-relay-uploads")
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            models: ModelSelection::default(),
            staging_dir: Self::default_staging_dir(),
            max_inline_bytes: DEFAULT_MAX_INLINE_BYTES,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            static_dir: None,
        }
    }
}
