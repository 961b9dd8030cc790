use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use relay_core::config::{DEFAULT_BASE_URL, DEFAULT_BODY_LIMIT_BYTES, DEFAULT_MAX_INLINE_BYTES};
use relay_core::{GatewayConfig, ProviderConfig};
use relay_types::ModelSelection;

const MIB: u64 = 1024 * 1024;

#[derive(Parser, Debug)]
#[command(
    name = "gemini-relay",
    about = "Gemini Relay - multi-modal generation gateway",
    version = env!("CARGO_PKG_VERSION"),
    author
)]
pub struct Cli {
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Falls back to GOOGLE_API_KEY when unset.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "GEMINI_TEXT_MODEL", default_value = ModelSelection::DEFAULT_TEXT)]
    pub text_model: String,

    #[arg(long, env = "GEMINI_IMAGE_MODEL", default_value = ModelSelection::DEFAULT_IMAGE)]
    pub image_model: String,

    #[arg(long, env = "GEMINI_DOCUMENT_MODEL", default_value = ModelSelection::DEFAULT_DOCUMENT)]
    pub document_model: String,

    #[arg(long, env = "GEMINI_AUDIO_MODEL", default_value = ModelSelection::DEFAULT_AUDIO)]
    pub audio_model: String,

    /// Where uploads are staged while a request is in flight.
    #[arg(long, env = "RELAY_STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    #[arg(long, env = "RELAY_MAX_INLINE_MB", default_value_t = DEFAULT_MAX_INLINE_BYTES / MIB)]
    pub max_inline_mb: u64,

    #[arg(long, env = "RELAY_BODY_LIMIT_MB", default_value_t = DEFAULT_BODY_LIMIT_BYTES as u64 / MIB)]
    pub body_limit_mb: u64,

    /// Timeout for each provider call. Unset means no timeout.
    #[arg(long, env = "RELAY_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Serve a browser client from this directory as the router fallback.
    #[arg(long, env = "RELAY_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Resolve the API key, falling back to `GOOGLE_API_KEY`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    pub fn provider_config(&self, api_key: String) -> anyhow::Result<ProviderConfig> {
        let config = ProviderConfig::new(api_key)
            .with_base_url(&self.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid base URL '{}': {}", self.base_url, e))?
            .with_request_timeout(self.request_timeout_secs.map(Duration::from_secs));
        Ok(config)
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            models: ModelSelection {
                text: self.text_model.clone(),
                image: self.image_model.clone(),
                document: self.document_model.clone(),
                audio: self.audio_model.clone(),
            },
            staging_dir: self.staging_dir.clone().unwrap_or_else(GatewayConfig::default_staging_dir),
            max_inline_bytes: self.max_inline_mb.saturating_mul(MIB),
            body_limit_bytes: usize::try_from(self.body_limit_mb.saturating_mul(MIB))
                .unwrap_or(usize::MAX),
            static_dir: self.static_dir.clone(),
        }
    }
}
