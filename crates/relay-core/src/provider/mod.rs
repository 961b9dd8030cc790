//! Generation provider abstraction.
//!
//! Handlers only ever see [`GenerativeProvider`]; the production value is a
//! [`GeminiClient`], tests plug in a recording stub.

mod gemini;
mod sanitize;

pub use gemini::GeminiClient;
pub use sanitize::sanitize_upstream_error;

use async_trait::async_trait;
use relay_types::{ProviderError, Turn};

/// A file accepted by the provider's file store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Provider resource name, e.g. `files/abc123`.
    pub name: String,
    /// URI to reference from generation requests.
    pub uri: String,
    pub media_type: String,
}

#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Run the model on `turns` and return its text output.
    async fn generate(&self, model: &str, turns: &[Turn]) -> Result<String, ProviderError>;

    /// Upload bytes to the provider's file store.
    async fn upload_file(
        &self,
        data: Vec<u8>,
        media_type: &str,
        display_name: &str,
    ) -> Result<RemoteFile, ProviderError>;
}
