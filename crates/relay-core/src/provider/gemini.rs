use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use relay_types::protocol::gemini::{
    GenerateContentRequest, GenerateContentResponse, UploadFileResponse,
};
use relay_types::{ProviderError, Turn};
use tracing::{debug, warn};

use super::{sanitize_upstream_error, GenerativeProvider, RemoteFile};
use crate::config::ProviderConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini Developer API client (`generateContent` + Files API).
pub struct GeminiClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Accepts a pre-built `reqwest::Client` so timeouts and TLS are set up
    /// once by the caller.
    pub fn new(http_client: Client, config: &ProviderConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Build the shared HTTP client honoring the configured timeout.
    pub fn build_http_client(config: &ProviderConfig) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/v1beta/files", self.base_url)
    }

    /// Turn non-2xx responses into a sanitized `ProviderError::Upstream`.
    async fn check_status(response: Response, operation: &str) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let status_code = status.as_u16();
        let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        warn!("Gemini {} error {}: {}", operation, status_code, error_text);
        Err(ProviderError::Upstream {
            status: status_code,
            message: sanitize_upstream_error(status_code, &error_text),
        })
    }
}

fn network_error(e: reqwest::Error) -> ProviderError {
    ProviderError::Network { message: e.without_url().to_string() }
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    async fn generate(&self, model: &str, turns: &[Turn]) -> Result<String, ProviderError> {
        let body = GenerateContentRequest::from_turns(turns);

        let response = self
            .http_client
            .post(self.generate_url(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;
        let response = Self::check_status(response, "generateContent").await?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode { message: e.without_url().to_string() })?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini usage: model={}, prompt_tokens={}, output_tokens={}, total={}",
                model,
                usage.prompt_token_count,
                usage.candidates_token_count,
                usage.total_token_count
            );
        }

        parsed.text().ok_or_else(|| ProviderError::EmptyResponse { reason: parsed.empty_reason() })
    }

    async fn upload_file(
        &self,
        data: Vec<u8>,
        media_type: &str,
        display_name: &str,
    ) -> Result<RemoteFile, ProviderError> {
        let size = data.len();
        let part = multipart::Part::bytes(data)
            .file_name(display_name.to_string())
            .mime_str(media_type)
            .map_err(|e| ProviderError::Network { message: format!("Invalid MIME type: {}", e) })?;
        let form = multipart::Form::new()
            .text("display_name", display_name.to_string())
            .part("file", part);

        let response = self
            .http_client
            .post(self.upload_url())
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;
        let response = Self::check_status(response, "file upload").await?;

        let parsed: UploadFileResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode { message: e.without_url().to_string() })?;
        let file = parsed.file;
        let uri = file.uri.ok_or_else(|| ProviderError::Decode {
            message: format!("upload of {} returned no uri", file.name),
        })?;

        debug!("Uploaded {} ({} bytes) as {}", display_name, size, file.name);

        Ok(RemoteFile {
            name: file.name,
            uri,
            media_type: file.mime_type.unwrap_or_else(|| media_type.to_string()),
        })
    }
}
