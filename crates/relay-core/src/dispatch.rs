//! Request normalization and dispatch.
//!
//! Every modality ends up as one user turn of [`ContentPart`]s sent to the
//! model configured for it. Attachments are converted according to their
//! [`AttachmentPolicy`]: images go through the provider file store and are
//! referenced by URI, documents and audio are embedded inline.

use relay_types::models::AttachmentPolicy;
use relay_types::{ContentPart, Modality, ModelSelection, Turn, ValidationError};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::GatewayResult;
use crate::media::resolve_media_type;
use crate::provider::GenerativeProvider;
use crate::staging::StagedFile;

/// A normalized generation request.
#[derive(Debug)]
pub enum GenerationRequest {
    Text { prompt: String },
    Attachment(AttachmentRequest),
}

impl GenerationRequest {
    pub fn modality(&self) -> Modality {
        match self {
            Self::Text { .. } => Modality::Text,
            Self::Attachment(req) => req.modality,
        }
    }
}

/// Prompt plus staged upload for the image, document, and audio routes.
#[derive(Debug)]
pub struct AttachmentRequest {
    pub modality: Modality,
    pub prompt: Option<String>,
    pub file: StagedFile,
}

/// Turns normalized requests into provider calls.
pub struct Dispatcher {
    provider: Arc<dyn GenerativeProvider>,
    models: Arc<ModelSelection>,
    max_inline_bytes: u64,
}

impl Dispatcher {
    pub fn new(
        provider: Arc<dyn GenerativeProvider>,
        models: Arc<ModelSelection>,
        max_inline_bytes: u64,
    ) -> Self {
        Self { provider, models, max_inline_bytes }
    }

    pub fn models(&self) -> &ModelSelection {
        &self.models
    }

    pub async fn dispatch(&self, request: GenerationRequest) -> GatewayResult<String> {
        match request {
            GenerationRequest::Text { prompt } => {
                self.generate(Modality::Text, vec![Turn::user(vec![ContentPart::text(prompt)])])
                    .await
            },
            GenerationRequest::Attachment(req) => self.dispatch_attachment(req).await,
        }
    }

    /// Multi-turn text conversation, sent to the text model.
    pub async fn dispatch_conversation(&self, turns: Vec<Turn>) -> GatewayResult<String> {
        self.generate(Modality::Text, turns).await
    }

    /// Runs the attachment pipeline, then removes the staged file no matter
    /// how the pipeline ended. A failed removal is logged and does not
    /// replace the pipeline's result.
    async fn dispatch_attachment(&self, request: AttachmentRequest) -> GatewayResult<String> {
        let AttachmentRequest { modality, prompt, mut file } = request;

        let result = self.run_attachment(modality, prompt, &file).await;

        if let Err(e) = file.remove().await {
            warn!(
                "Failed to remove staged {} upload {}: {}",
                modality,
                file.path().display(),
                e
            );
        }
        result
    }

    async fn run_attachment(
        &self,
        modality: Modality,
        prompt: Option<String>,
        file: &StagedFile,
    ) -> GatewayResult<String> {
        // Text requests never carry an attachment.
        let policy = modality.attachment_policy().ok_or(ValidationError::InvalidPayloadType)?;
        let prompt = resolve_prompt(modality, prompt)?;
        let part = self.build_part(modality, policy, file).await?;
        let turns = vec![Turn::user(vec![ContentPart::text(prompt), part])];
        self.generate(modality, turns).await
    }

    /// Convert a staged upload into the content part its modality calls for.
    async fn build_part(
        &self,
        modality: Modality,
        policy: AttachmentPolicy,
        file: &StagedFile,
    ) -> GatewayResult<ContentPart> {
        let media_type =
            resolve_media_type(modality, file.declared_type(), file.original_name(), file.head())
                .ok_or_else(|| ValidationError::UnsupportedMediaType {
                    file_name: file.display_name().to_string(),
                })?;

        match policy {
            AttachmentPolicy::RemoteReference => {
                let data = file.read_all().await?;
                let remote =
                    self.provider.upload_file(data, &media_type, file.display_name()).await?;
                debug!("{} attachment stored remotely as {}", modality, remote.name);
                Ok(ContentPart::RemoteRef { uri: remote.uri, media_type: remote.media_type })
            },
            AttachmentPolicy::Inline => {
                if file.size() > self.max_inline_bytes {
                    return Err(ValidationError::InlineTooLarge {
                        size: file.size(),
                        limit: self.max_inline_bytes,
                    }
                    .into());
                }
                let data = file.read_all().await?;
                debug!("{} attachment inlined: {} bytes, {}", modality, data.len(), media_type);
                Ok(ContentPart::Inline { data, media_type })
            },
        }
    }

    async fn generate(&self, modality: Modality, turns: Vec<Turn>) -> GatewayResult<String> {
        let model = self.models.for_modality(modality);
        info!("Dispatching {} request to {} ({} turn(s))", modality, model, turns.len());

        let text = self.provider.generate(model, &turns).await?;

        info!("{} request completed, returned {} characters", modality, text.len());
        Ok(text)
    }
}

/// Caller prompt, or the modality default when it is missing or blank.
fn resolve_prompt(modality: Modality, prompt: Option<String>) -> Result<String, ValidationError> {
    match prompt.filter(|p| !p.trim().is_empty()) {
        Some(prompt) => Ok(prompt),
        None => modality
            .default_prompt()
            .map(str::to_string)
            .ok_or(ValidationError::MissingPrompt),
    }
}
