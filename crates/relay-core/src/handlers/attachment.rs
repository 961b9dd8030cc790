// Multipart attachment handlers (image / document / audio)

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use relay_types::{Modality, ValidationError};
use serde_json::json;
use tracing::{info, trace};

use crate::dispatch::{AttachmentRequest, GenerationRequest};
use crate::error::{GatewayError, GatewayResult};
use crate::server::AppState;
use crate::staging::StagedFile;

/// `POST /generate-from-image`: `image` file + required `prompt`.
pub async fn handle_generate_from_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    handle_attachment(state, Modality::Image, multipart).await
}

/// `POST /generate-from-document`: `document` file + optional `prompt`.
pub async fn handle_generate_from_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    handle_attachment(state, Modality::Document, multipart).await
}

/// `POST /generate-from-audio`: `audio` file + optional `prompt`.
pub async fn handle_generate_from_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    handle_attachment(state, Modality::Audio, multipart).await
}

async fn handle_attachment(
    state: AppState,
    modality: Modality,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let multipart = multipart.map_err(|e| ValidationError::Multipart { message: e.body_text() })?;
    let field = modality.upload_field().ok_or(ValidationError::InvalidPayloadType)?;

    let (file, prompt) = read_upload(&state, field, multipart).await?;
    let file = file.ok_or_else(|| ValidationError::MissingAttachment { field: field.to_string() })?;

    info!(
        "Received {} request: file={}, size={} bytes, declared_type={}, prompt={}",
        modality,
        file.display_name(),
        file.size(),
        file.declared_type().unwrap_or("-"),
        prompt.is_some()
    );

    let output = state
        .dispatcher
        .dispatch(GenerationRequest::Attachment(AttachmentRequest { modality, prompt, file }))
        .await?;

    Ok((StatusCode::OK, Json(json!({ "output": output }))))
}

/// Stream the multipart body: the file field goes to a staged file, `prompt`
/// is kept as text, anything else is skipped.
///
/// An error after the file was staged drops the `StagedFile`, which deletes it.
async fn read_upload(
    state: &AppState,
    file_field: &str,
    mut multipart: Multipart,
) -> GatewayResult<(Option<StagedFile>, Option<String>)> {
    let mut staged: Option<StagedFile> = None;
    let mut prompt: Option<String> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        if name == file_field {
            if staged.is_some() {
                trace!("Ignoring extra '{}' file in multipart body", name);
                continue;
            }
            let mut writer = state
                .staging
                .create(
                    field.file_name().map(str::to_string),
                    field.content_type().map(str::to_string),
                )
                .await?;
            while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                writer.write_chunk(&chunk).await?;
            }
            staged = Some(writer.finish().await?);
        } else if name == "prompt" {
            prompt = Some(field.text().await.map_err(multipart_error)?);
        } else {
            trace!("Ignoring unknown multipart field: {}", name);
        }
    }

    Ok((staged, prompt))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> GatewayError {
    ValidationError::Multipart { message: e.body_text() }.into()
}
