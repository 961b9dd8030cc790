use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use bytes::Bytes;
use serde_json::json;
use tracing::info;

use crate::dispatch::GenerationRequest;
use crate::error::GatewayError;
use crate::server::AppState;
use crate::validation;

/// `POST /generate-text`: `{ message }` in, `{ reply }` out.
pub async fn handle_generate_text(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, GatewayError> {
    let message = validation::text_message(&body)?;
    info!("Received text request: {} characters", message.len());

    let reply = state.dispatcher.dispatch(GenerationRequest::Text { prompt: message }).await?;

    Ok((StatusCode::OK, Json(json!({ "reply": reply }))))
}
