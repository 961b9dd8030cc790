use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use bytes::Bytes;
use serde_json::json;
use tracing::info;

use crate::error::GatewayError;
use crate::server::AppState;
use crate::validation;

/// `POST /chat`: multi-turn conversation from the browser client.
///
/// Body: `{ "conversation": [{ "role": "user", "message": "..." }, ...] }`.
/// Reply: `{ "data": <text> }`.
pub async fn handle_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, GatewayError> {
    let turns = validation::conversation(&body)?;
    info!("Received chat request: {} turn(s)", turns.len());

    let data = state.dispatcher.dispatch_conversation(turns).await?;

    Ok((StatusCode::OK, Json(json!({ "data": data }))))
}
