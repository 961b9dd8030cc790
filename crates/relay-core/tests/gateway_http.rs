#![allow(clippy::unwrap_used, reason = "integration test: panics are the assertion mechanism")]

mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use base64::Engine as _;
use common::{Behavior, TestGateway, STUB_FILE_URI};
use relay_types::protocol::gemini::GeminiPart;
use relay_types::{ContentPart, ModelSelection, Role};
use serde_json::{json, Value};

// ===== /generate-text =====

#[tokio::test]
async fn test_generate_text_echo_scenario() {
    let gw = TestGateway::new(Behavior::Echo);

    let response = gw.server.post("/generate-text").json(&json!({"message": "2+2?"})).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"reply": "2+2?"}));
}

#[tokio::test]
async fn test_generate_text_issues_exactly_one_call() {
    let gw = TestGateway::new(Behavior::Echo);

    gw.server.post("/generate-text").json(&json!({"message": "hello"})).await;

    let calls = gw.provider.generate_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, ModelSelection::DEFAULT_TEXT);
    assert_eq!(calls[0].turns.len(), 1);
    assert_eq!(calls[0].turns[0].role, Role::User);
    assert_eq!(calls[0].turns[0].parts, vec![ContentPart::text("hello")]);
}

#[tokio::test]
async fn test_generate_text_missing_payload() {
    let gw = TestGateway::new(Behavior::Echo);

    let response = gw.server.post("/generate-text").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({"error": "No payload was sent"}));
    assert!(gw.provider.generate_calls().is_empty());
}

#[tokio::test]
async fn test_generate_text_rejects_non_object_bodies() {
    let gw = TestGateway::new(Behavior::Echo);

    for body in [json!([1, 2]), json!("hello"), json!(7), json!(false)] {
        let response = gw.server.post("/generate-text").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>(), json!({"error": "Payload type is invalid"}));
    }
    assert!(gw.provider.generate_calls().is_empty());
}

#[tokio::test]
async fn test_generate_text_rejects_missing_or_invalid_message() {
    let gw = TestGateway::new(Behavior::Echo);

    for body in [json!({}), json!({"message": 5}), json!({"message": ""}), json!({"text": "hi"})] {
        let response = gw.server.post("/generate-text").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": "Message is missing or has an invalid format"})
        );
    }
    assert!(gw.provider.generate_calls().is_empty());
}

#[tokio::test]
async fn test_generate_text_provider_failure_is_500() {
    let gw = TestGateway::new(Behavior::FailGenerate);

    let response = gw.server.post("/generate-text").json(&json!({"message": "hello"})).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("503"));
}

// ===== /generate-from-document =====

#[tokio::test]
async fn test_document_inline_scenario() {
    let gw = TestGateway::new(Behavior::Echo);
    let content = b"0123456789".to_vec();
    let form = MultipartForm::new().add_part(
        "document",
        Part::bytes(content.clone()).file_name("ten.txt").mime_type("text/plain"),
    );

    let response = gw.server.post("/generate-from-document").multipart(form).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"output": "describe the following document"}));

    let calls = gw.provider.generate_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, ModelSelection::DEFAULT_DOCUMENT);
    let parts = &calls[0].turns[0].parts;
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], ContentPart::text("describe the following document"));
    assert_eq!(
        parts[1],
        ContentPart::Inline { data: content.clone(), media_type: "text/plain".to_string() }
    );

    // Decoded wire payload matches the upload byte for byte
    let GeminiPart::InlineData { inline_data } = GeminiPart::from(&parts[1]) else {
        panic!("expected inline data part");
    };
    let decoded = base64::engine::general_purpose::STANDARD.decode(inline_data.data).unwrap();
    assert_eq!(decoded, content);

    assert_eq!(gw.staged_files(), 0);
    assert!(gw.provider.upload_calls().is_empty());
}

#[tokio::test]
async fn test_document_uses_caller_prompt() {
    let gw = TestGateway::new(Behavior::Echo);
    let form = MultipartForm::new()
        .add_text("prompt", "summarize this")
        .add_part(
            "document",
            Part::bytes(b"%PDF-1.7\n...".to_vec())
                .file_name("report.pdf")
                .mime_type("application/octet-stream"),
        );

    let response = gw.server.post("/generate-from-document").multipart(form).await;

    response.assert_status(StatusCode::OK);
    let calls = gw.provider.generate_calls();
    assert_eq!(calls[0].turns[0].parts[0], ContentPart::text("summarize this"));
    assert_eq!(calls[0].turns[0].parts[1].media_type(), Some("application/pdf"));
    assert_eq!(gw.staged_files(), 0);
}

#[tokio::test]
async fn test_document_removed_when_provider_fails() {
    let gw = TestGateway::new(Behavior::FailGenerate);
    let form = MultipartForm::new().add_part(
        "document",
        Part::bytes(b"some notes".to_vec()).file_name("notes.txt").mime_type("text/plain"),
    );

    let response = gw.server.post("/generate-from-document").multipart(form).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json::<Value>()["error"].is_string());
    assert_eq!(gw.provider.generate_calls().len(), 1);
    assert_eq!(gw.staged_files(), 0);
}

#[tokio::test]
async fn test_document_missing_file() {
    let gw = TestGateway::new(Behavior::Echo);
    let form = MultipartForm::new().add_text("prompt", "summarize");

    let response = gw.server.post("/generate-from-document").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "No file was uploaded in field 'document'"})
    );
    assert!(gw.provider.generate_calls().is_empty());
}

#[tokio::test]
async fn test_document_over_inline_limit() {
    let gw = TestGateway::with_config(Behavior::Echo, |config| config.max_inline_bytes = 8);
    let form = MultipartForm::new().add_part(
        "document",
        Part::bytes(b"0123456789".to_vec()).file_name("ten.txt").mime_type("text/plain"),
    );

    let response = gw.server.post("/generate-from-document").multipart(form).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(gw.provider.generate_calls().is_empty());
    assert_eq!(gw.staged_files(), 0);
}

#[tokio::test]
async fn test_attachment_route_rejects_non_multipart() {
    let gw = TestGateway::new(Behavior::Echo);

    let response = gw.server.post("/generate-from-document").json(&json!({"prompt": "x"})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].as_str().unwrap().starts_with("Malformed multipart"));
}

// ===== /generate-from-audio =====

#[tokio::test]
async fn test_audio_default_prompt_and_inline_part() {
    let gw = TestGateway::new(Behavior::Echo);
    let wav = b"RIFF\x24\x00\x00\x00WAVEfmt \x10\x00\x00\x00".to_vec();
    let form = MultipartForm::new()
        .add_part("audio", Part::bytes(wav.clone()).file_name("clip.wav").mime_type("audio/wav"));

    let response = gw.server.post("/generate-from-audio").multipart(form).await;

    response.assert_status(StatusCode::OK);
    let calls = gw.provider.generate_calls();
    assert_eq!(calls[0].model, ModelSelection::DEFAULT_AUDIO);
    assert_eq!(calls[0].turns[0].parts[0], ContentPart::text("describe the following audio"));
    assert_eq!(
        calls[0].turns[0].parts[1],
        ContentPart::Inline { data: wav, media_type: "audio/wav".to_string() }
    );
    assert_eq!(gw.staged_files(), 0);
}

#[tokio::test]
async fn test_audio_sniffed_when_declared_type_is_generic() {
    let gw = TestGateway::new(Behavior::Echo);
    let flac = b"fLaC\x00\x00\x00\x22\x10\x00\x10\x00".to_vec();
    let form = MultipartForm::new().add_part(
        "audio",
        Part::bytes(flac).file_name("upload").mime_type("application/octet-stream"),
    );

    let response = gw.server.post("/generate-from-audio").multipart(form).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(gw.provider.generate_calls()[0].turns[0].parts[1].media_type(), Some("audio/flac"));
}

#[tokio::test]
async fn test_audio_unknown_format_rejected_and_removed() {
    let gw = TestGateway::new(Behavior::Echo);
    let form = MultipartForm::new().add_part(
        "audio",
        Part::bytes(b"not really audio".to_vec())
            .file_name("mystery.bin")
            .mime_type("application/octet-stream"),
    );

    let response = gw.server.post("/generate-from-audio").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Unsupported media type for 'mystery.bin'"})
    );
    assert!(gw.provider.generate_calls().is_empty());
    assert_eq!(gw.staged_files(), 0);
}

#[tokio::test]
async fn test_audio_removed_when_provider_fails() {
    let gw = TestGateway::new(Behavior::FailGenerate);
    let form = MultipartForm::new().add_part(
        "audio",
        Part::bytes(b"ID3\x04\x00\x00\x00\x00\x00\x00\x00\x00".to_vec())
            .file_name("a.mp3")
            .mime_type("audio/mpeg"),
    );

    let response = gw.server.post("/generate-from-audio").multipart(form).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(gw.staged_files(), 0);
}

// ===== /generate-from-image =====

#[tokio::test]
async fn test_image_references_uploaded_uri() {
    let gw = TestGateway::new(Behavior::Echo);
    let png = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR".to_vec();
    let form = MultipartForm::new()
        .add_text("prompt", "what is in this picture?")
        .add_part("image", Part::bytes(png.clone()).file_name("cat.png").mime_type("image/png"));

    let response = gw.server.post("/generate-from-image").multipart(form).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"output": "what is in this picture?"}));

    let uploads = gw.provider.upload_calls();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].data, png);
    assert_eq!(uploads[0].media_type, "image/png");
    assert_eq!(uploads[0].display_name, "cat.png");

    let calls = gw.provider.generate_calls();
    assert_eq!(calls[0].model, ModelSelection::DEFAULT_IMAGE);
    let parts = &calls[0].turns[0].parts;
    assert_eq!(
        parts[1],
        ContentPart::RemoteRef { uri: STUB_FILE_URI.to_string(), media_type: "image/png".to_string() }
    );
    assert!(!parts.iter().any(|p| matches!(p, ContentPart::Inline { .. })));
    assert_eq!(gw.staged_files(), 0);
}

#[tokio::test]
async fn test_image_requires_prompt() {
    let gw = TestGateway::new(Behavior::Echo);
    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(b"\xFF\xD8\xFF\xE0\x00\x10JFIF".to_vec()).file_name("p.jpg").mime_type("image/jpeg"),
    );

    let response = gw.server.post("/generate-from-image").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({"error": "Prompt is required"}));
    assert!(gw.provider.upload_calls().is_empty());
    assert!(gw.provider.generate_calls().is_empty());
    assert_eq!(gw.staged_files(), 0);
}

#[tokio::test]
async fn test_image_removed_when_upload_fails() {
    let gw = TestGateway::new(Behavior::FailUpload);
    let form = MultipartForm::new().add_text("prompt", "describe").add_part(
        "image",
        Part::bytes(b"GIF89a\x01\x00\x01\x00".to_vec()).file_name("dot.gif").mime_type("image/gif"),
    );

    let response = gw.server.post("/generate-from-image").multipart(form).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(gw.provider.generate_calls().is_empty());
    assert_eq!(gw.staged_files(), 0);
}

// ===== /chat and health =====

#[tokio::test]
async fn test_chat_forwards_conversation() {
    let gw = TestGateway::new(Behavior::Echo);

    let response = gw
        .server
        .post("/chat")
        .json(&json!({
            "conversation": [
                {"role": "user", "message": "hi"},
                {"role": "model", "message": "hello!"},
                {"role": "user", "message": "tell me a joke"}
            ]
        }))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"data": "tell me a joke"}));
    let calls = gw.provider.generate_calls();
    assert_eq!(calls[0].model, ModelSelection::DEFAULT_TEXT);
    assert_eq!(calls[0].turns.len(), 3);
    assert_eq!(calls[0].turns[1].role, Role::Model);
}

#[tokio::test]
async fn test_chat_rejects_bad_conversation() {
    let gw = TestGateway::new(Behavior::Echo);

    let response = gw.server.post("/chat").json(&json!({"conversation": []})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(gw.provider.generate_calls().is_empty());
}

#[tokio::test]
async fn test_health_endpoint() {
    let gw = TestGateway::new(Behavior::Echo);

    let response = gw.server.get("/health").await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"status": "ok"}));
}

#[tokio::test]
async fn test_custom_model_selection_is_used() {
    let gw = TestGateway::with_config(Behavior::Echo, |config| {
        config.models.text = "gemini-custom-text".to_string();
    });

    gw.server.post("/generate-text").json(&json!({"message": "hi"})).await;

    assert_eq!(gw.provider.generate_calls()[0].model, "gemini-custom-text");
}
