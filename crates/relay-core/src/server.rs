use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::handlers;
use crate::provider::GenerativeProvider;
use crate::staging::StagingArea;

/// Axum application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub staging: Arc<StagingArea>,
}

impl AppState {
    pub fn new(provider: Arc<dyn GenerativeProvider>, config: &GatewayConfig) -> Self {
        let dispatcher =
            Dispatcher::new(provider, Arc::new(config.models.clone()), config.max_inline_bytes);
        Self {
            dispatcher: Arc::new(dispatcher),
            staging: Arc::new(StagingArea::new(config.staging_dir.clone())),
        }
    }
}

/// Build the gateway router: generation routes, health checks, optional
/// static client as fallback.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let router = Router::new()
        .route("/generate-text", post(handlers::handle_generate_text))
        .route("/generate-from-image", post(handlers::handle_generate_from_image))
        .route("/generate-from-document", post(handlers::handle_generate_from_document))
        .route("/generate-from-audio", post(handlers::handle_generate_from_audio))
        .route("/chat", post(handlers::handle_chat))
        .route("/health", get(handlers::handle_health))
        .route("/healthz", get(handlers::handle_health))
        .with_state(state);

    let router = match &config.static_dir {
        Some(static_dir) => {
            let index_path = static_dir.join("index.html");
            let static_service = ServeDir::new(static_dir)
                .append_index_html_on_directories(true)
                .not_found_service(ServeFile::new(index_path));
            router.fallback_service(static_service)
        },
        None => router,
    };

    router
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}
