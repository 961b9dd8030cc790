//! # Relay Core
//!
//! Request normalization and dispatch for Gemini Relay.
//!
//! ```text
//! relay-core/src/
//! ├── handlers/     # axum handlers, one per route
//! ├── provider/     # GenerativeProvider trait + Gemini HTTP client
//! ├── dispatch.rs   # modality -> content parts -> provider call
//! ├── staging.rs    # StagedFile lifecycle for multipart uploads
//! ├── media.rs      # media type detection
//! ├── validation.rs # JSON payload checks
//! ├── error.rs      # GatewayError -> { "error": ... } responses
//! └── server.rs     # AppState + router
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod media;
pub mod provider;
pub mod server;
pub mod staging;
pub mod validation;

pub use config::{GatewayConfig, ProviderConfig};
pub use dispatch::{AttachmentRequest, Dispatcher, GenerationRequest};
pub use error::{GatewayError, GatewayResult};
pub use provider::{GeminiClient, GenerativeProvider, RemoteFile};
pub use server::{build_router, AppState};
pub use staging::{StagedFile, StagingArea};
