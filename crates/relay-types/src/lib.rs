//! # Relay Types
//!
//! Core types, content parts, and error definitions for Gemini Relay.
//!
//! - **`error`** - Typed errors for request validation and provider calls
//! - **`models`** - Modalities, model selection, and normalized content parts
//! - **`protocol`** - Gemini `generateContent` and Files API wire types
//!
//! ## Architecture Role
//!
//! ```text
//!      relay-types (this crate)
//!              │
//!              ▼
//!         relay-core
//!              │
//!              ▼
//!        relay-server
//! ```

pub mod error;
pub mod models;
pub mod protocol;

pub use error::{ProviderError, ValidationError};
pub use models::{ContentPart, Modality, ModelSelection, Role, Turn};
