//! Typed error definitions for Gemini Relay.
//!
//! - **`ValidationError`** - user-correctable request problems, detected
//!   before any network call
//! - **`ProviderError`** - failures talking to the generation provider

mod provider;
mod validation;

pub use provider::ProviderError;
pub use validation::ValidationError;
