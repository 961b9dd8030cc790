// Handlers module - one file per route family
pub mod attachment;
pub mod chat;
pub mod health;
pub mod text;

pub use attachment::{handle_generate_from_audio, handle_generate_from_document, handle_generate_from_image};
pub use chat::handle_chat;
pub use health::handle_health;
pub use text::handle_generate_text;
