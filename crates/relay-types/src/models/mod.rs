//! Domain models shared by the relay crates.

mod content;
mod modality;

pub use content::{ContentPart, Role, Turn};
pub use modality::{AttachmentPolicy, Modality, ModelSelection};
