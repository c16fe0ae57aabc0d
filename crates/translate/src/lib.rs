//! Translators between the vendor-neutral chat types and the GigaChat wire
//! format. All translators are pure functions with no I/O.

pub mod chat_to_gigachat;
pub mod finish;
pub mod gigachat_to_chat;
pub mod wire;

pub use chat_to_gigachat::ChatToGigaChat;
pub use finish::map_finish_reason;
pub use gigachat_to_chat::{ChunkUpdate, GigaChatToChat, translate_chunk};
pub use wire::{GigaChatMessage, GigaChatRequest};
