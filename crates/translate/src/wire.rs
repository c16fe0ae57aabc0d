//! GigaChat request body as sent over the wire.

use gigagate_types::Role;
use serde::Serialize;

/// `POST {base}/chat/completions` body.
///
/// Unset sampling parameters are omitted rather than defaulted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GigaChatRequest {
    pub model: String,
    pub messages: Vec<GigaChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
}

/// GigaChat only accepts plain-string message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GigaChatMessage {
    pub role: Role,
    pub content: String,
}
