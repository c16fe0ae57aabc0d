//! Translates a vendor-neutral [`ChatRequest`] into a GigaChat request body.

use crate::wire::{GigaChatMessage, GigaChatRequest};
use gigagate_types::{ChatRequest, Message, RequestTranslator};

/// Translator from [`ChatRequest`] to [`GigaChatRequest`].
pub struct ChatToGigaChat;

fn translate_message(msg: &Message) -> GigaChatMessage {
    GigaChatMessage {
        role: msg.role,
        content: msg.content.flatten(),
    }
}

impl RequestTranslator for ChatToGigaChat {
    type Wire = GigaChatRequest;

    /// Flattens every message to plain text and copies the sampling
    /// parameters into their GigaChat field names.
    fn translate_request(&self, req: &ChatRequest) -> GigaChatRequest {
        GigaChatRequest {
            model: req.model.clone(),
            messages: req.messages.iter().map(translate_message).collect(),
            temperature: req.sampling.temperature,
            max_tokens: req.sampling.max_tokens,
            stream: req.stream,
            top_p: req.sampling.top_p,
            repetition_penalty: req.sampling.repetition_penalty,
        }
    }
}
