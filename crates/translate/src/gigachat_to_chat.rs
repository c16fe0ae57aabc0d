//! Translates GigaChat responses (complete bodies and stream chunks) into
//! vendor-neutral results.

use crate::finish::map_finish_reason;
use gigagate_types::{
    ChatResult, FinishReason, GatewayError, ResponseTranslator, Usage, error::Result,
};
use serde_json::Value;

/// Translator from a GigaChat chat-completion body to [`ChatResult`].
pub struct GigaChatToChat;

fn usage_from(value: &Value) -> Option<Usage> {
    let usage = value.get("usage").filter(|u| u.is_object())?;
    Some(Usage::new(
        usage
            .get("prompt_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        usage
            .get("completion_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0),
    ))
}

impl ResponseTranslator for GigaChatToChat {
    /// # Errors
    ///
    /// Returns [`GatewayError::Translation`] if the body carries no choices.
    fn translate_response(&self, res: Value) -> Result<ChatResult> {
        let choice = res
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|arr| arr.first())
            .ok_or_else(|| GatewayError::Translation("response has no choices".into()))?;

        let text = choice
            .pointer("/message/content")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let finish_reason = choice
            .get("finish_reason")
            .and_then(Value::as_str)
            .map_or(FinishReason::Unknown, map_finish_reason);

        Ok(ChatResult {
            text,
            finish_reason,
            usage: usage_from(&res).unwrap_or_default(),
        })
    }
}

/// What one streamed record contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkUpdate {
    /// Non-empty incremental text.
    pub text: Option<String>,
    /// Latest token totals, if the record reported them.
    pub usage: Option<Usage>,
    /// Termination code carried by the record, already mapped.
    pub finish_reason: Option<FinishReason>,
}

/// Extract the text delta, usage, and finish reason from one stream record.
///
/// Records lacking any of these (role-only deltas, keep-alive objects)
/// produce an empty update rather than an error.
#[must_use]
pub fn translate_chunk(chunk: &Value) -> ChunkUpdate {
    let choice = chunk
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first());

    let text = choice
        .and_then(|c| c.pointer("/delta/content"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let finish_reason = choice
        .and_then(|c| c.get("finish_reason"))
        .and_then(Value::as_str)
        .map(map_finish_reason);

    ChunkUpdate {
        text,
        usage: usage_from(chunk),
        finish_reason,
    }
}
