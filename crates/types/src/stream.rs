//! Typed generation results: finish reasons, token usage, stream events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    Error,
    Unknown,
}

impl FinishReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::ContentFilter => "content-filter",
            Self::ToolCalls => "tool-calls",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token accounting reported by the upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl Usage {
    #[must_use]
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

/// One element of a streamed generation.
///
/// A stream yields any number of `TextDelta` / `UsageUpdate` events and then
/// exactly one terminal event, either `Finish` or `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamEvent {
    TextDelta {
        text: String,
    },
    UsageUpdate {
        prompt_tokens: u64,
        completion_tokens: u64,
    },
    Finish {
        reason: FinishReason,
        usage: Usage,
    },
    Error {
        detail: String,
    },
}

impl StreamEvent {
    /// `true` for `Finish` and `Error`; nothing follows a terminal event.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finish { .. } | Self::Error { .. })
    }
}

/// A complete, non-streaming generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResult {
    pub text: String,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_finish_reason_display() {
        assert_eq!(FinishReason::ContentFilter.to_string(), "content-filter");
        assert_eq!(FinishReason::ToolCalls.to_string(), "tool-calls");
    }

    #[test]
    fn test_finish_reason_serde_matches_display() {
        let v = serde_json::to_value(FinishReason::ToolCalls).unwrap();
        assert_eq!(v, json!("tool-calls"));
    }

    #[test]
    fn test_usage_total() {
        assert_eq!(Usage::new(5, 1).total(), 6);
    }

    #[test]
    fn test_usage_total_saturates() {
        assert_eq!(Usage::new(u64::MAX, 7).total(), u64::MAX);
    }

    #[test]
    fn test_terminal_events() {
        assert!(
            StreamEvent::Finish {
                reason: FinishReason::Stop,
                usage: Usage::default()
            }
            .is_terminal()
        );
        assert!(
            StreamEvent::Error {
                detail: "boom".into()
            }
            .is_terminal()
        );
        assert!(!StreamEvent::TextDelta { text: "x".into() }.is_terminal());
    }

    #[test]
    fn test_stream_event_tagging() {
        let v = serde_json::to_value(StreamEvent::TextDelta { text: "hi".into() }).unwrap();
        assert_eq!(v, json!({"type": "text-delta", "text": "hi"}));
    }
}
