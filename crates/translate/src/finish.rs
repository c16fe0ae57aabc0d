//! Upstream termination codes → [`FinishReason`].

use gigagate_types::FinishReason;

/// Maps a GigaChat `finish_reason` onto [`FinishReason`].
///
/// Total: anything unrecognised becomes [`FinishReason::Unknown`].
#[must_use]
pub fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "content-filter" => FinishReason::ContentFilter,
        "function_call" => FinishReason::ToolCalls,
        "error" => FinishReason::Error,
        _ => FinishReason::Unknown,
    }
}
