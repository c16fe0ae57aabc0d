//! Server-sent-event response parsing.
//!
//! Turns a raw response body into a lazy [`EventStream`]. The body is split
//! into lines (partial lines are carried across chunk boundaries); only
//! `data:` lines are significant. Guarantees:
//!
//! - `data: [DONE]` ends the stream with exactly one `Finish { reason: Stop }`
//!   carrying the last observed usage, whatever earlier records said.
//! - A payload that is not valid JSON is logged and skipped.
//! - A transport error ends the stream with a single `Error` event, as does a
//!   line longer than [`MAX_LINE_BYTES`].
//! - Events come out in the order their lines were read.
use bytes::Bytes;
use futures_util::StreamExt as _;
use gigagate_translate::{ChunkUpdate, translate_chunk};
use gigagate_types::{ByteStream, EventStream, FinishReason, StreamEvent, Usage};
use serde_json::Value;

/// Prefix marking a significant line.
pub const DATA_PREFIX: &str = "data:";

/// Payload that terminates the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Longest unterminated line the decoder will hold.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Splits a byte stream into text lines.
///
/// Works on bytes so a multi-byte character split across two chunks is
/// decoded only once the line is complete.
#[derive(Debug)]
pub struct LineDecoder {
    buffer: Vec<u8>,
    max_line: usize,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::with_limit(MAX_LINE_BYTES)
    }
}

impl LineDecoder {
    #[must_use]
    pub fn with_limit(max_line: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_line,
        }
    }

    /// `true` once the pending partial line is longer than the limit.
    #[must_use]
    pub fn overflowed(&self) -> bool {
        self.buffer.len() > self.max_line
    }

    /// Append `chunk` and drain every complete line (without its `\n`/`\r\n`).
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// The trailing unterminated line, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

/// Outcome of feeding one line to [`StreamState`].
#[derive(Debug, PartialEq)]
pub enum Step {
    /// Zero or more events; the stream continues.
    Continue(Vec<StreamEvent>),
    /// The terminal event; nothing may follow it.
    Done(StreamEvent),
}

/// Per-stream running state. Owned by the task driving one stream.
#[derive(Debug, Default)]
pub struct StreamState {
    usage: Usage,
    finish_reason: Option<FinishReason>,
}

impl StreamState {
    /// Process a single line of the body.
    pub fn process_line(&mut self, line: &str) -> Step {
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return Step::Continue(Vec::new());
        };
        let payload = payload.strip_prefix(' ').unwrap_or(payload).trim_end();

        if payload == DONE_SENTINEL {
            return Step::Done(StreamEvent::Finish {
                reason: FinishReason::Stop,
                usage: self.usage,
            });
        }

        let record: Value = match serde_json::from_str(payload) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, frame = %payload, "skipping malformed stream frame");
                return Step::Continue(Vec::new());
            }
        };

        Step::Continue(self.apply(translate_chunk(&record)))
    }

    fn apply(&mut self, update: ChunkUpdate) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if let Some(text) = update.text {
            events.push(StreamEvent::TextDelta { text });
        }
        if let Some(usage) = update.usage {
            self.usage = usage;
            events.push(StreamEvent::UsageUpdate {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            });
        }
        if update.finish_reason.is_some() {
            self.finish_reason = update.finish_reason;
        }
        events
    }

    /// Terminal event for a body that ended cleanly without the sentinel.
    #[must_use]
    pub fn finish_without_sentinel(&self) -> StreamEvent {
        StreamEvent::Finish {
            reason: self.finish_reason.unwrap_or(FinishReason::Unknown),
            usage: self.usage,
        }
    }
}

/// Parse `body` lazily into typed events.
///
/// Dropping the returned stream drops `body`, releasing the connection.
#[must_use]
pub fn parse_event_stream(body: ByteStream) -> EventStream {
    Box::pin(async_stream::stream! {
        let mut body = body;
        let mut decoder = LineDecoder::default();
        let mut state = StreamState::default();

        while let Some(chunk) = body.next().await {
            let chunk: Bytes = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::warn!(error = %e, "stream read failed");
                    yield StreamEvent::Error { detail: e.to_string() };
                    return;
                }
            };
            for line in decoder.push(&chunk) {
                match state.process_line(&line) {
                    Step::Continue(events) => {
                        for event in events {
                            yield event;
                        }
                    }
                    Step::Done(event) => {
                        yield event;
                        return;
                    }
                }
            }
            if decoder.overflowed() {
                tracing::warn!(limit = MAX_LINE_BYTES, "stream line too long");
                yield StreamEvent::Error {
                    detail: format!("stream line exceeds {MAX_LINE_BYTES} bytes"),
                };
                return;
            }
        }

        if let Some(line) = decoder.finish() {
            match state.process_line(&line) {
                Step::Continue(events) => {
                    for event in events {
                        yield event;
                    }
                }
                Step::Done(event) => {
                    yield event;
                    return;
                }
            }
        }

        tracing::debug!("stream ended without [DONE]");
        yield state.finish_without_sentinel();
    })
}
