//! Traits and stream aliases shared across all gigagate crates.
//!
//! Every cross-crate abstraction is defined here so that higher layers depend
//! only on `gigagate-types`, not on each other.

use crate::{ChatRequest, ChatResult, StreamEvent, error::Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use serde_json::Value;
use std::pin::Pin;

/// A pinned, sendable stream of raw response body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A pinned, sendable stream of typed generation events.
///
/// Errors never appear as `Err` items: a mid-stream failure is delivered as
/// a final [`StreamEvent::Error`].
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Translates a vendor-neutral [`ChatRequest`] into an upstream's wire body.
///
/// Implementations must be pure (no I/O).
pub trait RequestTranslator: Send + Sync {
    /// The serialisable wire representation.
    type Wire: serde::Serialize + Send;

    fn translate_request(&self, req: &ChatRequest) -> Self::Wire;
}

/// Translates an upstream's non-streaming response body into a [`ChatResult`].
///
/// Implementations must be pure (no I/O).
pub trait ResponseTranslator: Send + Sync {
    /// Convert a provider-native JSON response body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GatewayError::Translation`] if the body has no usable choice.
    fn translate_response(&self, res: Value) -> Result<ChatResult>;
}

/// The two-mode outcome of a chat call.
pub enum ChatResponse {
    /// A complete, non-streaming result.
    Complete(ChatResult),
    /// A live event sequence.
    Stream(EventStream),
}

impl std::fmt::Debug for ChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete(r) => f.debug_tuple("Complete").field(r).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// A language model bound to its provider, credentials, and model id.
///
/// This is the generic "language model" seam a host application programs
/// against; `request.stream` selects the response mode.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider name, for logs and diagnostics.
    fn provider(&self) -> &str;

    /// The model identifier this instance is bound to.
    fn model_id(&self) -> &str;

    /// Send a chat request and return either a result or a live stream.
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse>;
}
