//! Core types and traits for the gigagate workspace.
//!
//! This crate defines the shared abstractions used across all layers of the
//! gateway client: the error taxonomy, bearer credentials, the vendor-neutral
//! chat request, typed stream events, and the traits each layer implements.

pub mod chat;
pub mod error;
pub mod scope;
pub mod stream;
pub mod token;
pub mod traits;

pub use chat::{ChatRequest, ContentPart, Message, MessageContent, Role, SamplingParams};
pub use error::{GatewayError, Result};
pub use scope::Scope;
pub use stream::{ChatResult, FinishReason, StreamEvent, Usage};
pub use token::CachedCredential;
pub use traits::{
    ByteStream, ChatResponse, EventStream, LanguageModel, RequestTranslator, ResponseTranslator,
};
