//! GigaChat chat client: HTTP plumbing, stream parsing, and the
//! [`LanguageModel`](gigagate_types::LanguageModel) binding.

pub mod client;
pub mod http_util;
pub mod model;
pub mod sse;

pub use client::GigaChatClient;
pub use http_util::{ProviderHttp, build_client};
pub use model::GigaChatModel;
pub use sse::parse_event_stream;
