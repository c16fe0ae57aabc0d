//! [`LanguageModel`] binding of a client, key, and model name.

use crate::client::GigaChatClient;
use async_trait::async_trait;
use gigagate_auth::AuthKey;
use gigagate_types::{ChatRequest, ChatResponse, LanguageModel, Result};
use std::sync::Arc;

/// Provider name reported by [`GigaChatModel`].
pub const PROVIDER: &str = "gigachat";

/// A GigaChat model usable through the [`LanguageModel`] seam.
///
/// The bound model name replaces whatever the request carries.
pub struct GigaChatModel {
    client: Arc<GigaChatClient>,
    key: AuthKey,
    model: String,
}

impl GigaChatModel {
    pub fn new(client: Arc<GigaChatClient>, key: AuthKey, model: impl Into<String>) -> Self {
        Self {
            client,
            key,
            model: model.into(),
        }
    }
}

#[async_trait]
impl LanguageModel for GigaChatModel {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn chat_completion(&self, mut request: ChatRequest) -> Result<ChatResponse> {
        request.model.clone_from(&self.model);
        self.client.send(request, &self.key).await
    }
}
