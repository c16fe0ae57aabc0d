//! GigaChat chat-completion client.
//!
//! Every call follows the same sequence: obtain a bearer token from the
//! shared [`TokenCache`], translate the request, POST it, then either
//! translate the JSON body or hand the byte stream to [`parse_event_stream`].
//! Failures before the first byte of the response surface as `Err`; once a
//! stream is returned, problems arrive as events.

use crate::http_util::{ProviderHttp, build_client};
use crate::sse::parse_event_stream;
use gigagate_auth::{AuthKey, TokenCache};
use gigagate_config::Config;
use gigagate_translate::{ChatToGigaChat, GigaChatToChat};
use gigagate_types::{
    ChatRequest, ChatResponse, ChatResult, EventStream, GatewayError, RequestTranslator as _,
    ResponseTranslator as _, Result,
};
use serde_json::Value;
use std::sync::Arc;

/// Path of the chat endpoint, relative to the API base URL.
pub const CHAT_PATH: &str = "/chat/completions";

/// Client for the chat endpoint behind a shared token cache.
pub struct GigaChatClient {
    http: ProviderHttp,
    base_url: String,
    tokens: Arc<TokenCache>,
}

impl GigaChatClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, tokens: Arc<TokenCache>) -> Self {
        Self {
            http: ProviderHttp::new(http),
            base_url: base_url.into(),
            tokens,
        }
    }

    /// Build a client and its token cache from `config`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Config` if `api_url` is unset or the HTTP
    /// client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config
            .api_url
            .clone()
            .ok_or_else(|| GatewayError::Config("api_url is not set".into()))?;
        let http = build_client(config)?;
        let tokens = Arc::new(TokenCache::from_config(config, http.clone()));
        Ok(Self::new(http, base_url, tokens))
    }

    /// The token cache backing this client.
    #[must_use]
    pub fn token_cache(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    fn chat_url(&self) -> String {
        format!("{}{CHAT_PATH}", self.base_url.trim_end_matches('/'))
    }

    /// Send `request`, streaming or not according to `request.stream`.
    ///
    /// # Errors
    ///
    /// - `GatewayError::Authentication` if the token exchange fails; the
    ///   chat endpoint is not contacted.
    /// - `GatewayError::Request` if the chat endpoint answers non-success.
    /// - Transport or translation errors for the non-streaming body.
    pub async fn send(&self, request: ChatRequest, key: &AuthKey) -> Result<ChatResponse> {
        if request.stream {
            self.stream(request, key).await.map(ChatResponse::Stream)
        } else {
            self.complete(request, key).await.map(ChatResponse::Complete)
        }
    }

    /// Non-streaming call returning the whole result.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn complete(&self, request: ChatRequest, key: &AuthKey) -> Result<ChatResult> {
        let resp = self.post(&request.with_stream(false), key).await?;
        let bytes = resp.bytes().await?;
        let json: Value = serde_json::from_slice(&bytes)?;
        GigaChatToChat.translate_response(json)
    }

    /// Streaming call returning a lazy event sequence.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send). Errors after the response headers arrive
    /// are delivered as a terminal `Error` event instead.
    pub async fn stream(&self, request: ChatRequest, key: &AuthKey) -> Result<EventStream> {
        let resp = self.post(&request.with_stream(true), key).await?;
        Ok(parse_event_stream(ProviderHttp::byte_stream(resp)))
    }

    async fn post(&self, request: &ChatRequest, key: &AuthKey) -> Result<reqwest::Response> {
        let credential = self.tokens.get_valid_token(key).await?;
        let body = ChatToGigaChat.translate_request(request);
        let accept = if request.stream {
            "text/event-stream"
        } else {
            "application/json"
        };

        tracing::debug!(
            model = %body.model,
            messages = body.messages.len(),
            stream = request.stream,
            "sending chat request"
        );

        let builder = self
            .http
            .client()
            .post(self.chat_url())
            .bearer_auth(credential.token())
            .header("accept", accept)
            .json(&body);

        match self.http.send(builder).await {
            Ok(resp) => Ok(resp),
            Err(e) => {
                if e.status() == Some(401) {
                    self.tokens.invalidate(credential.token());
                }
                Err(e)
            }
        }
    }
}
