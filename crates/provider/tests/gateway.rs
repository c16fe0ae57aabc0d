//! End-to-end client behaviour against mock OAuth and chat endpoints.

use futures_util::StreamExt as _;
use gigagate_auth::{AuthKey, TokenCache};
use gigagate_provider::{GigaChatClient, GigaChatModel};
use gigagate_types::{
    ChatRequest, ChatResponse, FinishReason, GatewayError, LanguageModel as _, Message, Scope,
    StreamEvent, Usage, token::now_secs,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

const OAUTH: &str = "/api/v2/oauth";
const CHAT: &str = "/api/v1/chat/completions";

fn client_for(server: &MockServer) -> GigaChatClient {
    let http = reqwest::Client::new();
    let tokens = Arc::new(TokenCache::new(
        http.clone(),
        format!("{}{OAUTH}", server.uri()),
        Scope::Personal,
    ));
    GigaChatClient::new(http, format!("{}/api/v1/", server.uri()), tokens)
}

async fn mount_token(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(OAUTH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": token, "expires_at": now_secs() + 1800})),
        )
        .expect(times)
        .mount(server)
        .await;
}

fn hi_request() -> ChatRequest {
    ChatRequest::new("GigaChat", vec![Message::user("hello")])
}

fn sse_body(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{l}\n\n")).collect()
}

#[tokio::test]
async fn test_complete_end_to_end() {
    let server = MockServer::start().await;
    mount_token(&server, "T", 1).await;
    Mock::given(method("POST"))
        .and(path(CHAT))
        .and(header("authorization", "Bearer T"))
        .and(body_partial_json(json!({
            "model": "GigaChat",
            "stream": false,
            "messages": [{"role": "user", "content": "hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "hi"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .complete(hi_request(), &AuthKey::new("a2V5"))
        .await
        .unwrap();
    assert_eq!(result.text, "hi");
    assert_eq!(result.finish_reason, FinishReason::Stop);
    assert_eq!(result.usage, Usage::new(5, 1));
}

#[tokio::test]
async fn test_second_call_reuses_token() {
    let server = MockServer::start().await;
    mount_token(&server, "T", 1).await;
    Mock::given(method("POST"))
        .and(path(CHAT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}, "finish_reason": "stop"}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let key = AuthKey::new("a2V5");
    client.complete(hi_request(), &key).await.unwrap();
    client.complete(hi_request(), &key).await.unwrap();
}

#[tokio::test]
async fn test_auth_failure_skips_chat_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OAUTH))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CHAT))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .send(hi_request().with_stream(true), &AuthKey::new("bad"))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, GatewayError::Authentication { status: 401, .. }));
}

#[tokio::test]
async fn test_stream_end_to_end() {
    let server = MockServer::start().await;
    mount_token(&server, "T", 1).await;
    let body = sse_body(&[
        r#"data: {"choices":[{"delta":{"content":"Hel","role":"assistant"},"index":0}]}"#,
        r#"data: {"choices":[{"delta":{"content":"lo"},"index":0}]}"#,
        "data: {broken",
        r#"data: {"choices":[{"delta":{"content":""},"finish_reason":"stop"}],"usage":{"prompt_tokens":5,"completion_tokens":2}}"#,
        "data: [DONE]",
    ]);
    Mock::given(method("POST"))
        .and(path(CHAT))
        .and(header("accept", "text/event-stream"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .send(hi_request().with_stream(true), &AuthKey::new("a2V5"))
        .await
        .unwrap();
    let ChatResponse::Stream(stream) = response else {
        panic!("expected a stream");
    };
    let events: Vec<StreamEvent> = stream.collect().await;
    assert_eq!(
        events,
        vec![
            StreamEvent::TextDelta { text: "Hel".into() },
            StreamEvent::TextDelta { text: "lo".into() },
            StreamEvent::UsageUpdate {
                prompt_tokens: 5,
                completion_tokens: 2
            },
            StreamEvent::Finish {
                reason: FinishReason::Stop,
                usage: Usage::new(5, 2)
            },
        ]
    );
}

#[tokio::test]
async fn test_non_json_chat_body_is_not_retryable() {
    let server = MockServer::start().await;
    mount_token(&server, "T", 1).await;
    Mock::given(method("POST"))
        .and(path(CHAT))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .complete(hi_request(), &AuthKey::new("a2V5"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Serialization(_)), "got {err:?}");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_rejected_stream_errors_before_events() {
    let server = MockServer::start().await;
    mount_token(&server, "T", 1).await;
    Mock::given(method("POST"))
        .and(path(CHAT))
        .respond_with(ResponseTemplate::new(422).set_body_string("unknown model"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .stream(hi_request(), &AuthKey::new("a2V5"))
        .await
        .err()
        .unwrap();
    match err {
        GatewayError::Request { status, body } => {
            assert_eq!(status, 422);
            assert!(body.contains("unknown model"));
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_chat_invalidates_token() {
    let server = MockServer::start().await;
    mount_token(&server, "T", 2).await;
    Mock::given(method("POST"))
        .and(path(CHAT))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let key = AuthKey::new("a2V5");
    for _ in 0..2 {
        let err = client.complete(hi_request(), &key).await.err().unwrap();
        assert_eq!(err.status(), Some(401));
    }
    assert!(client.token_cache().peek().is_none());
}

#[tokio::test]
async fn test_model_binding_overrides_request_model() {
    let server = MockServer::start().await;
    mount_token(&server, "T", 1).await;
    Mock::given(method("POST"))
        .and(path(CHAT))
        .and(body_partial_json(json!({"model": "GigaChat-Max"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}, "finish_reason": "length"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = GigaChatModel::new(
        Arc::new(client_for(&server)),
        AuthKey::new("a2V5"),
        "GigaChat-Max",
    );
    assert_eq!(model.provider(), "gigachat");
    assert_eq!(model.model_id(), "GigaChat-Max");
    let ChatResponse::Complete(result) = model.chat_completion(hi_request()).await.unwrap() else {
        panic!("expected a complete result");
    };
    assert_eq!(result.finish_reason, FinishReason::Length);
}
