//! GigaChat client-credentials token exchange.
//!
//! Requires a fresh `RqUID` correlation header on every call.
use crate::AuthKey;
use gigagate_types::{CachedCredential, GatewayError, Result, Scope};
use serde_json::Value;

pub const AUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";

/// A new correlation id for one token request.
#[must_use]
pub fn rq_uid() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[must_use]
pub fn build_token_params(scope: Scope) -> Vec<(&'static str, &'static str)> {
    vec![("scope", scope.as_str())]
}

/// # Errors
///
/// Returns an error if the response is missing `access_token` or `expires_at`.
pub fn parse_token_response(json: &Value) -> Result<CachedCredential> {
    let access_token = json
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::Parse("missing access_token".into()))?;
    let expires_at = json
        .get("expires_at")
        .and_then(Value::as_u64)
        .ok_or_else(|| GatewayError::Parse("missing expires_at".into()))?;
    Ok(CachedCredential::new(access_token, expires_at))
}

/// Exchange `key` for a bearer credential. No retries.
///
/// # Errors
///
/// Returns [`GatewayError::Authentication`] on a non-success status, a
/// transport error if the request cannot be sent, or a parse error if the
/// body is not a token response.
pub async fn request_token(
    http: &reqwest::Client,
    auth_url: &str,
    scope: Scope,
    key: &AuthKey,
) -> Result<CachedCredential> {
    let rq_uid = rq_uid();
    tracing::debug!(%rq_uid, %scope, "requesting access token");

    let resp = http
        .post(auth_url)
        .header("accept", "application/json")
        .header("authorization", format!("Basic {}", key.expose()))
        .header("rquid", &rq_uid)
        .form(&build_token_params(scope))
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let reason = status.canonical_reason().unwrap_or("unknown status");
        return Err(GatewayError::Authentication {
            status: status.as_u16(),
            message: if text.is_empty() {
                reason.to_string()
            } else {
                format!("{reason}: {text}")
            },
        });
    }

    let bytes = resp.bytes().await?;
    let json: Value = serde_json::from_slice(&bytes)?;
    parse_token_response(&json)
}
