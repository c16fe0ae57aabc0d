//! Shared HTTP utilities for the gateway client.
//!
//! Owns the send → status-check step and the conversion of a streaming
//! body into a [`ByteStream`].

use futures_util::StreamExt as _;
use gigagate_config::Config;
use gigagate_types::{ByteStream, GatewayError, Result};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// Thin wrapper around a [`reqwest::Client`] that turns non-success
/// responses into [`GatewayError::Request`].
#[derive(Clone)]
pub struct ProviderHttp {
    http: Client,
}

impl ProviderHttp {
    /// Creates a new helper wrapping the given HTTP client.
    #[must_use]
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Returns a reference to the inner HTTP client for building requests.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.http
    }

    /// Sends a request and checks for success status.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Request` on non-success HTTP status codes,
    /// or a transport error if the request fails to send.
    pub async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let body = if text.is_empty() {
            status.canonical_reason().unwrap_or_default().to_string()
        } else {
            text
        };
        tracing::warn!(status = status.as_u16(), "chat request rejected");
        Err(GatewayError::Request {
            status: status.as_u16(),
            body,
        })
    }

    /// Converts a `reqwest::Response` into a `ByteStream`.
    #[must_use]
    pub fn byte_stream(resp: reqwest::Response) -> ByteStream {
        Box::pin(resp.bytes_stream().map(|r| r.map_err(GatewayError::from)))
    }
}

/// Build the HTTP client shared by the token cache and the chat client.
///
/// Applies the optional extra root certificates (a PEM bundle) and the
/// connect timeout.
///
/// # Errors
///
/// Returns `GatewayError::Config` if the bundle cannot be read, holds no
/// certificate, or the client cannot be constructed.
pub fn build_client(config: &Config) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(path) = &config.ca_cert {
        let pem = std::fs::read(path).map_err(|e| {
            GatewayError::Config(format!("cannot read ca_cert {}: {e}", path.display()))
        })?;
        let certs = reqwest::Certificate::from_pem_bundle(&pem)
            .map_err(|e| GatewayError::Config(format!("invalid ca_cert: {e}")))?;
        if certs.is_empty() {
            return Err(GatewayError::Config(format!(
                "ca_cert {} contains no certificates",
                path.display()
            )));
        }
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }
    if let Some(secs) = config.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| GatewayError::Config(format!("http client: {e}")))
}
