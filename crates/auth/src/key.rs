//! The long-lived authorization key exchanged for bearer tokens.

use base64::Engine as _;
use gigagate_config::Config;
use gigagate_types::GatewayError;
use secrecy::{ExposeSecret as _, SecretString};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Basic-auth value sent to the token endpoint.
///
/// The upstream issues it pre-encoded (base64 of `client_id:client_secret`);
/// [`AuthKey::from_client`] performs that encoding for a raw id/secret pair.
pub struct AuthKey(SecretString);

impl AuthKey {
    /// Wrap an already-encoded authorization key.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(SecretString::from(encoded.into()))
    }

    /// Encode a client id and secret into an authorization key.
    #[must_use]
    pub fn from_client(client_id: &str, client_secret: &str) -> Self {
        let raw = format!("{client_id}:{client_secret}");
        Self::new(base64::engine::general_purpose::STANDARD.encode(raw))
    }

    /// Pick the key out of a loaded [`Config`], preferring `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if neither form of credential is set.
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(Self::new(key));
        }
        match (&config.client_id, &config.client_secret) {
            (Some(id), Some(secret)) => Ok(Self::from_client(id, secret)),
            _ => Err(GatewayError::Config("missing credentials".into())),
        }
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// SHA-256 of the key, used to tie a cached token to the key that minted it.
    pub(crate) fn fingerprint(&self) -> [u8; 32] {
        Sha256::digest(self.expose().as_bytes()).into()
    }
}

impl Clone for AuthKey {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_owned())
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthKey(<redacted>)")
    }
}
