//! Process-shared bearer token cache.
//!
//! Responsibilities:
//! - Serve the cached credential while it is outside the 60 s safety margin.
//! - Exchange the authorization key for a new credential otherwise.
//! - Never hand a credential minted for one key to a caller using another.
//!
//! The slot is an [`ArcSwapOption`]: readers take lock-free snapshots and a
//! refresh replaces the whole entry. In [`RefreshMode::Racy`] concurrent
//! callers that all see a stale entry each refresh and the last store wins;
//! [`RefreshMode::Coalesced`] funnels them through one in-flight exchange.
use crate::{AuthKey, gigachat};
use arc_swap::ArcSwapOption;
use gigagate_config::{Config, RefreshMode};
use gigagate_types::{CachedCredential, Result, Scope};
use std::sync::Arc;
use tokio::sync::Mutex;

struct Entry {
    fingerprint: [u8; 32],
    credential: CachedCredential,
}

pub struct TokenCache {
    http: reqwest::Client,
    auth_url: String,
    scope: Scope,
    mode: RefreshMode,
    slot: ArcSwapOption<Entry>,
    refresh_lock: Mutex<()>,
}

impl TokenCache {
    pub fn new(http: reqwest::Client, auth_url: impl Into<String>, scope: Scope) -> Self {
        Self {
            http,
            auth_url: auth_url.into(),
            scope,
            mode: RefreshMode::default(),
            slot: ArcSwapOption::empty(),
            refresh_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_refresh_mode(mut self, mode: RefreshMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build a cache for the endpoint, scope, and refresh mode in `config`.
    #[must_use]
    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        Self::new(http, config.auth_url.clone(), config.scope).with_refresh_mode(config.refresh)
    }

    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Return a usable credential for `key`, authenticating if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`gigagate_types::GatewayError::Authentication`] if the token
    /// endpoint rejects the key, or a transport/parse error from the exchange.
    pub async fn get_valid_token(&self, key: &AuthKey) -> Result<CachedCredential> {
        let fingerprint = key.fingerprint();
        if let Some(credential) = self.cached(&fingerprint) {
            tracing::debug!(expires_at = credential.expires_at(), "reusing cached token");
            return Ok(credential);
        }

        match self.mode {
            RefreshMode::Racy => self.refresh(key, fingerprint).await,
            RefreshMode::Coalesced => {
                let _guard = self.refresh_lock.lock().await;
                // Another caller may have refreshed while we waited.
                if let Some(credential) = self.cached(&fingerprint) {
                    return Ok(credential);
                }
                self.refresh(key, fingerprint).await
            }
        }
    }

    /// Drop the cached credential if it is still the one carrying `token`.
    ///
    /// Called after the chat endpoint rejects a token; a newer credential
    /// stored by a concurrent refresh is left alone.
    pub fn invalidate(&self, token: &str) {
        let previous = self.slot.rcu(|current| match current {
            Some(entry) if entry.credential.token() == token => None,
            other => other.clone(),
        });
        if previous.is_some_and(|e| e.credential.token() == token) {
            tracing::warn!("cached token invalidated");
        }
    }

    /// Drop whatever is cached.
    pub fn clear(&self) {
        self.slot.store(None);
    }

    /// Snapshot of the cached credential, valid or not.
    #[must_use]
    pub fn peek(&self) -> Option<CachedCredential> {
        self.slot.load_full().map(|e| e.credential.clone())
    }

    fn cached(&self, fingerprint: &[u8; 32]) -> Option<CachedCredential> {
        self.slot
            .load_full()
            .filter(|e| e.fingerprint == *fingerprint && e.credential.is_valid())
            .map(|e| e.credential.clone())
    }

    async fn refresh(&self, key: &AuthKey, fingerprint: [u8; 32]) -> Result<CachedCredential> {
        let credential =
            gigachat::request_token(&self.http, &self.auth_url, self.scope, key).await?;
        self.slot.store(Some(Arc::new(Entry {
            fingerprint,
            credential: credential.clone(),
        })));
        tracing::info!(
            scope = %self.scope,
            expires_at = credential.expires_at(),
            "access token refreshed"
        );
        Ok(credential)
    }
}
