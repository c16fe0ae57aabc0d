use gigagate_types::{GatewayError, Scope};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides (`GIGACHAT_API_URL`, `GIGACHAT_API_KEY`, ...).
pub const ENV_PREFIX: &str = "GIGACHAT_";

fn default_auth_url() -> String {
    "https://ngw.devices.sberbank.ru:9443/api/v2/oauth".to_string()
}
fn default_model() -> String {
    "GigaChat".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

/// How concurrent callers behave when the cached credential has expired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
    /// Every caller that finds the cache stale refreshes on its own; the last
    /// writer wins.
    #[default]
    Racy,
    /// Callers queue behind a single in-flight refresh and reuse its result.
    Coalesced,
}

/// Logging options for the command-line front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat API base URL; `/chat/completions` is appended.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Pre-encoded authorization key (base64 of `client_id:client_secret`).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Client id, used with `client_secret` when `api_key` is absent.
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// OAuth token endpoint.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default)]
    pub scope: Scope,
    /// Model used when a request does not name one.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub refresh: RefreshMode,
    /// Extra PEM root certificate to trust (the gateway is signed by a
    /// national CA missing from common trust stores).
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
    /// TCP connect timeout for the HTTP client, in seconds.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            client_id: None,
            client_secret: None,
            auth_url: default_auth_url(),
            scope: Scope::default(),
            model: default_model(),
            refresh: RefreshMode::default(),
            ca_cert: None,
            connect_timeout_secs: None,
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from a file path, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &Path) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
    }

    /// Defaults, then the optional YAML file, then `GIGACHAT_*` environment
    /// variables. Nested keys use a double underscore (`GIGACHAT_LOG__JSON`).
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if a source cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Format as _, Serialized, Yaml},
        };
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Checks that the gateway can actually be reached with this config.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] naming the first missing setting.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.api_url.as_deref().is_none_or(str::is_empty) {
            return Err(GatewayError::Config(format!(
                "missing API base URL (set api_url or {ENV_PREFIX}API_URL)"
            )));
        }
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.is_empty());
        let has_pair = self.client_id.is_some() && self.client_secret.is_some();
        if !has_key && !has_pair {
            return Err(GatewayError::Config(format!(
                "missing credentials (set api_key / {ENV_PREFIX}API_KEY, or client_id and client_secret)"
            )));
        }
        Ok(())
    }
}
