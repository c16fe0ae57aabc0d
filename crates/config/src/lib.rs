//! Configuration loading for gigagate.
//!
//! Uses figment to layer built-in defaults, an optional YAML file, and
//! `GIGACHAT_*` environment variables.

pub mod schema;

pub use schema::{Config, ENV_PREFIX, LogConfig, RefreshMode};
