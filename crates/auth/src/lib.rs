//! Bearer token acquisition for the GigaChat gateway.
//!
//! [`gigachat`] implements the client-credentials exchange; [`TokenCache`]
//! holds the resulting credential and decides when to exchange again.

pub mod cache;
pub mod gigachat;
pub mod key;

pub use cache::TokenCache;
pub use key::AuthKey;
