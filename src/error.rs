use thiserror::Error;

/// Failure classes surfaced by the client.
///
/// Callers match on the variant to tell "no such item" (`NotFound`) apart
/// from "service malfunction" (`Protocol`, `Transport`) and from their own
/// misuse (`Config`, `NotInitialized`, `NoValidToken`).
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or unusable client configuration (identifier, secret, URLs).
    #[error("configuration error: {0}")]
    Config(String),

    /// Network-level failure, including per-call timeouts.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Protocol { status: u16, message: String },

    /// The remote answered 2xx but the body did not match the expected shape.
    #[error("parse failed: {0}")]
    Parse(String),

    /// The query matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// `request()` was called before `start()` opened a session.
    #[error("client session not initialized")]
    NotInitialized,

    /// No access token is stored, or the stored one is past its expiry.
    #[error("no valid access token")]
    NoValidToken,
}

pub type Result<T> = std::result::Result<T, Error>;
