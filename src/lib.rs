//! # IGDB Client Library
//!
//! Provides an authenticated client for the IGDB game catalog: acquires a
//! Twitch OAuth2 app access token via the client-credentials grant, keeps it
//! renewed in a background task, and memoizes game lookups in a TTL cache.
//!
//! Modules:
//! - `config` — client configuration and YAML loader
//! - `auth` — access token type, OAuth2 acquisition, refresh loop
//! - `cache` — TTL-bounded game details cache
//! - `client` — lifecycle controller and authenticated request gateway
//! - `games` — typed catalog records

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod games;
pub mod helpers;
pub mod tests;
pub mod utils;

pub use crate::client::{IgdbClient, RequestOptions};
pub use crate::config::settings::ClientConfig;
pub use crate::error::{Error, Result};
pub use crate::games::{Artwork, Game};
