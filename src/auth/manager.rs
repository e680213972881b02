use std::cmp;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::{watch, RwLock};
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::auth::oauth2::fetch_app_access_token;
use crate::auth::token::AccessToken;
use crate::error::{Error, Result};

/// Floor for the refresh loop's sleep, also the fallback token lifetime.
/// Keeps a zero/negative `expires_in` from turning into a tight retry loop.
pub const MIN_REFRESH_INTERVAL_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
struct Credentials {
    client_id: String,
    client_secret: String,
}

/// Owns the access token and its renewal.
///
/// The token slot is shared with the request gateway; writes replace the
/// whole `AccessToken`, so a reader never sees a half-updated credential.
#[derive(Debug, Clone)]
pub struct TokenManager {
    token_url: String,
    min_refresh_interval: Duration,
    credentials: Arc<RwLock<Option<Credentials>>>,
    token: Arc<RwLock<Option<AccessToken>>>,
}

impl TokenManager {
    pub fn new(token_url: String, min_refresh_interval: Duration) -> Self {
        Self {
            token_url,
            min_refresh_interval,
            credentials: Arc::new(RwLock::new(None)),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_credentials(&self, client_id: &str, client_secret: &str) {
        let mut guard = self.credentials.write().await;
        *guard = Some(Credentials {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        });
    }

    pub async fn client_id(&self) -> Option<String> {
        self.credentials
            .read()
            .await
            .as_ref()
            .map(|c| c.client_id.clone())
    }

    /// One-shot token renewal. Errors propagate to the caller; the previous
    /// token stays in place until it expires on its own.
    pub async fn refresh(&self, session: &Client) -> Result<()> {
        let credentials = {
            let guard = self.credentials.read().await;
            guard.clone()
        };
        let credentials = match credentials {
            Some(c) if !c.client_id.is_empty() && !c.client_secret.is_empty() => c,
            _ => return Err(Error::Config("missing client identifier or secret".into())),
        };

        debug!("refreshing app access token");
        let token = fetch_app_access_token(
            session,
            &self.token_url,
            &credentials.client_id,
            &credentials.client_secret,
        )
        .await?;

        let expires_in = token.time_until_expiry().as_secs();
        let prefix: String = token.value.chars().take(8).collect();
        info!("fetched new app access token (prefix: {prefix}), expires in {expires_in} seconds");

        let mut guard = self.token.write().await;
        *guard = Some(token);
        Ok(())
    }

    /// Current token, only while it is still valid.
    pub async fn bearer(&self) -> Option<AccessToken> {
        let guard = self.token.read().await;
        guard.clone().filter(|t| t.is_valid())
    }

    pub async fn time_until_expiry(&self) -> Duration {
        let guard = self.token.read().await;
        guard
            .as_ref()
            .map(|t| t.time_until_expiry())
            .unwrap_or(Duration::ZERO)
    }

    /// Background renewal loop. Sleeps until the current token is about to
    /// expire (never less than the minimum interval), then refreshes.
    /// Renewal failures are logged and retried on the next cycle; the
    /// cancellation signal is observed at the sleep point.
    pub async fn run_refresh_loop(self, session: Client, mut cancel: watch::Receiver<bool>) {
        loop {
            let sleep_for = {
                let guard = self.token.read().await;
                match guard.as_ref() {
                    Some(token) if token.expires_at > 0 => {
                        cmp::max(self.min_refresh_interval, token.time_until_expiry())
                    }
                    _ => self.min_refresh_interval,
                }
            };

            tokio::select! {
                _ = cancel.changed() => {
                    debug!("access token refresh loop cancelled");
                    break;
                }
                _ = sleep(sleep_for) => {
                    if let Err(e) = self.refresh(&session).await {
                        error!("error in access token refresh loop: {e}");
                    }
                }
            }
        }
    }
}
