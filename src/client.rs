use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use http::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use http::Method;
use reqwest::{Client, Response};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::manager::TokenManager;
use crate::cache::game_cache::GameCache;
use crate::config::settings::ClientConfig;
use crate::error::{Error, Result};
use crate::games::Game;

const CLIENT_ID_HEADER: HeaderName = HeaderName::from_static("client-id");

/// Field list requested from the catalog for a details lookup.
const GAME_FIELDS: &str = "artworks.url,cover.url,name,storyline,summary,url";

/// Optional per-request overrides for [`IgdbClient::request`].
///
/// Caller-supplied `Client-ID` / `Authorization` headers take precedence
/// over the client's own.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub headers: Option<HeaderMap>,
    pub body: Option<String>,
}

struct RefreshTask {
    handle: JoinHandle<()>,
    cancel: watch::Sender<bool>,
}

/// Authenticated IGDB catalog client.
///
/// One owned instance per process area of use; construct it, `start` it
/// with the app's identifier and secret, share it by reference, `close` it
/// on shutdown.
pub struct IgdbClient {
    config: ClientConfig,
    tokens: TokenManager,
    cache: GameCache,
    session: RwLock<Option<Client>>,
    refresh_task: Mutex<Option<RefreshTask>>,
    ready: AtomicBool,
    closed: AtomicBool,
}

impl IgdbClient {
    pub fn new(config: ClientConfig) -> Self {
        let tokens = TokenManager::new(
            config.token_url.clone(),
            Duration::from_secs(config.min_refresh_interval_seconds),
        );
        let cache = GameCache::new(config.cache_ttl_seconds);
        Self {
            config,
            tokens,
            cache,
            session: RwLock::new(None),
            refresh_task: Mutex::new(None),
            ready: AtomicBool::new(false),
            closed: AtomicBool::new(true),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ClientConfig::default())
    }

    /// Open the network session, acquire the first access token and launch
    /// the refresh loop. Fails if that first acquisition fails; the session
    /// stays open in that case and `close` cleans it up.
    ///
    /// Not guarded against double starts: a second call replaces the
    /// session and spawns a second refresh loop. Call `close` first.
    pub async fn start(&self, client_id: &str, client_secret: &str) -> Result<()> {
        self.closed.store(false, Ordering::SeqCst);
        self.tokens.set_credentials(client_id, client_secret).await;

        let session = build_session(&self.config)?;
        {
            let mut guard = self.session.write().await;
            *guard = Some(session.clone());
        }

        self.tokens.refresh(&session).await?;

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(self.tokens.clone().run_refresh_loop(session, cancel_rx));
        {
            let mut guard = self.refresh_task.lock().await;
            *guard = Some(RefreshTask {
                handle,
                cancel: cancel_tx,
            });
        }

        self.ready.store(true, Ordering::SeqCst);
        info!("catalog client started");
        Ok(())
    }

    /// Cancel the refresh loop and drop the session. The not-ready flags
    /// flip before teardown so concurrent callers stop using the instance
    /// immediately. Safe to call repeatedly.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.ready.store(false, Ordering::SeqCst);

        let task = {
            let mut guard = self.refresh_task.lock().await;
            guard.take()
        };
        if let Some(task) = task {
            let _ = task.cancel.send(true);
            if let Err(e) = task.handle.await {
                warn!("refresh task did not shut down cleanly: {e}");
            }
        }

        let mut guard = self.session.write().await;
        *guard = None;
        info!("catalog client closed");
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Issue an authenticated request against the catalog API.
    ///
    /// Preconditions are checked here, at request time: an open session and
    /// a currently valid access token. The raw response comes back for the
    /// caller to interpret; no status handling happens in the gateway.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let session = {
            let guard = self.session.read().await;
            guard.clone().ok_or(Error::NotInitialized)?
        };
        let token = self.tokens.bearer().await.ok_or(Error::NoValidToken)?;

        let mut headers = options.headers.unwrap_or_default();
        if !headers.contains_key(&CLIENT_ID_HEADER) {
            let client_id = self
                .tokens
                .client_id()
                .await
                .ok_or_else(|| Error::Config("missing client identifier or secret".into()))?;
            let value = HeaderValue::from_str(&client_id)
                .map_err(|e| Error::Config(format!("client identifier is not a valid header: {e}")))?;
            headers.insert(CLIENT_ID_HEADER, value);
        }
        if !headers.contains_key(AUTHORIZATION) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.value))
                .map_err(|e| Error::Config(format!("access token is not a valid header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let url = format!("{}{}", self.config.api_base_url, path);
        let mut request = session.request(method, &url).headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        Ok(request.send().await?)
    }

    /// Best-match details for `game_name`, served from the cache when a
    /// fresh entry exists. Failures are never cached.
    pub async fn get_game_details(&self, game_name: &str) -> Result<Game> {
        let cache_key = GameCache::normalize_key(game_name);
        if let Some(game) = self.cache.get(&cache_key).await {
            debug!("using cached catalog details for game '{game_name}'");
            return Ok(game);
        }

        let query = format!("search \"{game_name}\"; limit 1; fields {GAME_FIELDS};");
        let response = self
            .request(
                Method::POST,
                "/games",
                RequestOptions {
                    body: Some(query),
                    ..Default::default()
                },
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Protocol {
                status: status.as_u16(),
                message: format!("details request for game '{game_name}' failed"),
            });
        }

        let body = response.text().await?;
        let records: Vec<Game> = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("details for game '{game_name}': {e}")))?;
        let game = records
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("no details found for game '{game_name}'")))?;

        self.cache.insert(cache_key, game.clone()).await;
        info!("fetched catalog details for game '{game_name}'");
        Ok(game)
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &GameCache {
        &self.cache
    }

    #[cfg(test)]
    pub(crate) fn tokens(&self) -> &TokenManager {
        &self.tokens
    }
}

fn build_session(config: &ClientConfig) -> Result<Client> {
    let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_seconds));

    if let Some(proxy_cfg) = &config.proxy {
        let mut proxy = reqwest::Proxy::all(&proxy_cfg.url)?;
        if let (Some(user), Some(password)) = (&proxy_cfg.username, &proxy_cfg.password) {
            proxy = proxy.basic_auth(user, password);
        }
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(Error::from)
}
