use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::games::Game;
use crate::helpers::time::now_i64;

/// Cached lookup result with its storage time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub stored_at: i64, // UNIX timestamp
    pub game: Game,
}

/// TTL-bounded game details cache, keyed by normalized query text.
///
/// The lock guards only the map. Network calls for misses run unlocked, so
/// two concurrent misses for one key may both fetch; the later write wins.
#[derive(Debug)]
pub struct GameCache {
    inner: Mutex<HashMap<String, CacheEntry>>,
    ttl_seconds: i64,
}

impl GameCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl_seconds: ttl_seconds as i64,
        }
    }

    /// Case-folded, whitespace-trimmed cache key.
    pub fn normalize_key(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// Entry for `key` if present and younger than the TTL.
    pub async fn get(&self, key: &str) -> Option<Game> {
        let map = self.inner.lock().await;
        map.get(key)
            .filter(|entry| now_i64() - entry.stored_at < self.ttl_seconds)
            .map(|entry| entry.game.clone())
    }

    /// Store `game` under `key`, overwriting any previous entry.
    pub async fn insert(&self, key: String, game: Game) {
        let mut map = self.inner.lock().await;
        map.insert(
            key,
            CacheEntry {
                stored_at: now_i64(),
                game,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}
