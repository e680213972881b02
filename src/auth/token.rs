use std::time::Duration;

use crate::helpers::time::now_i64;

/// App access token with its computed absolute expiration.
///
/// Replaced wholesale on every refresh; readers always observe a complete
/// value/expiry pair.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: i64, // UNIX timestamp
}

impl AccessToken {
    pub fn new(value: String, expires_at: i64) -> Self {
        Self { value, expires_at }
    }

    pub fn is_valid(&self) -> bool {
        !self.value.is_empty() && now_i64() < self.expires_at
    }

    pub fn time_until_expiry(&self) -> Duration {
        Duration::from_secs(self.expires_at.saturating_sub(now_i64()).max(0) as u64)
    }
}
