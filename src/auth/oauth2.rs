use reqwest::Client;
use serde::Deserialize;

use crate::auth::manager::MIN_REFRESH_INTERVAL_SECONDS;
use crate::auth::token::AccessToken;
use crate::error::{Error, Result};
use crate::helpers::time::now_i64;

/// Successful token endpoint body.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Error body shape used by the identity provider on non-success statuses.
#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Fetch an app access token via the OAuth2 client-credentials grant.
///
/// The provider occasionally omits `expires_in`; the token then gets the
/// minimum refresh interval as its lifetime so the loop re-checks soon.
pub async fn fetch_app_access_token(
    session: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AccessToken> {
    let form = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("grant_type", "client_credentials"),
    ];

    let response = session.post(token_url).form(&form).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<TokenErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or(body);
        return Err(Error::Protocol {
            status: status.as_u16(),
            message,
        });
    }

    let parsed: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| Error::Parse(format!("token endpoint response: {e}")))?;

    let value = match parsed.access_token {
        Some(token) if !token.is_empty() => token,
        _ => {
            return Err(Error::Parse(
                "token endpoint response carried no access_token".into(),
            ))
        }
    };

    let expires_in = parsed
        .expires_in
        .unwrap_or(MIN_REFRESH_INTERVAL_SECONDS as i64)
        .max(0);

    Ok(AccessToken::new(value, now_i64() + expires_in))
}
