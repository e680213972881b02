// tests/common/mod.rs
pub use httpmock::{Method::POST, Mock, MockServer};
pub use serde_json::json;

use serde_json::Value;

use crate::client::IgdbClient;
use crate::config::settings::ClientConfig;

pub const TEST_CLIENT_ID: &str = "test-client-id";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";

/// Client config pointing both endpoints at the given mock server.
pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        timeout_seconds: 5,
        token_url: server.url("/oauth2/token"),
        api_base_url: server.url("/v4"),
        ..Default::default()
    }
}

/// Exact client-credentials form body the client sends for `client_id`.
pub fn token_form_body(client_id: &str, client_secret: &str) -> String {
    format!("client_id={client_id}&client_secret={client_secret}&grant_type=client_credentials")
}

pub fn mock_token_endpoint<'a>(server: &'a MockServer, token: &str, expires_in: i64) -> Mock<'a> {
    let body = json!({
        "access_token": token,
        "expires_in": expires_in,
        "token_type": "bearer"
    });
    server.mock(|when, then| {
        when.method(POST).path("/oauth2/token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    })
}

pub fn mock_token_endpoint_error<'a>(
    server: &'a MockServer,
    status: u16,
    message: &str,
) -> Mock<'a> {
    let body = json!({ "status": status, "message": message });
    server.mock(|when, then| {
        when.method(POST).path("/oauth2/token");
        then.status(status)
            .header("Content-Type", "application/json")
            .json_body(body);
    })
}

pub fn mock_games_endpoint<'a>(server: &'a MockServer, records: Value) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(POST).path("/v4/games");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(records);
    })
}

pub fn halo_record() -> Value {
    json!({
        "id": 740,
        "name": "Halo: Combat Evolved",
        "summary": "Bent on humankind's extermination, a powerful fellowship of alien races known as the Covenant is wiping out Earth's fledgling interstellar empire.",
        "url": "https://www.igdb.com/games/halo-combat-evolved",
        "cover": {
            "id": 85858,
            "url": "//images.igdb.com/igdb/image/upload/t_thumb/co1tmu.jpg"
        },
        "artworks": [
            { "id": 605, "url": "//images.igdb.com/igdb/image/upload/t_thumb/ar605.jpg" }
        ]
    })
}

/// Construct and start a client against the mock server. A token endpoint
/// mock must already be registered.
pub async fn started_client(server: &MockServer) -> IgdbClient {
    let client = IgdbClient::new(test_config(server));
    client
        .start(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
        .await
        .expect("client start");
    client
}
