#[cfg(test)]
mod test {
    use std::time::Duration;

    use httpmock::{Method::POST, MockServer};
    use serde_json::json;
    use tokio::time::sleep;

    use crate::client::IgdbClient;
    use crate::error::Error;
    use crate::tests::common::{
        halo_record, mock_games_endpoint, mock_token_endpoint, started_client, test_config,
        TEST_CLIENT_ID, TEST_CLIENT_SECRET,
    };

    #[tokio::test]
    async fn lookup_sends_the_query_and_returns_the_first_record() {
        let server = MockServer::start_async().await;
        let _token = mock_token_endpoint(&server, "token-abc", 3600);
        let games = server.mock(|when, then| {
            when.method(POST)
                .path("/v4/games")
                .header("Client-ID", TEST_CLIENT_ID)
                .header("Authorization", "Bearer token-abc")
                .body(
                    "search \"Halo\"; limit 1; \
                     fields artworks.url,cover.url,name,storyline,summary,url;",
                );
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([halo_record()]));
        });

        let client = started_client(&server).await;
        let game = client.get_game_details("Halo").await.expect("details");

        assert_eq!(game.id, 740);
        assert_eq!(game.name, "Halo: Combat Evolved");
        assert_eq!(games.calls(), 1);
        client.close().await;
    }

    #[tokio::test]
    async fn second_lookup_within_ttl_is_served_from_the_cache() {
        let server = MockServer::start_async().await;
        let _token = mock_token_endpoint(&server, "token-abc", 3600);
        let games = mock_games_endpoint(&server, json!([halo_record()]));

        let client = started_client(&server).await;

        let first = client.get_game_details("Halo").await.expect("first lookup");
        // same key after trimming and case folding
        let second = client
            .get_game_details("  HALO  ")
            .await
            .expect("cached lookup");

        assert_eq!(first, second);
        assert_eq!(games.calls(), 1, "cache hit must not reach the network");
        client.close().await;
    }

    #[tokio::test]
    async fn expired_entry_triggers_exactly_one_refetch() {
        let server = MockServer::start_async().await;
        let _token = mock_token_endpoint(&server, "token-abc", 3600);
        let games = mock_games_endpoint(&server, json!([halo_record()]));

        let mut config = test_config(&server);
        config.cache_ttl_seconds = 1;
        let client = IgdbClient::new(config);
        client
            .start(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
            .await
            .expect("client start");

        client.get_game_details("Halo").await.expect("first lookup");
        sleep(Duration::from_secs(2)).await;
        client.get_game_details("Halo").await.expect("refetch");

        assert_eq!(games.calls(), 2);
        assert_eq!(client.cache().len().await, 1, "refetch overwrites the entry");
        client.close().await;
    }

    #[tokio::test]
    async fn empty_result_array_is_not_found_and_never_cached() {
        let server = MockServer::start_async().await;
        let _token = mock_token_endpoint(&server, "token-abc", 3600);
        let games = mock_games_endpoint(&server, json!([]));

        let client = started_client(&server).await;

        let err = client.get_game_details("Nonexistent").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)), "got: {err}");

        // a failure is not memoized; the next call fetches again
        let err = client.get_game_details("Nonexistent").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)), "got: {err}");
        assert_eq!(games.calls(), 2);
        assert_eq!(client.cache().len().await, 0);
        client.close().await;
    }

    #[tokio::test]
    async fn non_success_status_is_a_protocol_error() {
        let server = MockServer::start_async().await;
        let _token = mock_token_endpoint(&server, "token-abc", 3600);
        let _games = server.mock(|when, then| {
            when.method(POST).path("/v4/games");
            then.status(500).body("internal error");
        });

        let client = started_client(&server).await;

        let err = client.get_game_details("Halo").await.unwrap_err();
        match err {
            Error::Protocol { status, .. } => assert_eq!(status, 500),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(client.cache().len().await, 0);
        client.close().await;
    }

    #[tokio::test]
    async fn undecodable_body_is_a_parse_error() {
        let server = MockServer::start_async().await;
        let _token = mock_token_endpoint(&server, "token-abc", 3600);
        let _games = server.mock(|when, then| {
            when.method(POST).path("/v4/games");
            then.status(200).body("<html>definitely not records</html>");
        });

        let client = started_client(&server).await;

        let err = client.get_game_details("Halo").await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got: {err}");
        assert_eq!(client.cache().len().await, 0);
        client.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_misses_converge_to_a_single_entry() {
        let server = MockServer::start_async().await;
        let _token = mock_token_endpoint(&server, "token-abc", 3600);
        let games = mock_games_endpoint(&server, json!([halo_record()]));

        let client = started_client(&server).await;

        // both callers miss; the lock is not held across the network call,
        // so one or two fetches may happen
        let (first, second) = tokio::join!(
            client.get_game_details("Halo"),
            client.get_game_details("  halo ")
        );
        let first = first.expect("concurrent lookup");
        let second = second.expect("concurrent lookup");

        assert_eq!(first, second);
        let calls = games.calls();
        assert!((1..=2).contains(&calls), "got {calls} catalog calls");
        assert_eq!(client.cache().len().await, 1, "last write wins on one key");
        client.close().await;
    }
}
