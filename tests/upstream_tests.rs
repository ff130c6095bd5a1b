use std::time::Duration;

use finance_dashboard::error::UpstreamError;
use finance_dashboard::upstream::{probe_reference, MovementsQuery, ReferenceClient};
use httpmock::{Method::GET, MockServer};
use serde_json::json;

fn client(server: &MockServer) -> ReferenceClient {
    ReferenceClient::new(server.base_url(), "sk-test", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_sends_query_and_credential() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/account_movements")
                .header("api-key-id", "sk-test")
                .query_param("page", "1")
                .query_param("limit", "15")
                .query_param("from_created_date", "2019-08-24")
                .query_param("until_created_date", "2019-08-24")
                .query_param("type", "credit")
                .query_param("withdrawal_id", "string")
                .query_param("reason", "withdrawal");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"count": 1, "results": [{"id": "mov-1"}]}));
        })
        .await;

    let body = client(&server)
        .fetch_movements(&MovementsQuery::default())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(body["results"][0]["id"], "mov-1");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/account_movements");
            then.status(401).body("invalid api key");
        })
        .await;

    let err = client(&server)
        .fetch_movements(&MovementsQuery::default())
        .await
        .unwrap_err();

    match err {
        UpstreamError::Status { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_probe_swallows_failures() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/account_movements");
            then.status(500);
        })
        .await;

    // must return normally
    probe_reference(&client(&server), &MovementsQuery::default()).await;
    mock.assert_async().await;
}

#[test]
fn test_missing_credential_variable() {
    let err = ReferenceClient::from_env(
        "http://localhost",
        "FINANCE_DASHBOARD_TEST_UNSET_CREDENTIAL",
        Duration::from_secs(1),
    )
    .err()
    .unwrap();
    assert!(matches!(err, UpstreamError::MissingCredential(name) if name == "FINANCE_DASHBOARD_TEST_UNSET_CREDENTIAL"));
}
