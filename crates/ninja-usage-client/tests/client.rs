//! Client tests against a mocked usage service.

use ninja_usage_client::{
    ClientError, ClientOptions, Credits, NinjaUsageClient, RecordUsageRequest, Tier,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: &str = "0b6f5d2e-8c1a-4f3b-9d7e-2a4c6e8f0b1d";

async fn client_for(server: &MockServer) -> NinjaUsageClient {
    NinjaUsageClient::with_options(
        server.uri(),
        "svc-key",
        ClientOptions::with_service_name("resume-analyzer"),
    )
    .unwrap()
}

#[tokio::test]
async fn report_usage_sends_service_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/usage/events"))
        .and(header("x-api-key", "svc-key"))
        .and(header("x-service-name", "resume-analyzer"))
        .and(body_json(json!({ "userId": USER_ID, "scoreValue": 87 })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "eventId": "01J9Z3Q8K2M4N6P8R0T2V4X6Z8", "recorded": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .await
        .report_usage(RecordUsageRequest::analysis(USER_ID, Some(87)))
        .await
        .unwrap();

    assert!(response.recorded);
    assert_eq!(response.event_id, "01J9Z3Q8K2M4N6P8R0T2V4X6Z8");
}

#[tokio::test]
async fn duplicate_event_carries_event_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/usage/events"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "Event already recorded" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .report_usage(
            RecordUsageRequest::analysis(USER_ID, None).with_event_id("01J9Z3Q8K2M4N6P8R0T2V4X6Z8"),
        )
        .await
        .unwrap_err();

    match err {
        ClientError::DuplicateEvent { event_id } => {
            assert_eq!(event_id, "01J9Z3Q8K2M4N6P8R0T2V4X6Z8");
        }
        other => panic!("expected DuplicateEvent, got {other:?}"),
    }
}

#[tokio::test]
async fn get_stats_forwards_user_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/stats"))
        .and(header("authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalEvents": 5,
            "eventsThisPeriod": 2,
            "creditsRemaining": 1,
            "isLowBalance": true,
            "averageScore": null
        })))
        .mount(&server)
        .await;

    let stats = client_for(&server).await.get_stats("user-jwt").await.unwrap();

    assert_eq!(stats.total_events, 5);
    assert_eq!(stats.events_this_period, 2);
    assert_eq!(stats.credits_remaining, Credits::Limited(1));
    assert!(stats.is_low_balance);
    assert_eq!(stats.average_score, None);
}

#[tokio::test]
async fn get_credits_parses_unlimited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tier": "enterprise",
            "creditsRemaining": "unlimited",
            "isLowBalance": false,
            "canPerformAction": true,
            "periodStart": "2026-10-01T00:00:00Z",
            "periodEnd": "2026-11-01T00:00:00Z"
        })))
        .mount(&server)
        .await;

    let credits = client_for(&server).await.get_credits("user-jwt").await.unwrap();

    assert_eq!(credits.tier, Tier::Enterprise);
    assert_eq!(credits.credits_remaining, Credits::Unlimited);
    assert!(credits.can_perform_action);
    assert!(credits.period_start < credits.period_end);
}

#[tokio::test]
async fn unauthorized_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/stats"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
        .mount(&server)
        .await;

    let err = client_for(&server).await.get_stats("expired").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn server_error_keeps_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/credits"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Internal server error" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).await.get_credits("user-jwt").await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal server error");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/stats"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.get_stats("user-jwt").await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 502);
            assert!(message.contains("502"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
