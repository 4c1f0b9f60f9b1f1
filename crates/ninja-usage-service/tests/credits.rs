//! Integration tests for the credit balance endpoint.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde_json::Value;

use common::{last_period, this_period, TestHarness};
use ninja_usage_core::Tier;

#[tokio::test]
async fn test_credits_requires_auth() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/api/user/credits")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_credits_for_new_user() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/user/credits")
        .add_header(AUTHORIZATION, harness.user_auth_header(Tier::Free))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["tier"], "free");
    assert_eq!(body["creditsRemaining"], 3);
    assert_eq!(body["isLowBalance"], false);
    assert_eq!(body["canPerformAction"], true);

    let start: DateTime<Utc> = body["periodStart"].as_str().unwrap().parse().unwrap();
    let end: DateTime<Utc> = body["periodEnd"].as_str().unwrap().parse().unwrap();
    assert_eq!(start.day(), 1);
    assert!(start < end);
}

#[tokio::test]
async fn test_credits_count_only_current_period() {
    let harness = TestHarness::new();

    harness.seed(Some(70), last_period()).await;
    harness.seed(Some(70), last_period()).await;
    harness.seed(Some(70), this_period(Duration::hours(1))).await;
    harness.seed(Some(70), this_period(Duration::hours(1))).await;

    let body: Value = harness
        .server
        .get("/api/user/credits")
        .add_header(AUTHORIZATION, harness.user_auth_header(Tier::Free))
        .await
        .json();

    assert_eq!(body["creditsRemaining"], 1);
    assert_eq!(body["isLowBalance"], true);
    assert_eq!(body["canPerformAction"], true);
}

#[tokio::test]
async fn test_credits_blocked_when_exhausted() {
    let harness = TestHarness::new();
    for _ in 0..3 {
        harness.seed(None, this_period(Duration::minutes(2))).await;
    }

    let body: Value = harness
        .server
        .get("/api/user/credits")
        .add_header(AUTHORIZATION, harness.user_auth_header(Tier::Free))
        .await
        .json();

    assert_eq!(body["creditsRemaining"], 0);
    assert_eq!(body["canPerformAction"], false);
}

#[tokio::test]
async fn test_credits_enterprise() {
    let harness = TestHarness::new();

    let body: Value = harness
        .server
        .get("/api/user/credits")
        .add_header(AUTHORIZATION, harness.user_auth_header(Tier::Enterprise))
        .await
        .json();

    assert_eq!(body["tier"], "enterprise");
    assert_eq!(body["creditsRemaining"], "unlimited");
    assert_eq!(body["canPerformAction"], true);
}

#[tokio::test]
async fn test_credits_ledger_failure() {
    let harness = TestHarness::new();
    harness.ledger.fail_fetches();

    harness
        .server
        .get("/api/user/credits")
        .add_header(AUTHORIZATION, harness.user_auth_header(Tier::Pro))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
