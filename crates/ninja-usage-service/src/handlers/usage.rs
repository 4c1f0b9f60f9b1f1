//! Usage event ingestion.
//!
//! The analysis workflow records each billable action here after it runs.
//! Events are append-only; resubmitting an event ID is rejected with 409.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ninja_usage_core::{EventId, UsageEvent, UsageKind, UserId};

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Usage event request from services.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUsageRequest {
    /// Event ID for idempotency (ULID). Generated when omitted.
    pub event_id: Option<String>,
    /// User who performed the action.
    pub user_id: String,
    /// Kind of action (default: "analysis").
    pub kind: Option<String>,
    /// Score produced by the action.
    pub score_value: Option<u32>,
    /// When the action happened (default: now).
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Usage response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUsageResponse {
    /// ID of the recorded event.
    pub event_id: String,
    /// Whether the event was recorded.
    pub recorded: bool,
}

/// Record a single usage event.
pub async fn record_usage(
    State(state): State<Arc<AppState>>,
    auth: ServiceAuth,
    body: Result<Json<RecordUsageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordUsageResponse>), ApiError> {
    let Json(body) = body?;
    let event = build_event(body)?;

    tracing::debug!(
        service = %auth.service_name,
        event_id = %event.id,
        user_id = %event.user_id,
        "Processing usage event"
    );

    state.ledger.append_event(&event).await.map_err(|e| {
        tracing::warn!(
            service = %auth.service_name,
            event_id = %event.id,
            error = %e,
            "Failed to record usage event"
        );
        ApiError::from(e)
    })?;

    tracing::info!(
        service = %auth.service_name,
        event_id = %event.id,
        user_id = %event.user_id,
        kind = %event.kind,
        "Usage recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(RecordUsageResponse {
            event_id: event.id.to_string(),
            recorded: true,
        }),
    ))
}

/// Validate a request and turn it into a ledger event.
fn build_event(body: RecordUsageRequest) -> Result<UsageEvent, ApiError> {
    let user_id: UserId = body
        .user_id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid user ID".into()))?;

    let id = body
        .event_id
        .as_deref()
        .map(str::parse::<EventId>)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid event ID".into()))?
        .unwrap_or_else(EventId::generate);

    let kind: UsageKind = body
        .kind
        .as_deref()
        .map_or(Ok(UsageKind::Analysis), str::parse)?;

    let mut event = UsageEvent::new(user_id, kind, body.score_value).with_id(id);
    if let Some(occurred_at) = body.occurred_at {
        event = event.with_occurred_at(occurred_at);
    }
    event.validate()?;

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_id: &str) -> RecordUsageRequest {
        RecordUsageRequest {
            event_id: None,
            user_id: user_id.to_string(),
            kind: None,
            score_value: Some(88),
            occurred_at: None,
        }
    }

    #[test]
    fn defaults_are_filled_in() {
        let user_id = UserId::generate();
        let event = build_event(request(&user_id.to_string())).unwrap();

        assert_eq!(event.user_id, user_id);
        assert_eq!(event.kind, UsageKind::Analysis);
        assert_eq!(event.score_value, Some(88));
    }

    #[test]
    fn supplied_event_id_is_kept() {
        let id = EventId::generate();
        let mut body = request(&UserId::generate().to_string());
        body.event_id = Some(id.to_string());

        assert_eq!(build_event(body).unwrap().id, id);
    }

    #[test]
    fn invalid_input_is_bad_request() {
        assert!(matches!(
            build_event(request("nope")),
            Err(ApiError::BadRequest(_))
        ));

        let mut body = request(&UserId::generate().to_string());
        body.score_value = Some(250);
        assert!(matches!(build_event(body), Err(ApiError::BadRequest(_))));

        let mut body = request(&UserId::generate().to_string());
        body.kind = Some(String::new());
        assert!(matches!(build_event(body), Err(ApiError::BadRequest(_))));

        let mut body = request(&UserId::generate().to_string());
        body.event_id = Some("not-a-ulid".into());
        assert!(matches!(build_event(body), Err(ApiError::BadRequest(_))));
    }
}
