//! HTTP handlers for the REST API.
//!
//! Each handler parses the request, resolves it into a service-layer call
//! and serializes the result. Enrichment is CPU-bound and the store is
//! synchronous, so the pipeline runs inside `spawn_blocking`.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use super::dto::{display_options_for, AvailabilityQuery, HealthResponse};
use super::error::AppError;
use super::state::AppState;
use crate::models::EventId;
use crate::services::{self, AvailabilityData};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Health check endpoint to verify the service is running. The event count
/// is best effort; a store failure degrades it to absent rather than
/// failing the check.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        events: state.store.event_count().ok(),
    }))
}

/// GET /v1/availability
///
/// The availability view: timeline, timeliness and volume datasets for the
/// requested window, mission and levels.
pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> HandlerResult<AvailabilityData> {
    let request = query
        .into_request(chrono::Utc::now())
        .map_err(AppError::BadRequest)?;

    let store = state.store.clone();
    let data = tokio::task::spawn_blocking(move || {
        services::availability_view(store.as_ref(), &request)
    })
    .await
    .map_err(|e| AppError::Internal(format!("task join error: {}", e)))??;

    Ok(Json(data))
}

/// GET /v1/availability/datatake/{planned_imaging_uuid}
///
/// The availability view restricted to one datatake: the window is the
/// planned imaging event's own interval.
pub async fn get_availability_by_datatake(
    State(state): State<AppState>,
    Path(planned_imaging_uuid): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> HandlerResult<AvailabilityData> {
    let options = display_options_for(query.view_content.as_deref());

    let store = state.store.clone();
    let data = tokio::task::spawn_blocking(move || {
        services::datatake_view(store.as_ref(), EventId(planned_imaging_uuid), options)
    })
    .await
    .map_err(|e| AppError::Internal(format!("task join error: {}", e)))??;

    Ok(Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, Interval};
    use crate::store::MemoryEventStore;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_reports_event_count() {
        let store = Arc::new(MemoryEventStore::new());
        let now = Utc::now();
        store.insert_event(Event {
            uuid: EventId::new(),
            gauge_name: "PLANNED_IMAGING".to_string(),
            interval: Interval::new(now - Duration::minutes(5), now),
            explicit_reference: None,
            values: vec![],
        });

        let state = AppState::new(store);
        let Json(response) = health_check(State(state)).await.unwrap();
        assert_eq!(response.status, "ok");
        assert_eq!(response.events, Some(1));
    }
}
