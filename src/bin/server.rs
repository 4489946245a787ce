//! DHUS Availability HTTP Server Binary
//!
//! Entry point for the availability dashboard REST API. It seeds the
//! in-memory event store with a small demo dataset, sets up the HTTP router
//! and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin dhus-server --features http-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use dhus_monitor::http::{create_router, AppState};
use dhus_monitor::models::{
    Annotation, AnnotationId, Event, EventId, EventValue, ExplicitReference, ExplicitReferenceId,
    Interval,
};
use dhus_monitor::store::{EventStore, MemoryEventStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting DHUS availability server");

    let store = Arc::new(MemoryEventStore::new());
    seed_demo_data(&store);
    info!("Seeded demo store with {} events", store.event_count()?);

    let state = AppState::new(store);
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed one datatake's worth of demo events: a planned imaging with three
/// completeness outcomes (complete, missing, unexpected) across two levels.
fn seed_demo_data(store: &MemoryEventStore) {
    let now = Utc::now();
    let plan_start = now - Duration::hours(2);
    let plan_stop = plan_start + Duration::minutes(8);

    let plan = Event {
        uuid: EventId::new(),
        gauge_name: "PLANNED_IMAGING".to_string(),
        interval: Interval::new(plan_start, plan_stop),
        explicit_reference: None,
        values: vec![EventValue::new("imaging_mode", "IW")],
    };
    let plan_id = plan.uuid;
    store.insert_event(plan);

    let mut insert_completeness = |level: &str, status: &str, offset_min: i64, linked: bool| {
        let start = plan_start + Duration::minutes(offset_min);
        let reference = (status != "MISSING").then(|| ExplicitReference {
            uuid: ExplicitReferenceId(Uuid::new_v4()),
            name: format!(
                "S1A_IW_{}__1SDV_{}",
                level,
                start.format("%Y%m%dT%H%M%S")
            ),
        });

        let event = Event {
            uuid: EventId::new(),
            gauge_name: format!("PLANNED_IMAGING_DHUS_PRODUCT_COMPLETENESS_{}", level),
            interval: Interval::new(start, start + Duration::minutes(4)),
            explicit_reference: reference.clone(),
            values: vec![
                EventValue::new("satellite", "S1A"),
                EventValue::new("orbit", "39000"),
                EventValue::new("status", status),
                EventValue::new("datatake_id", "45000"),
            ],
        };
        let event_id = event.uuid;
        store.insert_event(event);
        if linked {
            store.link_events(event_id, "PLANNED_IMAGING", plan_id);
        }

        if let Some(reference) = reference {
            store.attach_annotation(
                reference.uuid,
                Annotation {
                    uuid: AnnotationId(Uuid::new_v4()),
                    name: "DHUS_PUBLICATION_TIME".to_string(),
                    values: vec![EventValue::new(
                        "dhus_publication_time",
                        (plan_stop + Duration::minutes(25)).to_rfc3339(),
                    )],
                },
            );
            store.attach_annotation(
                reference.uuid,
                Annotation {
                    uuid: AnnotationId(Uuid::new_v4()),
                    name: "DHUS_METADATA_INFORMATION".to_string(),
                    values: vec![EventValue::new("size", "4100000000")],
                },
            );
        }
    };

    insert_completeness("L0", "COMPLETE", 0, true);
    insert_completeness("L0", "MISSING", 4, true);
    insert_completeness("L1_SLC", "COMPLETE", 0, true);
    insert_completeness("L1_SLC", "UNEXPECTED", 4, false);
}
