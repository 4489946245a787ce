//! HTTP server module for the availability dashboard.
//!
//! An axum-based REST surface over the service layer: the three datasets are
//! served as one JSON payload per request, ready for direct consumption by
//! the charting widgets. The store stays behind the [`crate::store::EventStore`]
//! trait, so any backend can be plugged into [`state::AppState`].

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
