//! # DHUS Availability Monitor
//!
//! Data-binding backend for the DHUS product availability dashboard.
//!
//! This crate joins product completeness events (did an expected satellite
//! product reach the DHUS pick-up point, and how well did it match the plan?)
//! against their originating planned imaging events and the annotations
//! attached to the published products, and produces the three datasets the
//! dashboard widgets consume:
//!
//! - a **timeline** of completeness intervals per satellite and level,
//! - a **timeliness** scatter series (publication delay per product, per level),
//! - a **cumulative volume** series (running total of published GB, per level).
//!
//! Each emitted item carries a pre-rendered HTML tooltip and the event UUID as
//! a stable deep-link target.
//!
//! ## Architecture
//!
//! - [`models`]: event, interval and status types shared across the crate
//! - [`store`]: read-only query boundary to the event/annotation store, with
//!   an in-memory implementation for tests and local development
//! - [`services`]: the enrich/aggregate pipeline (record enricher, series
//!   builder, tooltip formatter, view orchestration)
//! - [`http`]: axum-based REST surface serving the datasets as JSON

pub mod models;

pub mod store;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
