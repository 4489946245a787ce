//! Read-only query boundary to the event/annotation store.
//!
//! The dashboard never writes: every request materializes a set of events and
//! annotations, binds them into datasets and discards them. The [`EventStore`]
//! trait models the store's query API; [`memory::MemoryEventStore`] is the
//! in-memory implementation used by tests and local development.
//!
//! Absence of optional data (a missing link, an empty annotation chain step)
//! is `Ok(None)` / an empty collection, never an error. Errors are reserved
//! for the store itself failing.

pub mod error;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryEventStore;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{Annotation, AnnotationId, Event, EventId, ExplicitReferenceId};

/// Filter for the completeness event query.
///
/// Matches events whose interval overlaps `[start, stop]`, whose gauge name
/// starts with `gauge_prefix` (optionally narrowed to one level suffix) and
/// whose `satellite` value starts with `mission`. Results are returned in
/// ascending start order, which the series builder relies on for the
/// cumulative volume curve.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub start: Option<DateTime<Utc>>,
    pub stop: Option<DateTime<Utc>>,
    pub gauge_prefix: Option<String>,
    /// Level suffix appended to the gauge prefix (e.g. `L1_SLC`).
    pub level: Option<String>,
    /// Satellite prefix filter (e.g. `S1_` matches S1A and S1B).
    pub mission: Option<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

/// Selector for grouped attribute lookups: collect values whose name matches
/// any of `names`, under the `group` key of the result map.
#[derive(Debug, Clone)]
pub struct AttributeSelector {
    pub group: &'static str,
    pub names: &'static [&'static str],
}

impl AttributeSelector {
    pub const fn new(group: &'static str, names: &'static [&'static str]) -> Self {
        Self { group, names }
    }
}

/// Selector for annotation lookups: collect annotations of kind `name` under
/// the `group` key of the result map.
#[derive(Debug, Clone)]
pub struct AnnotationSelector {
    pub group: &'static str,
    pub name: &'static str,
}

impl AnnotationSelector {
    pub const fn new(group: &'static str, name: &'static str) -> Self {
        Self { group, name }
    }
}

/// Grouped attribute values: selector group name to list of raw values.
pub type ValueMap = HashMap<String, Vec<String>>;

/// Grouped annotation handles: selector group name to annotation instances.
pub type AnnotationGroupMap = HashMap<String, Vec<AnnotationId>>;

/// Read-only query capability over the event/annotation store.
///
/// Implementations must be `Send + Sync`; the HTTP layer shares one instance
/// across handlers. All calls are synchronous: the enrichment pipeline is
/// CPU-bound per request and runs inside `spawn_blocking` when serving HTTP.
pub trait EventStore: Send + Sync {
    /// Query completeness events matching `filter`, sorted by ascending
    /// start time.
    fn completeness_events(&self, filter: &EventFilter) -> StoreResult<Vec<Event>>;

    /// Fetch a single event by UUID.
    fn event(&self, uuid: EventId) -> StoreResult<Option<Event>>;

    /// Resolve the event linked to `event` under `link_name` (e.g. the
    /// `PLANNED_IMAGING` "generated by plan" relation). A completeness event
    /// may legitimately have no linked plan.
    fn linked_event(&self, event: EventId, link_name: &str) -> StoreResult<Option<Event>>;

    /// Grouped attribute lookup on an event's values. Groups with no match
    /// are present with an empty list; the caller decides whether that is a
    /// data-integrity fault.
    fn attribute_values(
        &self,
        event: EventId,
        selectors: &[AttributeSelector],
    ) -> StoreResult<ValueMap>;

    /// Grouped annotation lookup on an explicit reference.
    fn annotation_groups(
        &self,
        reference: ExplicitReferenceId,
        selectors: &[AnnotationSelector],
    ) -> StoreResult<AnnotationGroupMap>;

    /// Materialize one annotation instance.
    fn annotation(&self, uuid: AnnotationId) -> StoreResult<Option<Annotation>>;

    /// Coarse count of events currently queryable. Surfaced by the health
    /// endpoint as a liveness detail, not part of the view pipeline.
    fn event_count(&self) -> StoreResult<usize>;
}
