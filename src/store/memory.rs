//! In-memory event store for unit testing and local development.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::models::{Annotation, AnnotationId, Event, EventId, ExplicitReferenceId};

use super::error::{StoreError, StoreResult};
use super::{AnnotationGroupMap, AnnotationSelector, AttributeSelector, EventFilter, EventStore, ValueMap};

#[derive(Default)]
struct StoreInner {
    events: HashMap<EventId, Event>,
    /// (source event, link name) -> linked event.
    links: HashMap<(EventId, String), EventId>,
    annotations: HashMap<AnnotationId, Annotation>,
    annotations_by_reference: HashMap<ExplicitReferenceId, Vec<AnnotationId>>,
}

/// In-memory implementation of [`EventStore`].
///
/// Events, links and annotations are held in UUID-keyed maps behind a
/// `RwLock`; queries take a read lock, seeding takes a write lock. Intended
/// for tests and the demo server, not as a production store.
#[derive(Default)]
pub struct MemoryEventStore {
    inner: RwLock<StoreInner>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, replacing any previous event with the same UUID.
    pub fn insert_event(&self, event: Event) {
        self.inner.write().events.insert(event.uuid, event);
    }

    /// Record a named link from `source` to `target`.
    pub fn link_events(&self, source: EventId, link_name: impl Into<String>, target: EventId) {
        self.inner
            .write()
            .links
            .insert((source, link_name.into()), target);
    }

    /// Attach an annotation instance to an explicit reference.
    pub fn attach_annotation(&self, reference: ExplicitReferenceId, annotation: Annotation) {
        let mut inner = self.inner.write();
        inner
            .annotations_by_reference
            .entry(reference)
            .or_default()
            .push(annotation.uuid);
        inner.annotations.insert(annotation.uuid, annotation);
    }

}

impl EventStore for MemoryEventStore {
    fn completeness_events(&self, filter: &EventFilter) -> StoreResult<Vec<Event>> {
        let inner = self.inner.read();

        let mut matches: Vec<Event> = inner
            .events
            .values()
            .filter(|event| {
                if let Some(prefix) = &filter.gauge_prefix {
                    if !event.gauge_name.starts_with(prefix.as_str()) {
                        return false;
                    }
                }
                if let Some(level) = &filter.level {
                    if !event.gauge_name.ends_with(level.as_str()) {
                        return false;
                    }
                }
                if let (Some(start), Some(stop)) = (filter.start, filter.stop) {
                    if !event.interval.overlaps(start, stop) {
                        return false;
                    }
                }
                if let Some(mission) = &filter.mission {
                    let satellite = event
                        .values
                        .iter()
                        .find(|v| v.name == "satellite")
                        .map(|v| v.value.as_str());
                    if !satellite.is_some_and(|s| s.starts_with(mission.as_str())) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        // Ascending start order is part of the query contract.
        matches.sort_by_key(|event| event.interval.start);

        let offset = filter.offset.unwrap_or(0);
        let matches: Vec<Event> = match filter.limit {
            Some(limit) => matches.into_iter().skip(offset).take(limit).collect(),
            None => matches.into_iter().skip(offset).collect(),
        };

        Ok(matches)
    }

    fn event(&self, uuid: EventId) -> StoreResult<Option<Event>> {
        Ok(self.inner.read().events.get(&uuid).cloned())
    }

    fn linked_event(&self, event: EventId, link_name: &str) -> StoreResult<Option<Event>> {
        let inner = self.inner.read();
        let Some(target) = inner.links.get(&(event, link_name.to_string())) else {
            return Ok(None);
        };
        match inner.events.get(target) {
            Some(linked) => Ok(Some(linked.clone())),
            // A dangling link is a store-side inconsistency, not mere absence.
            None => Err(StoreError::internal(format!(
                "link '{}' of event {} points to unknown event {}",
                link_name, event, target
            ))),
        }
    }

    fn attribute_values(
        &self,
        event: EventId,
        selectors: &[AttributeSelector],
    ) -> StoreResult<ValueMap> {
        let inner = self.inner.read();
        let event = inner
            .events
            .get(&event)
            .ok_or_else(|| StoreError::not_found(format!("event {}", event)))?;

        let mut map = ValueMap::new();
        for selector in selectors {
            let values: Vec<String> = event
                .values
                .iter()
                .filter(|v| selector.names.contains(&v.name.as_str()))
                .map(|v| v.value.clone())
                .collect();
            map.insert(selector.group.to_string(), values);
        }
        Ok(map)
    }

    fn annotation_groups(
        &self,
        reference: ExplicitReferenceId,
        selectors: &[AnnotationSelector],
    ) -> StoreResult<AnnotationGroupMap> {
        let inner = self.inner.read();
        let attached = inner
            .annotations_by_reference
            .get(&reference)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut map = AnnotationGroupMap::new();
        for selector in selectors {
            let ids: Vec<AnnotationId> = attached
                .iter()
                .filter(|id| {
                    inner
                        .annotations
                        .get(id)
                        .is_some_and(|a| a.name == selector.name)
                })
                .copied()
                .collect();
            map.insert(selector.group.to_string(), ids);
        }
        Ok(map)
    }

    fn annotation(&self, uuid: AnnotationId) -> StoreResult<Option<Annotation>> {
        Ok(self.inner.read().annotations.get(&uuid).cloned())
    }

    fn event_count(&self) -> StoreResult<usize> {
        Ok(self.inner.read().events.len())
    }
}
