//! Shared data model: events, intervals, statuses.

pub mod events;
pub mod time;

pub use events::{
    Annotation, AnnotationId, Event, EventId, EventValue, ExplicitReference, ExplicitReferenceId,
    Interval, ProductStatus, StatusClass,
};
