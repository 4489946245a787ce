//! Event and annotation types as materialized by the event store.
//!
//! These are read-only query results: the store owns persistence and
//! identity, this crate only consumes them for one dashboard request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::round3;

/// UUID handle of an event in the store. Stable across requests, used as a
/// deep-link target by the dashboard tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// UUID handle of an explicit reference (a concrete, named product instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExplicitReferenceId(pub Uuid);

impl std::fmt::Display for ExplicitReferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// UUID handle of an annotation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationId(pub Uuid);

/// A `[start, stop]` time interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, stop: DateTime<Utc>) -> Self {
        Self { start, stop }
    }

    /// Duration in minutes, rounded to 3 decimals (the resolution shown in
    /// the dashboard tooltips).
    pub fn duration_minutes(&self) -> f64 {
        round3((self.stop - self.start).num_milliseconds() as f64 / 60_000.0)
    }

    /// Whether this interval overlaps `[start, stop]` (closed bounds).
    pub fn overlaps(&self, start: DateTime<Utc>, stop: DateTime<Utc>) -> bool {
        self.start <= stop && self.stop >= start
    }
}

/// A named value attached to an event or annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventValue {
    pub name: String,
    pub value: String,
}

impl EventValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A concrete product instance bound to a completeness event. Absent when the
/// expected product never showed up (`MISSING` status).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplicitReference {
    pub uuid: ExplicitReferenceId,
    pub name: String,
}

/// An event as returned by the store: gauge name, interval, optional explicit
/// reference and attached values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub uuid: EventId,
    pub gauge_name: String,
    pub interval: Interval,
    pub explicit_reference: Option<ExplicitReference>,
    pub values: Vec<EventValue>,
}

/// An annotation instance attached to an explicit reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub uuid: AnnotationId,
    /// Annotation kind (e.g. `DHUS_PUBLICATION_TIME`).
    pub name: String,
    pub values: Vec<EventValue>,
}

impl Annotation {
    /// First value with the given name, if any.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
    }
}

/// Completeness outcome of an expected product, parsed from the raw `status`
/// attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    /// The expected product was never published.
    Missing,
    /// A product was published with no matching plan.
    Unexpected,
    /// The product was published as planned.
    Complete,
    /// Any other value. The upstream enumeration is assumed closed, so this
    /// signals an ingestion change; it is classified as complete.
    Unrecognized(String),
}

impl ProductStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "MISSING" => Self::Missing,
            "UNEXPECTED" => Self::Unexpected,
            "COMPLETE" => Self::Complete,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Missing => "MISSING",
            Self::Unexpected => "UNEXPECTED",
            Self::Complete => "COMPLETE",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual classification of a completeness status. Carries both the chart
/// item class and the tooltip text class used by the dashboard CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusClass {
    Red,
    Blue,
    Green,
}

impl StatusClass {
    /// Classify a status. `MISSING` is red, `UNEXPECTED` is blue, everything
    /// else is green. An unrecognized value is logged and treated as
    /// complete rather than failing the request.
    pub fn from_status(status: &ProductStatus) -> Self {
        match status {
            ProductStatus::Missing => Self::Red,
            ProductStatus::Unexpected => Self::Blue,
            ProductStatus::Complete => Self::Green,
            ProductStatus::Unrecognized(raw) => {
                log::warn!(
                    "unrecognized completeness status '{}', classifying as complete",
                    raw
                );
                Self::Green
            }
        }
    }

    /// CSS class for timeline/scatter items.
    pub fn item_class(&self) -> &'static str {
        match self {
            Self::Red => "fill-border-red",
            Self::Blue => "fill-border-blue",
            Self::Green => "fill-border-green",
        }
    }

    /// CSS class for tooltip text fragments.
    pub fn text_class(&self) -> &'static str {
        match self {
            Self::Red => "bold-red",
            Self::Blue => "bold-blue",
            Self::Green => "bold-green",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_interval_duration_minutes() {
        let start = Utc.with_ymd_and_hms(2021, 9, 12, 10, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2021, 9, 12, 10, 1, 30).unwrap();
        let interval = Interval::new(start, stop);
        assert_eq!(interval.duration_minutes(), 1.5);
    }

    #[test]
    fn test_interval_overlap() {
        let start = Utc.with_ymd_and_hms(2021, 9, 12, 10, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2021, 9, 12, 11, 0, 0).unwrap();
        let interval = Interval::new(start, stop);

        let before = Utc.with_ymd_and_hms(2021, 9, 12, 9, 0, 0).unwrap();
        assert!(interval.overlaps(before, start));
        assert!(!interval.overlaps(
            before,
            Utc.with_ymd_and_hms(2021, 9, 12, 9, 30, 0).unwrap()
        ));
    }

    #[test]
    fn test_product_status_from_raw() {
        assert_eq!(ProductStatus::from_raw("MISSING"), ProductStatus::Missing);
        assert_eq!(
            ProductStatus::from_raw("UNEXPECTED"),
            ProductStatus::Unexpected
        );
        assert_eq!(ProductStatus::from_raw("COMPLETE"), ProductStatus::Complete);
        assert_eq!(
            ProductStatus::from_raw("PARTIAL"),
            ProductStatus::Unrecognized("PARTIAL".to_string())
        );
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(
            StatusClass::from_status(&ProductStatus::Missing),
            StatusClass::Red
        );
        assert_eq!(
            StatusClass::from_status(&ProductStatus::Unexpected),
            StatusClass::Blue
        );
        assert_eq!(
            StatusClass::from_status(&ProductStatus::Complete),
            StatusClass::Green
        );
        // Unrecognized values fall through to the complete styling.
        assert_eq!(
            StatusClass::from_status(&ProductStatus::Unrecognized("PARTIAL".into())),
            StatusClass::Green
        );
    }

    #[test]
    fn test_status_class_css_names() {
        assert_eq!(StatusClass::Red.item_class(), "fill-border-red");
        assert_eq!(StatusClass::Red.text_class(), "bold-red");
        assert_eq!(StatusClass::Blue.item_class(), "fill-border-blue");
        assert_eq!(StatusClass::Green.text_class(), "bold-green");
    }

    #[test]
    fn test_annotation_value_lookup() {
        let annotation = Annotation {
            uuid: AnnotationId(Uuid::new_v4()),
            name: "DHUS_METADATA_INFORMATION".to_string(),
            values: vec![EventValue::new("size", "4100000000")],
        };
        assert_eq!(annotation.value("size"), Some("4100000000"));
        assert_eq!(annotation.value("checksum"), None);
    }
}
