//! Record enrichment: one completeness event in, one enriched record out.
//!
//! For each completeness event the enricher resolves the linked planned
//! imaging event, the mandatory attributes (satellite, orbit, status,
//! datatake id), the product reference and, when the corresponding
//! visualization is enabled, the publication-delay and volume metrics carried
//! by the product's annotations. Every lookup of optional data tolerates
//! absence; only a mandatory attribute failing to resolve uniquely aborts the
//! request.

use crate::models::time::{bytes_to_gb, minutes_between, parse_timestamp, round3};
use crate::models::{Event, EventId, Interval, ProductStatus, StatusClass};
use crate::store::{AnnotationSelector, AttributeSelector, EventStore, ValueMap};

use super::error::{AvailabilityError, AvailabilityResult};
use super::tooltip::{format_tooltip, CellValue, MetricCell, TooltipFields};

/// Gauge name prefix of completeness events; the remainder is the product
/// level (`L0`, `L1_SLC`, `L1_GRD`, `L2_OCN`, ...).
pub const COMPLETENESS_GAUGE_PREFIX: &str = "PLANNED_IMAGING_DHUS_PRODUCT_COMPLETENESS_";

/// Link name of the "generated by plan" relation.
pub const PLANNED_IMAGING_LINK: &str = "PLANNED_IMAGING";

const METADATA_ANNOTATION: &str = "DHUS_METADATA_INFORMATION";
const PUBLICATION_TIME_ANNOTATION: &str = "DHUS_PUBLICATION_TIME";
const PUBLICATION_TIME_VALUE: &str = "dhus_publication_time";
const SIZE_VALUE: &str = "size";
const IMAGING_MODE_VALUE: &str = "imaging_mode";

const EVENT_LINKS_URL_PREFIX: &str = "/eboa_nav/query-event-links/";
const DATATAKE_VIEW_URL_PREFIX: &str = "/views/dhus-availability-by-datatake/";

/// Mandatory per-record attributes; each must resolve to exactly one value.
/// The orbit is stored under either name depending on the ingestion chain.
const MANDATORY_ATTRIBUTES: [AttributeSelector; 4] = [
    AttributeSelector::new("satellite", &["satellite"]),
    AttributeSelector::new("orbit", &["orbit", "start_orbit"]),
    AttributeSelector::new("status", &["status"]),
    AttributeSelector::new("datatake_id", &["datatake_id"]),
];

const ANNOTATION_SELECTORS: [AnnotationSelector; 2] = [
    AnnotationSelector::new("metadata", METADATA_ANNOTATION),
    AnnotationSelector::new("publication_time", PUBLICATION_TIME_ANNOTATION),
];

/// Which visualizations the current request shows. Each flag independently
/// gates both the computation of the backing metric and the corresponding
/// output collection and tooltip row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DisplayOptions {
    pub show_completeness: bool,
    pub show_timeliness: bool,
    pub show_volumes: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::all()
    }
}

impl DisplayOptions {
    pub fn all() -> Self {
        Self {
            show_completeness: true,
            show_timeliness: true,
            show_volumes: true,
        }
    }
}

/// Summary of the planned imaging event a completeness record was generated
/// from. The planned imaging interval is the datatake interval shown in the
/// tooltips.
#[derive(Debug, Clone)]
pub struct PlannedImagingSummary {
    pub uuid: EventId,
    pub interval: Interval,
    pub imaging_mode: Option<String>,
}

/// One completeness event joined with its plan and product metadata, ready
/// for the series builder.
#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    pub id: EventId,
    pub level: String,
    pub satellite: String,
    pub orbit: String,
    pub status: ProductStatus,
    pub status_class: StatusClass,
    pub datatake_id: String,
    /// Name of the published product; `None` for missing products.
    pub product_name: Option<String>,
    pub imaging_mode: Option<String>,
    pub interval: Interval,
    pub planned_imaging: Option<PlannedImagingSummary>,
    /// Publication delay in minutes; computed only when timeliness is shown
    /// and the product is not missing.
    pub delay_minutes: Option<f64>,
    /// Published size in GB; computed only when volumes are shown and the
    /// product is not missing.
    pub size_gb: Option<f64>,
    pub tooltip_html: String,
}

/// Enrich one completeness event.
///
/// Resolution of the planned imaging link, the product reference and the
/// annotation chains all degrade to `None` on absence. A mandatory attribute
/// resolving to zero or multiple values raises
/// [`AvailabilityError::DataIntegrity`].
pub fn enrich(
    store: &dyn EventStore,
    completeness: &Event,
    options: &DisplayOptions,
) -> AvailabilityResult<EnrichedRecord> {
    let planned_imaging = resolve_planned_imaging(store, completeness)?;

    let level = completeness
        .gauge_name
        .strip_prefix(COMPLETENESS_GAUGE_PREFIX)
        .unwrap_or(&completeness.gauge_name)
        .to_string();

    let values = store.attribute_values(completeness.uuid, &MANDATORY_ATTRIBUTES)?;
    let satellite = require_one(&values, "satellite", completeness.uuid)?;
    let orbit = require_one(&values, "orbit", completeness.uuid)?;
    let raw_status = require_one(&values, "status", completeness.uuid)?;
    let datatake_id = require_one(&values, "datatake_id", completeness.uuid)?;

    let status = ProductStatus::from_raw(&raw_status);
    let status_class = StatusClass::from_status(&status);

    let product_name = if status.is_missing() {
        None
    } else {
        completeness
            .explicit_reference
            .as_ref()
            .map(|er| er.name.clone())
    };

    let imaging_mode = planned_imaging
        .as_ref()
        .and_then(|plan| plan.imaging_mode.clone())
        .or_else(|| {
            product_name
                .as_deref()
                .and_then(imaging_mode_from_product_name)
        });

    // The two metric lookups share the annotation group resolution, so do it
    // once and only when at least one metric is shown for a present product.
    let want_metrics =
        (options.show_timeliness || options.show_volumes) && !status.is_missing();
    let annotations = match (&completeness.explicit_reference, want_metrics) {
        (Some(er), true) => Some(store.annotation_groups(er.uuid, &ANNOTATION_SELECTORS)?),
        _ => None,
    };

    let delay_minutes = if options.show_timeliness && !status.is_missing() {
        let reference_stop = planned_imaging
            .as_ref()
            .map(|plan| plan.interval.stop)
            .unwrap_or(completeness.interval.stop);
        let raw = match &annotations {
            Some(groups) => {
                first_annotation_value(store, groups, "publication_time", PUBLICATION_TIME_VALUE)?
            }
            None => None,
        };
        raw.and_then(|raw| {
            let publication = parse_timestamp(&raw);
            if publication.is_none() {
                log::warn!(
                    "event {}: unparseable publication time '{}'",
                    completeness.uuid,
                    raw
                );
            }
            publication
        })
        .map(|publication| round3(minutes_between(publication, reference_stop)))
    } else {
        None
    };

    let size_gb = if options.show_volumes && !status.is_missing() {
        let raw = match &annotations {
            Some(groups) => first_annotation_value(store, groups, "metadata", SIZE_VALUE)?,
            None => None,
        };
        raw.and_then(|raw| {
            let bytes = raw.parse::<f64>().ok();
            if bytes.is_none() {
                log::warn!("event {}: unparseable size '{}'", completeness.uuid, raw);
            }
            bytes
        })
        .map(|bytes| round3(bytes_to_gb(bytes)))
    } else {
        None
    };

    let tooltip_html = format_tooltip(&tooltip_fields(
        completeness,
        &level,
        &satellite,
        &orbit,
        &status,
        status_class,
        &datatake_id,
        product_name.as_deref(),
        imaging_mode.as_deref(),
        planned_imaging.as_ref(),
        delay_minutes,
        size_gb,
        options,
    ));

    Ok(EnrichedRecord {
        id: completeness.uuid,
        level,
        satellite,
        orbit,
        status,
        status_class,
        datatake_id,
        product_name,
        imaging_mode,
        interval: completeness.interval,
        planned_imaging,
        delay_minutes,
        size_gb,
        tooltip_html,
    })
}

fn resolve_planned_imaging(
    store: &dyn EventStore,
    completeness: &Event,
) -> AvailabilityResult<Option<PlannedImagingSummary>> {
    let Some(plan) = store.linked_event(completeness.uuid, PLANNED_IMAGING_LINK)? else {
        return Ok(None);
    };
    let imaging_mode = plan
        .values
        .iter()
        .find(|v| v.name == IMAGING_MODE_VALUE)
        .map(|v| v.value.clone());
    Ok(Some(PlannedImagingSummary {
        uuid: plan.uuid,
        interval: plan.interval,
        imaging_mode,
    }))
}

/// Enforce the exactly-one contract on a mandatory attribute group.
fn require_one(
    values: &ValueMap,
    attribute: &'static str,
    event: EventId,
) -> AvailabilityResult<String> {
    let list = values.get(attribute).map(Vec::as_slice).unwrap_or(&[]);
    match list {
        [single] => Ok(single.clone()),
        other => Err(AvailabilityError::DataIntegrity {
            event,
            attribute,
            found: other.len(),
        }),
    }
}

/// Walk the annotation chain: group -> first annotation instance -> value.
/// Any absent step yields `Ok(None)`.
fn first_annotation_value(
    store: &dyn EventStore,
    groups: &crate::store::AnnotationGroupMap,
    group: &str,
    value_name: &str,
) -> AvailabilityResult<Option<String>> {
    let Some(first) = groups.get(group).and_then(|ids| ids.first()) else {
        return Ok(None);
    };
    let Some(annotation) = store.annotation(*first)? else {
        return Ok(None);
    };
    Ok(annotation.value(value_name).map(str::to_string))
}

/// Fall back to the product naming convention when no planned imaging mode
/// is available.
///
/// Sentinel-1 product names encode the acquisition mode/beam as the two
/// characters after the mission identifier (`S1A_IW_SLC__...` -> `IW`). This
/// is positional parsing tied to that convention; a name too short or of
/// another shape yields `None`.
pub fn imaging_mode_from_product_name(name: &str) -> Option<String> {
    name.get(4..6).map(str::to_string)
}

#[allow(clippy::too_many_arguments)]
fn tooltip_fields(
    completeness: &Event,
    level: &str,
    satellite: &str,
    orbit: &str,
    status: &ProductStatus,
    status_class: StatusClass,
    datatake_id: &str,
    product_name: Option<&str>,
    imaging_mode: Option<&str>,
    planned_imaging: Option<&PlannedImagingSummary>,
    delay_minutes: Option<f64>,
    size_gb: Option<f64>,
    options: &DisplayOptions,
) -> TooltipFields {
    let orbit_cell = match planned_imaging {
        Some(plan) => CellValue::Link {
            href: format!("{}{}", EVENT_LINKS_URL_PREFIX, plan.uuid),
            text: orbit.to_string(),
            class: None,
        },
        None => CellValue::text(orbit),
    };

    let status_cell = match planned_imaging {
        Some(plan) => CellValue::Link {
            href: format!("{}{}", DATATAKE_VIEW_URL_PREFIX, plan.uuid),
            text: status.to_string(),
            class: Some(status_class.text_class()),
        },
        None => CellValue::Styled {
            class: status_class.text_class(),
            text: status.to_string(),
        },
    };

    let product_cell = match product_name {
        Some(name) => CellValue::Link {
            href: format!("{}{}", EVENT_LINKS_URL_PREFIX, completeness.uuid),
            text: name.to_string(),
            class: None,
        },
        None => CellValue::Styled {
            class: status_class.text_class(),
            text: "N/A".to_string(),
        },
    };

    TooltipFields {
        level: level.to_string(),
        satellite: satellite.to_string(),
        orbit: orbit_cell,
        start: completeness.interval.start,
        stop: completeness.interval.stop,
        duration_minutes: completeness.interval.duration_minutes(),
        imaging_mode: imaging_mode.unwrap_or("N/A").to_string(),
        status: status_cell,
        product: product_cell,
        delay_minutes: MetricCell::new(options.show_timeliness, delay_minutes),
        size_gb: MetricCell::new(options.show_volumes, size_gb),
        datatake_id: datatake_id.to_string(),
        datatake: planned_imaging.map(|plan| plan.interval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Annotation, AnnotationId, EventValue, ExplicitReference, ExplicitReferenceId};
    use crate::store::MemoryEventStore;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn ts(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 9, 12, h, m, s).unwrap()
    }

    struct Fixture {
        store: MemoryEventStore,
        completeness: Event,
    }

    /// A COMPLETE L1_SLC product with a linked plan, publication time 90s
    /// after the plan stop, and a 4.1e9 byte size annotation.
    fn complete_fixture() -> Fixture {
        let store = MemoryEventStore::new();
        let reference = ExplicitReferenceId(Uuid::new_v4());

        let completeness = Event {
            uuid: EventId::new(),
            gauge_name: "PLANNED_IMAGING_DHUS_PRODUCT_COMPLETENESS_L1_SLC".to_string(),
            interval: Interval::new(ts(10, 30, 0), ts(10, 35, 0)),
            explicit_reference: Some(ExplicitReference {
                uuid: reference,
                name: "S1A_IW_SLC__1SDV_20210912T103000".to_string(),
            }),
            values: vec![
                EventValue::new("satellite", "S1A"),
                EventValue::new("orbit", "39000"),
                EventValue::new("status", "COMPLETE"),
                EventValue::new("datatake_id", "45000"),
            ],
        };

        let plan = Event {
            uuid: EventId::new(),
            gauge_name: "PLANNED_IMAGING".to_string(),
            interval: Interval::new(ts(10, 29, 0), ts(10, 36, 0)),
            explicit_reference: None,
            values: vec![EventValue::new("imaging_mode", "IW")],
        };

        store.insert_event(completeness.clone());
        let plan_id = plan.uuid;
        store.insert_event(plan);
        store.link_events(completeness.uuid, PLANNED_IMAGING_LINK, plan_id);

        store.attach_annotation(
            reference,
            Annotation {
                uuid: AnnotationId(Uuid::new_v4()),
                name: "DHUS_PUBLICATION_TIME".to_string(),
                // 90 s after the plan stop.
                values: vec![EventValue::new("dhus_publication_time", "2021-09-12T10:37:30Z")],
            },
        );
        store.attach_annotation(
            reference,
            Annotation {
                uuid: AnnotationId(Uuid::new_v4()),
                name: "DHUS_METADATA_INFORMATION".to_string(),
                values: vec![EventValue::new("size", "4100000000")],
            },
        );

        Fixture {
            store,
            completeness,
        }
    }

    fn missing_fixture() -> Fixture {
        let store = MemoryEventStore::new();
        let completeness = Event {
            uuid: EventId::new(),
            gauge_name: "PLANNED_IMAGING_DHUS_PRODUCT_COMPLETENESS_L0".to_string(),
            interval: Interval::new(ts(11, 0, 0), ts(11, 5, 0)),
            explicit_reference: None,
            values: vec![
                EventValue::new("satellite", "S1B"),
                EventValue::new("start_orbit", "28000"),
                EventValue::new("status", "MISSING"),
                EventValue::new("datatake_id", "45001"),
            ],
        };
        store.insert_event(completeness.clone());
        Fixture {
            store,
            completeness,
        }
    }

    #[test]
    fn test_complete_record_with_delay_and_size() {
        let fixture = complete_fixture();
        let record = enrich(
            &fixture.store,
            &fixture.completeness,
            &DisplayOptions::all(),
        )
        .unwrap();

        assert_eq!(record.level, "L1_SLC");
        assert_eq!(record.satellite, "S1A");
        assert_eq!(record.orbit, "39000");
        assert_eq!(record.status, ProductStatus::Complete);
        assert_eq!(record.status_class, StatusClass::Green);
        assert_eq!(record.datatake_id, "45000");
        assert_eq!(record.imaging_mode.as_deref(), Some("IW"));
        // Publication 90 s after the planned imaging stop.
        assert_eq!(record.delay_minutes, Some(1.5));
        assert_eq!(record.size_gb, Some(4.1));
        assert!(record.planned_imaging.is_some());
    }

    #[test]
    fn test_missing_record_degrades_to_markers() {
        let fixture = missing_fixture();
        let record = enrich(
            &fixture.store,
            &fixture.completeness,
            &DisplayOptions::all(),
        )
        .unwrap();

        assert_eq!(record.level, "L0");
        assert_eq!(record.status, ProductStatus::Missing);
        assert_eq!(record.status_class, StatusClass::Red);
        assert_eq!(record.product_name, None);
        assert_eq!(record.imaging_mode, None);
        assert_eq!(record.delay_minutes, None);
        assert_eq!(record.size_gb, None);
        // The orbit fell back to the start_orbit attribute name.
        assert_eq!(record.orbit, "28000");
        // Requested metrics render the unresolved marker.
        assert!(record.tooltip_html.contains("<a class='bold-red'>N/A</a>"));
        assert!(record.tooltip_html.contains("<tr><td>Imaging mode</td><td>N/A</td></tr>"));
    }

    #[test]
    fn test_option_gating_skips_metrics_and_rows() {
        let fixture = complete_fixture();
        let options = DisplayOptions {
            show_completeness: true,
            show_timeliness: false,
            show_volumes: false,
        };
        let record = enrich(&fixture.store, &fixture.completeness, &options).unwrap();

        assert_eq!(record.delay_minutes, None);
        assert_eq!(record.size_gb, None);
        assert!(!record.tooltip_html.contains("Time to DHUS publication"));
        assert!(!record.tooltip_html.contains("Size (GB)"));
    }

    #[test]
    fn test_requested_but_unresolved_metric_keeps_row() {
        let fixture = complete_fixture();
        // A second store without any annotations attached.
        let bare = MemoryEventStore::new();
        bare.insert_event(fixture.completeness.clone());
        let record = enrich(&bare, &fixture.completeness, &DisplayOptions::all()).unwrap();

        assert_eq!(record.delay_minutes, None);
        assert!(record
            .tooltip_html
            .contains("<tr><td>Time to DHUS publication (m)</td><td><a class='bold-red'>N/A</a></td></tr>"));
    }

    #[test]
    fn test_delay_reference_falls_back_to_completeness_stop() {
        let fixture = complete_fixture();
        // Drop the plan link by rebuilding the store without it.
        let store = MemoryEventStore::new();
        store.insert_event(fixture.completeness.clone());
        let reference = fixture
            .completeness
            .explicit_reference
            .as_ref()
            .unwrap()
            .uuid;
        store.attach_annotation(
            reference,
            Annotation {
                uuid: AnnotationId(Uuid::new_v4()),
                name: "DHUS_PUBLICATION_TIME".to_string(),
                // 90 s after the completeness stop (10:35:00).
                values: vec![EventValue::new("dhus_publication_time", "2021-09-12T10:36:30Z")],
            },
        );

        let record = enrich(&store, &fixture.completeness, &DisplayOptions::all()).unwrap();
        assert!(record.planned_imaging.is_none());
        assert_eq!(record.delay_minutes, Some(1.5));
        // Without a plan the imaging mode comes from the product name.
        assert_eq!(record.imaging_mode.as_deref(), Some("IW"));
    }

    #[test]
    fn test_duplicate_status_raises_data_integrity() {
        let fixture = complete_fixture();
        let mut event = fixture.completeness.clone();
        event.values.push(EventValue::new("status", "MISSING"));
        let store = MemoryEventStore::new();
        store.insert_event(event.clone());

        let err = enrich(&store, &event, &DisplayOptions::all()).unwrap_err();
        match err {
            AvailabilityError::DataIntegrity {
                attribute, found, ..
            } => {
                assert_eq!(attribute, "status");
                assert_eq!(found, 2);
            }
            other => panic!("expected DataIntegrity, got {:?}", other),
        }
    }

    #[test]
    fn test_absent_attribute_raises_data_integrity() {
        let store = MemoryEventStore::new();
        let event = Event {
            uuid: EventId::new(),
            gauge_name: "PLANNED_IMAGING_DHUS_PRODUCT_COMPLETENESS_L0".to_string(),
            interval: Interval::new(ts(10, 0, 0), ts(10, 5, 0)),
            explicit_reference: None,
            values: vec![EventValue::new("satellite", "S1A")],
        };
        store.insert_event(event.clone());

        let err = enrich(&store, &event, &DisplayOptions::all()).unwrap_err();
        assert!(matches!(
            err,
            AvailabilityError::DataIntegrity { found: 0, .. }
        ));
    }

    #[test]
    fn test_unrecognized_status_classified_green() {
        let fixture = complete_fixture();
        let mut event = fixture.completeness.clone();
        event.values.retain(|v| v.name != "status");
        event.values.push(EventValue::new("status", "PARTIAL"));
        let store = MemoryEventStore::new();
        store.insert_event(event.clone());

        let record = enrich(&store, &event, &DisplayOptions::all()).unwrap();
        assert_eq!(
            record.status,
            ProductStatus::Unrecognized("PARTIAL".to_string())
        );
        assert_eq!(record.status_class, StatusClass::Green);
    }

    #[test]
    fn test_enrichment_is_deterministic() {
        let fixture = complete_fixture();
        let first = enrich(
            &fixture.store,
            &fixture.completeness,
            &DisplayOptions::all(),
        )
        .unwrap();
        let second = enrich(
            &fixture.store,
            &fixture.completeness,
            &DisplayOptions::all(),
        )
        .unwrap();
        assert_eq!(first.tooltip_html, second.tooltip_html);
        assert_eq!(first.delay_minutes, second.delay_minutes);
        assert_eq!(first.size_gb, second.size_gb);
    }

    #[test]
    fn test_imaging_mode_fallback_parsing() {
        assert_eq!(
            imaging_mode_from_product_name("S1A_IW_SLC__1SDV_20210912T103000"),
            Some("IW".to_string())
        );
        assert_eq!(
            imaging_mode_from_product_name("S1B_EW_GRDM_1SDH_20210912T103000"),
            Some("EW".to_string())
        );
        assert_eq!(imaging_mode_from_product_name("S1A"), None);
    }
}
