//! Per-request view orchestration.
//!
//! Assembles the reporting window and filters of one dashboard request,
//! queries the completeness events, runs them through the enricher and the
//! series builder and attaches the view metadata the page template echoes
//! back (reporting period, mission, levels, enabled content).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::EventId;
use crate::store::{EventFilter, EventStore};

use super::enricher::{enrich, DisplayOptions, COMPLETENESS_GAUGE_PREFIX};
use super::error::{AvailabilityError, AvailabilityResult};
use super::series::{SeriesBuilder, SeriesOutput};

/// Default mission filter: both Sentinel-1 units.
pub const DEFAULT_MISSION: &str = "S1_";

/// Reporting period of one request. Events overlapping `[start, stop]` are
/// bound into the datasets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportingWindow {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

impl ReportingWindow {
    pub fn new(start: DateTime<Utc>, stop: DateTime<Utc>) -> Self {
        Self { start, stop }
    }

    /// Default window: the day up to `now`.
    pub fn last_day(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(1),
            stop: now,
        }
    }

    /// Sliding window: `window_size_days` wide, ending `window_delay_days`
    /// before `now`. Both parameters are fractional days.
    pub fn sliding(now: DateTime<Utc>, window: &SlidingWindow) -> Self {
        Self {
            start: now - fractional_days(window.window_delay_days + window.window_size_days),
            stop: now - fractional_days(window.window_delay_days),
        }
    }
}

fn fractional_days(days: f64) -> Duration {
    Duration::milliseconds((days * 86_400_000.0).round() as i64)
}

/// Sliding view parameterization, echoed back to the page so it can
/// re-trigger itself every `repeat_cycle_days`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlidingWindow {
    pub window_delay_days: f64,
    pub window_size_days: f64,
    pub repeat_cycle_days: f64,
}

/// Level selection: every level, or one specific level suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelFilter {
    All,
    Only(String),
}

impl LevelFilter {
    /// Parse the form value: empty or `ALL` selects every level.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | "ALL" => Self::All,
            level => Self::Only(level.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "ALL",
            Self::Only(level) => level,
        }
    }

    fn query_level(&self) -> Option<String> {
        match self {
            Self::All => None,
            Self::Only(level) => Some(level.clone()),
        }
    }
}

/// Everything one availability request needs.
#[derive(Debug, Clone)]
pub struct AvailabilityRequest {
    pub window: ReportingWindow,
    pub mission: String,
    pub levels: LevelFilter,
    pub options: DisplayOptions,
    /// Set when the window came from sliding parameters; echoed back so the
    /// page can re-trigger itself.
    pub sliding: Option<SlidingWindow>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl AvailabilityRequest {
    pub fn new(window: ReportingWindow) -> Self {
        Self {
            window,
            mission: DEFAULT_MISSION.to_string(),
            levels: LevelFilter::All,
            options: DisplayOptions::all(),
            sliding: None,
            offset: None,
            limit: None,
        }
    }
}

/// Request metadata echoed alongside the datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewMetadata {
    pub reporting_start: DateTime<Utc>,
    pub reporting_stop: DateTime<Utc>,
    pub mission: String,
    pub levels: String,
    pub show: DisplayOptions,
    /// The sliding parameterization, present only for sliding requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sliding: Option<SlidingWindow>,
}

/// The full response payload of one availability request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityData {
    #[serde(flatten)]
    pub series: SeriesOutput,
    pub metadata: ViewMetadata,
}

/// Run the full pipeline for one request: query, enrich, aggregate.
pub fn availability_view(
    store: &dyn EventStore,
    request: &AvailabilityRequest,
) -> AvailabilityResult<AvailabilityData> {
    log::debug!(
        "availability view: window {} .. {}, mission {}, levels {}",
        request.window.start,
        request.window.stop,
        request.mission,
        request.levels.as_str()
    );

    let filter = EventFilter {
        start: Some(request.window.start),
        stop: Some(request.window.stop),
        gauge_prefix: Some(COMPLETENESS_GAUGE_PREFIX.to_string()),
        level: request.levels.query_level(),
        mission: Some(request.mission.clone()),
        offset: request.offset,
        limit: request.limit,
    };
    let events = store.completeness_events(&filter)?;

    // Events arrive in ascending start order, the precondition for the
    // cumulative volume series.
    let mut builder = SeriesBuilder::new(request.options);
    for event in &events {
        let record = enrich(store, event, &request.options)?;
        builder.push(&record);
    }

    Ok(AvailabilityData {
        series: builder.finish(),
        metadata: ViewMetadata {
            reporting_start: request.window.start,
            reporting_stop: request.window.stop,
            mission: request.mission.clone(),
            levels: request.levels.as_str().to_string(),
            show: request.options,
            sliding: request.sliding,
        },
    })
}

/// The per-datatake view: same pipeline, window taken from the planned
/// imaging event's own interval.
pub fn datatake_view(
    store: &dyn EventStore,
    planned_imaging: EventId,
    options: DisplayOptions,
) -> AvailabilityResult<AvailabilityData> {
    let plan = store
        .event(planned_imaging)?
        .ok_or(AvailabilityError::EventNotFound(planned_imaging))?;

    let mut request = AvailabilityRequest::new(ReportingWindow::new(
        plan.interval.start,
        plan.interval.stop,
    ));
    request.options = options;
    availability_view(store, &request)
}
