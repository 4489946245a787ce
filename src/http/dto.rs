//! Data Transfer Objects for the HTTP API.
//!
//! The visualization payload types (`AvailabilityData`, the series and
//! timeline items) already derive Serialize in the service layer and are
//! re-exported here; this module adds the request-side types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::services::{AvailabilityData, SeriesOutput, SeriesPoint, TimelineItem, ViewMetadata};

use crate::services::{
    AvailabilityRequest, DisplayOptions, LevelFilter, ReportingWindow, SlidingWindow,
    DEFAULT_MISSION,
};

/// Query parameters of the availability endpoint.
///
/// The reporting window is picked in priority order: explicit `start`/`stop`
/// bounds, else the sliding-window parameters, else the default last-day
/// window.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AvailabilityQuery {
    /// Satellite prefix filter (default `S1_`).
    #[serde(default)]
    pub mission: Option<String>,
    /// Level selection, `ALL` or one level suffix (default `ALL`).
    #[serde(default)]
    pub levels: Option<String>,
    /// Which content to show: `completeness`, `timeliness`, `volumes`, or
    /// everything when absent.
    #[serde(default)]
    pub view_content: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,
    /// Sliding window: days between `now` and the window stop.
    #[serde(default)]
    pub window_delay: Option<f64>,
    /// Sliding window: window width in days.
    #[serde(default)]
    pub window_size: Option<f64>,
    /// Sliding window: days between page re-triggers; echoed back in the
    /// metadata so the page can schedule the next refresh.
    #[serde(default)]
    pub repeat_cycle: Option<f64>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl AvailabilityQuery {
    /// Resolve into a service request relative to `now`.
    pub fn into_request(self, now: DateTime<Utc>) -> Result<AvailabilityRequest, String> {
        let (window, sliding) = match (self.start, self.stop) {
            (Some(start), Some(stop)) => {
                if start > stop {
                    return Err(format!("start {} is after stop {}", start, stop));
                }
                (ReportingWindow::new(start, stop), None)
            }
            (None, None) => match self.window_size {
                Some(size) => {
                    let sliding = SlidingWindow {
                        window_delay_days: self.window_delay.unwrap_or(0.0),
                        window_size_days: size,
                        repeat_cycle_days: self.repeat_cycle.unwrap_or(1.0),
                    };
                    (ReportingWindow::sliding(now, &sliding), Some(sliding))
                }
                None => (ReportingWindow::last_day(now), None),
            },
            _ => return Err("start and stop must be provided together".to_string()),
        };

        let mut request = AvailabilityRequest::new(window);
        request.sliding = sliding;
        if let Some(mission) = self.mission.filter(|m| !m.is_empty()) {
            request.mission = mission;
        } else {
            request.mission = DEFAULT_MISSION.to_string();
        }
        request.levels = LevelFilter::parse(self.levels.as_deref().unwrap_or(""));
        request.options = display_options_for(self.view_content.as_deref());
        request.offset = self.offset;
        request.limit = self.limit;
        Ok(request)
    }
}

/// Map the `view_content` selector to display flags. Unknown or absent
/// content selects everything.
pub fn display_options_for(view_content: Option<&str>) -> DisplayOptions {
    match view_content {
        Some("completeness") => DisplayOptions {
            show_completeness: true,
            show_timeliness: false,
            show_volumes: false,
        },
        Some("timeliness") => DisplayOptions {
            show_completeness: false,
            show_timeliness: true,
            show_volumes: false,
        },
        Some("volumes") => DisplayOptions {
            show_completeness: false,
            show_timeliness: false,
            show_volumes: true,
        },
        _ => DisplayOptions::all(),
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Number of events currently queryable (demo store only, best effort)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<usize>,
}
