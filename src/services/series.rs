//! Series building: fold enriched records into the widget datasets.
//!
//! The builder owns all cross-record state for one request (per-level
//! running volume sums, per-level raw statistic lists). Records must be
//! pushed in ascending start order; the builder does not sort, the store
//! query guarantees the order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::EventId;

use super::enricher::{DisplayOptions, EnrichedRecord};

/// One interval on the completeness timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: EventId,
    /// Satellite, the timeline grouping key.
    pub group: String,
    /// Level, the timeline lane.
    pub timeline: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub tooltip: String,
    #[serde(rename = "className")]
    pub class_name: String,
}

/// One point of a scatter/line series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub id: EventId,
    /// Satellite, the series grouping key.
    pub group: String,
    pub x: DateTime<Utc>,
    pub y: f64,
    pub tooltip: String,
    #[serde(rename = "className")]
    pub class_name: String,
}

/// The three widget datasets plus the raw per-level statistic lists the
/// summary tables are computed from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesOutput {
    pub timeline: Vec<TimelineItem>,
    pub timeliness_by_level: HashMap<String, Vec<SeriesPoint>>,
    /// Cumulative published volume per level; y values are running sums.
    pub volume_by_level: HashMap<String, Vec<SeriesPoint>>,
    /// Raw publication delays per level, in processing order.
    pub delays_by_level: HashMap<String, Vec<f64>>,
    /// Raw published sizes per level, in processing order.
    pub volumes_by_level: HashMap<String, Vec<f64>>,
}

/// Accumulates enriched records into a [`SeriesOutput`].
///
/// Levels are discovered dynamically: the first record seen for a level
/// initializes its collections. Missing products never contribute to the
/// timeliness or volume series but still appear on the timeline as gaps.
#[derive(Debug)]
pub struct SeriesBuilder {
    options: DisplayOptions,
    output: SeriesOutput,
}

impl SeriesBuilder {
    pub fn new(options: DisplayOptions) -> Self {
        Self {
            options,
            output: SeriesOutput::default(),
        }
    }

    /// Append one record to every enabled dataset it qualifies for.
    pub fn push(&mut self, record: &EnrichedRecord) {
        if self.options.show_completeness {
            self.output.timeline.push(TimelineItem {
                id: record.id,
                group: record.satellite.clone(),
                timeline: record.level.clone(),
                start: record.interval.start,
                stop: record.interval.stop,
                tooltip: record.tooltip_html.clone(),
                class_name: record.status_class.item_class().to_string(),
            });
        }

        if record.status.is_missing() {
            return;
        }

        if self.options.show_timeliness {
            if let Some(delay) = record.delay_minutes {
                self.output
                    .timeliness_by_level
                    .entry(record.level.clone())
                    .or_default()
                    .push(SeriesPoint {
                        id: record.id,
                        group: record.satellite.clone(),
                        x: record.interval.start,
                        y: delay,
                        tooltip: record.tooltip_html.clone(),
                        class_name: record.status_class.item_class().to_string(),
                    });
                self.output
                    .delays_by_level
                    .entry(record.level.clone())
                    .or_default()
                    .push(delay);
            }
        }

        if self.options.show_volumes {
            if let Some(size) = record.size_gb {
                let sizes = self
                    .output
                    .volumes_by_level
                    .entry(record.level.clone())
                    .or_default();
                sizes.push(size);
                // Cumulative published volume: the y value is the prefix sum
                // of all sizes seen so far for this level.
                let running_sum: f64 = sizes.iter().sum();
                self.output
                    .volume_by_level
                    .entry(record.level.clone())
                    .or_default()
                    .push(SeriesPoint {
                        id: record.id,
                        group: record.satellite.clone(),
                        x: record.interval.start,
                        y: running_sum,
                        tooltip: record.tooltip_html.clone(),
                        class_name: record.status_class.item_class().to_string(),
                    });
            }
        }
    }

    pub fn finish(self) -> SeriesOutput {
        self.output
    }
}

/// Build the datasets from an ordered record stream.
///
/// Precondition: `records` is sorted by ascending start time, otherwise the
/// cumulative volume curve is not meaningful.
pub fn build(records: &[EnrichedRecord], options: &DisplayOptions) -> SeriesOutput {
    let mut builder = SeriesBuilder::new(*options);
    for record in records {
        builder.push(record);
    }
    builder.finish()
}
