//! Service layer: the enrich/aggregate pipeline behind the availability view.
//!
//! The pipeline has three stages. The [`enricher`] joins one completeness
//! event with its planned imaging event and product annotations; the
//! [`series`] builder folds the enriched stream into the widget datasets;
//! [`availability`] orchestrates both per request. [`tooltip`] renders the
//! HTML tooltip each emitted item carries.

pub mod availability;
pub mod enricher;
pub mod error;
pub mod series;
pub mod tooltip;

pub use availability::{
    availability_view, datatake_view, AvailabilityData, AvailabilityRequest, LevelFilter,
    ReportingWindow, SlidingWindow, ViewMetadata, DEFAULT_MISSION,
};
pub use enricher::{enrich, DisplayOptions, EnrichedRecord, PlannedImagingSummary};
pub use error::{AvailabilityError, AvailabilityResult};
pub use series::{SeriesBuilder, SeriesOutput, SeriesPoint, TimelineItem};
pub use tooltip::{format_tooltip, CellValue, MetricCell, TooltipFields};
