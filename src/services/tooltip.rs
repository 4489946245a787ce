//! Tooltip rendering for the availability widgets.
//!
//! A tooltip is a fixed-order HTML table. Rows are modelled as structured
//! label/value pairs and rendered by one function, so that "this row was not
//! requested for display" (row omitted) stays distinct from "this row's value
//! did not resolve" (row present with a styled N/A marker).

use chrono::{DateTime, Utc};

use crate::models::time::format_timestamp;
use crate::models::Interval;

/// CSS class of the unresolved-value marker.
const UNRESOLVED_CLASS: &str = "bold-red";

/// A rendered cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Plain text.
    Text(String),
    /// Hyperlink, optionally styled.
    Link {
        href: String,
        text: String,
        class: Option<&'static str>,
    },
    /// Styled text without a target (e.g. a colored status with no detail
    /// view to link to).
    Styled {
        class: &'static str,
        text: String,
    },
    /// The value was requested but did not resolve; rendered as a styled
    /// N/A marker.
    Unresolved,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Link {
                href,
                text,
                class: Some(class),
            } => format!("<a class='{}' href='{}'>{}</a>", class, href, text),
            Self::Link {
                href,
                text,
                class: None,
            } => format!("<a href='{}'>{}</a>", href, text),
            Self::Styled { class, text } => format!("<a class='{}'>{}</a>", class, text),
            Self::Unresolved => format!("<a class='{}'>N/A</a>", UNRESOLVED_CLASS),
        }
    }
}

/// A metric cell whose row presence depends on the display options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricCell {
    /// The metric was not requested; its row is omitted entirely.
    NotRequested,
    /// Requested but the annotation chain did not resolve; the row renders
    /// the N/A marker.
    Unresolved,
    /// Requested and resolved.
    Value(f64),
}

impl MetricCell {
    /// Build from a display flag and an optionally resolved value.
    pub fn new(requested: bool, value: Option<f64>) -> Self {
        match (requested, value) {
            (false, _) => Self::NotRequested,
            (true, None) => Self::Unresolved,
            (true, Some(v)) => Self::Value(v),
        }
    }
}

/// All display fields of one enriched record, ready for tooltip rendering.
#[derive(Debug, Clone)]
pub struct TooltipFields {
    pub level: String,
    pub satellite: String,
    pub orbit: CellValue,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub duration_minutes: f64,
    pub imaging_mode: String,
    pub status: CellValue,
    pub product: CellValue,
    pub delay_minutes: MetricCell,
    pub size_gb: MetricCell,
    pub datatake_id: String,
    /// Interval of the linked planned imaging; absent for orphan products.
    pub datatake: Option<Interval>,
}

/// Render the tooltip table for one record.
///
/// Row order is fixed; the two metric rows appear only when their metric was
/// requested for display, independent of whether it resolved.
pub fn format_tooltip(fields: &TooltipFields) -> String {
    let mut rows: Vec<(&'static str, String)> = vec![
        ("Level", fields.level.clone()),
        ("Satellite", fields.satellite.clone()),
        ("Orbit", fields.orbit.render()),
        ("Start", format_timestamp(fields.start)),
        ("Stop", format_timestamp(fields.stop)),
        ("Duration (m)", fields.duration_minutes.to_string()),
        ("Imaging mode", fields.imaging_mode.clone()),
        ("Status", fields.status.render()),
        ("Product", fields.product.render()),
    ];

    push_metric_row(&mut rows, "Time to DHUS publication (m)", fields.delay_minutes);
    push_metric_row(&mut rows, "Size (GB)", fields.size_gb);

    rows.push(("Datatake id", fields.datatake_id.clone()));
    match &fields.datatake {
        Some(interval) => {
            rows.push(("Datatake start", format_timestamp(interval.start)));
            rows.push(("Datatake stop", format_timestamp(interval.stop)));
            rows.push((
                "Datatake duration(m)",
                interval.duration_minutes().to_string(),
            ));
        }
        None => {
            rows.push(("Datatake start", CellValue::Unresolved.render()));
            rows.push(("Datatake stop", CellValue::Unresolved.render()));
            rows.push(("Datatake duration(m)", CellValue::Unresolved.render()));
        }
    }

    let mut table = String::from("<table border='1'>");
    for (label, value) in rows {
        table.push_str("<tr><td>");
        table.push_str(label);
        table.push_str("</td><td>");
        table.push_str(&value);
        table.push_str("</td></tr>");
    }
    table.push_str("</table>");
    table
}

fn push_metric_row(rows: &mut Vec<(&'static str, String)>, label: &'static str, cell: MetricCell) {
    match cell {
        MetricCell::NotRequested => {}
        MetricCell::Unresolved => rows.push((label, CellValue::Unresolved.render())),
        MetricCell::Value(v) => rows.push((label, v.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_fields() -> TooltipFields {
        let start = Utc.with_ymd_and_hms(2021, 9, 12, 10, 30, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2021, 9, 12, 10, 35, 0).unwrap();
        TooltipFields {
            level: "L1_SLC".to_string(),
            satellite: "S1A".to_string(),
            orbit: CellValue::text("39000"),
            start,
            stop,
            duration_minutes: 5.0,
            imaging_mode: "IW".to_string(),
            status: CellValue::Styled {
                class: "bold-green",
                text: "COMPLETE".to_string(),
            },
            product: CellValue::text("S1A_IW_SLC__1SDV"),
            delay_minutes: MetricCell::Value(1.5),
            size_gb: MetricCell::NotRequested,
            datatake_id: "45000".to_string(),
            datatake: Some(Interval::new(start, stop)),
        }
    }

    #[test]
    fn test_row_order_and_structure() {
        let html = format_tooltip(&sample_fields());
        assert!(html.starts_with("<table border='1'>"));
        assert!(html.ends_with("</table>"));

        let level_pos = html.find("Level").unwrap();
        let satellite_pos = html.find("Satellite").unwrap();
        let status_pos = html.find("Status").unwrap();
        let datatake_pos = html.find("Datatake id").unwrap();
        assert!(level_pos < satellite_pos);
        assert!(satellite_pos < status_pos);
        assert!(status_pos < datatake_pos);

        // The datatake duration label carries no space before the unit.
        assert!(html.contains("<tr><td>Datatake duration(m)</td><td>5</td></tr>"));
        assert!(!html.contains("Datatake duration (m)"));
    }

    #[test]
    fn test_requested_metric_row_present() {
        let html = format_tooltip(&sample_fields());
        assert!(html.contains("<tr><td>Time to DHUS publication (m)</td><td>1.5</td></tr>"));
    }

    #[test]
    fn test_unrequested_metric_row_omitted() {
        let html = format_tooltip(&sample_fields());
        assert!(!html.contains("Size (GB)"));
    }

    #[test]
    fn test_requested_but_unresolved_metric_renders_marker() {
        let mut fields = sample_fields();
        fields.delay_minutes = MetricCell::Unresolved;
        let html = format_tooltip(&fields);
        assert!(html.contains(
            "<tr><td>Time to DHUS publication (m)</td><td><a class='bold-red'>N/A</a></td></tr>"
        ));
    }

    #[test]
    fn test_missing_datatake_renders_markers() {
        let mut fields = sample_fields();
        fields.datatake = None;
        let html = format_tooltip(&fields);
        assert!(html.contains("<tr><td>Datatake start</td><td><a class='bold-red'>N/A</a></td></tr>"));
        assert!(html.contains("<tr><td>Datatake duration(m)</td><td><a class='bold-red'>N/A</a></td></tr>"));
    }

    #[test]
    fn test_link_rendering() {
        let value = CellValue::Link {
            href: "/eboa_nav/query-event-links/abc".to_string(),
            text: "39000".to_string(),
            class: None,
        };
        assert_eq!(
            value.render(),
            "<a href='/eboa_nav/query-event-links/abc'>39000</a>"
        );

        let styled = CellValue::Link {
            href: "/views/dhus-availability-by-datatake/abc".to_string(),
            text: "COMPLETE".to_string(),
            class: Some("bold-green"),
        };
        assert_eq!(
            styled.render(),
            "<a class='bold-green' href='/views/dhus-availability-by-datatake/abc'>COMPLETE</a>"
        );
    }

    #[test]
    fn test_metric_cell_gating() {
        assert_eq!(MetricCell::new(false, Some(1.0)), MetricCell::NotRequested);
        assert_eq!(MetricCell::new(true, None), MetricCell::Unresolved);
        assert_eq!(MetricCell::new(true, Some(1.0)), MetricCell::Value(1.0));
    }
}
