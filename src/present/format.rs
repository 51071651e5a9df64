//! Display descriptors for statuses and percentages.

use serde::Serialize;

use crate::aggregate::DerivedRow;
use crate::model::Status;

pub const PASSED_COLOR: &str = "#2ecc71";
pub const FAILED_COLOR: &str = "#e74c3c";
pub const INCOMPLETE_COLOR: &str = "#f1c40f";
pub const DEFAULT_COLOR: &str = "#000";

/// Pill-shaped status label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    pub color: &'static str,
}

/// A percentage with a horizontal fill bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentBar {
    /// e.g. `"70.00%"`
    pub text: String,
    /// Bar fill in [0, 100].
    pub fill: f64,
    pub color: &'static str,
}

pub fn status_color(status: &Status) -> &'static str {
    match status {
        Status::Passed => PASSED_COLOR,
        Status::Failed => FAILED_COLOR,
        Status::Incomplete => INCOMPLETE_COLOR,
        Status::Other(_) => DEFAULT_COLOR,
    }
}

pub fn status_badge(status: &Status) -> StatusBadge {
    StatusBadge {
        label: status.as_str().to_string(),
        color: status_color(status),
    }
}

pub fn percent_bar(value: f64, color: &'static str) -> PercentBar {
    let fill = if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    };
    PercentBar {
        text: format!("{:.2}%", fill),
        fill,
        color,
    }
}

/// Pass, fail and incomplete bars for one row.
pub fn percent_bars(row: &DerivedRow) -> [PercentBar; 3] {
    [
        percent_bar(row.pass_percentage, PASSED_COLOR),
        percent_bar(row.fail_percentage, FAILED_COLOR),
        percent_bar(row.incomplete_percentage, INCOMPLETE_COLOR),
    ]
}

/// Border of the detail panel. Matches case-insensitively; anything that is
/// not passed or failed gets the incomplete tint.
pub fn detail_border_color(status: &Status) -> &'static str {
    match status.as_str().to_ascii_lowercase().as_str() {
        "passed" => "#abebc6",
        "failed" => "#f5b7b1",
        _ => "#f9e79f",
    }
}

/// Text for an optional cell; missing values render blank.
pub fn cell(value: Option<&str>) -> String {
    value.unwrap_or("").to_string()
}

/// Minutes with one decimal, or blank for a gap.
pub fn minutes(value: Option<f64>) -> String {
    match value {
        Some(m) if m.is_finite() => format!("{:.1}", m),
        _ => String::new(),
    }
}
