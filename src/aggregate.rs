//! Summary statistics and chart series derived from a record set.
//!
//! Everything here is a pure function of its input.

use serde::Serialize;

use crate::model::{ExecutionRecord, Status};

/// Status counts over a record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub passed_count: usize,
    pub failed_count: usize,
    pub incomplete_count: usize,
}

/// Percentages of a single record, each in [0, 100] and rounded to 2 places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedRow {
    #[serde(rename = "PassPercentage")]
    pub pass_percentage: f64,
    #[serde(rename = "FailPercentage")]
    pub fail_percentage: f64,
    #[serde(rename = "IncompletePercentage")]
    pub incomplete_percentage: f64,
}

impl DerivedRow {
    /// `[pass, fail, incomplete]` formatted with two decimals.
    pub fn formatted(&self) -> [String; 3] {
        [
            format!("{:.2}", self.pass_percentage),
            format!("{:.2}", self.fail_percentage),
            format!("{:.2}", self.incomplete_percentage),
        ]
    }
}

/// Cases per execution, one entry per record in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub passed: Vec<u64>,
    pub failed: Vec<u64>,
    pub incomplete: Vec<u64>,
}

/// Execution time per record; `None` is a gap in the chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DurationSeries {
    pub labels: Vec<String>,
    pub minutes: Vec<Option<f64>>,
}

/// `total` counts every record; unknown statuses land in no bucket.
pub fn summarize<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a ExecutionRecord>,
{
    let mut summary = Summary::default();

    for record in records {
        summary.total += 1;
        match record.status {
            Status::Passed => summary.passed_count += 1,
            Status::Failed => summary.failed_count += 1,
            Status::Incomplete => summary.incomplete_count += 1,
            Status::Other(_) => {}
        }
    }

    summary
}

/// Records whose status equals `status` exactly. Empty `status` keeps everything.
pub fn filter_by_status<'a>(records: &'a [ExecutionRecord], status: &str) -> Vec<&'a ExecutionRecord> {
    if status.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| r.status.as_str() == status)
        .collect()
}

pub fn derive_row(record: &ExecutionRecord) -> DerivedRow {
    let total = record.test_cases();
    DerivedRow {
        pass_percentage: percentage(record.passed(), total),
        fail_percentage: percentage(record.failed(), total),
        incomplete_percentage: percentage(record.incomplete(), total),
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = (count as f64 * 100.0) / total as f64;
    (raw.clamp(0.0, 100.0) * 100.0).round() / 100.0
}

pub fn chart_series<'a, I>(records: I) -> ChartSeries
where
    I: IntoIterator<Item = &'a ExecutionRecord>,
{
    let mut series = ChartSeries::default();
    for record in records {
        series.labels.push(record.name().to_string());
        series.passed.push(record.passed());
        series.failed.push(record.failed());
        series.incomplete.push(record.incomplete());
    }
    series
}

/// `EndTime - StartTime` in minutes, or `None` when either side is missing or
/// unparseable. A negative span is returned as-is.
pub fn execution_duration_minutes(record: &ExecutionRecord) -> Option<f64> {
    let start = record.started_at()?;
    let end = record.ended_at()?;
    Some((end - start).num_milliseconds() as f64 / 60_000.0)
}

pub fn duration_series<'a, I>(records: I) -> DurationSeries
where
    I: IntoIterator<Item = &'a ExecutionRecord>,
{
    let mut series = DurationSeries::default();
    for record in records {
        series.labels.push(record.name().to_string());
        series.minutes.push(execution_duration_minutes(record));
    }
    series
}

/// Passed/Failed/Incomplete case counts of one execution, in that order.
pub fn status_breakdown(record: &ExecutionRecord) -> [(Status, u64); 3] {
    [
        (Status::Passed, record.passed()),
        (Status::Failed, record.failed()),
        (Status::Incomplete, record.incomplete()),
    ]
}
