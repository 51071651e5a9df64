//! Dashboard view model: what each screen shows, independent of any toolkit.

use serde::Serialize;

use super::format::{
    cell, detail_border_color, percent_bars, status_badge, status_color, PercentBar, StatusBadge,
    FAILED_COLOR, INCOMPLETE_COLOR, PASSED_COLOR,
};
use crate::aggregate::{
    chart_series, derive_row, duration_series, filter_by_status, status_breakdown, summarize,
    ChartSeries, DerivedRow, DurationSeries,
};
use crate::model::{ExecutionId, ExecutionRecord};
use crate::selection::SelectionState;

/// One summary tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub title: &'static str,
    pub value: u64,
    pub color: Option<&'static str>,
}

/// A row of the all-executions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRow {
    pub execution_id: Option<ExecutionId>,
    pub test_case_count: u64,
    pub name: String,
    pub derived: DerivedRow,
    pub pass: PercentBar,
    pub fail: PercentBar,
    pub incomplete: PercentBar,
    pub failed: u64,
    pub incomplete_count: u64,
    pub status: StatusBadge,
    pub start_time: String,
    pub end_time: String,
}

/// The single row of the detail table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub execution_id: String,
    pub name: String,
    pub status: StatusBadge,
    pub start_time: String,
    pub end_time: String,
    pub test_case_count: u64,
    pub passed: u64,
    pub failed: u64,
    pub incomplete: u64,
}

/// One bar of the per-execution status chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBar {
    pub label: String,
    pub count: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum DashboardView {
    Overview {
        filter: String,
        tiles: Vec<Tile>,
        cases_chart: ChartSeries,
        duration_chart: DurationSeries,
        rows: Vec<ExecutionRow>,
    },
    Detail {
        title: String,
        border_color: &'static str,
        tiles: Vec<Tile>,
        row: DetailRow,
        status_chart: Vec<StatusBar>,
    },
}

/// Build the screen for `records` under `state`.
///
/// A selection that resolves in `records` shows its detail; otherwise the
/// overview of the filtered record set is shown.
pub fn build_view(records: &[ExecutionRecord], state: &SelectionState) -> DashboardView {
    match state.current(records) {
        Some(record) => detail_view(record),
        None => overview(records, state),
    }
}

fn overview(records: &[ExecutionRecord], state: &SelectionState) -> DashboardView {
    let visible = filter_by_status(records, state.filter().as_str());
    let summary = summarize(visible.iter().copied());

    let tiles = vec![
        Tile {
            title: "Executions",
            value: summary.total as u64,
            color: None,
        },
        Tile {
            title: "Passed",
            value: summary.passed_count as u64,
            color: Some(PASSED_COLOR),
        },
        Tile {
            title: "Failed",
            value: summary.failed_count as u64,
            color: Some(FAILED_COLOR),
        },
        Tile {
            title: "Incomplete",
            value: summary.incomplete_count as u64,
            color: Some(INCOMPLETE_COLOR),
        },
    ];

    DashboardView::Overview {
        filter: state.filter().to_string(),
        tiles,
        cases_chart: chart_series(visible.iter().copied()),
        duration_chart: duration_series(visible.iter().copied()),
        rows: visible.iter().copied().map(execution_row).collect(),
    }
}

pub fn execution_row(record: &ExecutionRecord) -> ExecutionRow {
    let derived = derive_row(record);
    let [pass, fail, incomplete] = percent_bars(&derived);
    ExecutionRow {
        execution_id: record.execution_id.clone(),
        test_case_count: record.test_cases(),
        name: record.name().to_string(),
        derived,
        pass,
        fail,
        incomplete,
        failed: record.failed(),
        incomplete_count: record.incomplete(),
        status: status_badge(&record.status),
        start_time: cell(record.start_time.as_deref()),
        end_time: cell(record.end_time.as_deref()),
    }
}

fn detail_view(record: &ExecutionRecord) -> DashboardView {
    let tiles = vec![
        Tile {
            title: "Test Cases",
            value: record.test_cases(),
            color: None,
        },
        Tile {
            title: "Passed",
            value: record.passed(),
            color: Some(PASSED_COLOR),
        },
        Tile {
            title: "Failed",
            value: record.failed(),
            color: Some(FAILED_COLOR),
        },
        Tile {
            title: "Incomplete",
            value: record.incomplete(),
            color: Some(INCOMPLETE_COLOR),
        },
    ];

    let status_chart = status_breakdown(record)
        .iter()
        .map(|(status, count)| StatusBar {
            label: status.as_str().to_string(),
            count: *count,
            color: status_color(status),
        })
        .collect();

    DashboardView::Detail {
        title: format!("Execution Data for {}", record.name()),
        border_color: detail_border_color(&record.status),
        tiles,
        row: DetailRow {
            execution_id: record
                .execution_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            name: record.name().to_string(),
            status: status_badge(&record.status),
            start_time: cell(record.start_time.as_deref()),
            end_time: cell(record.end_time.as_deref()),
            test_case_count: record.test_cases(),
            passed: record.passed(),
            failed: record.failed(),
            incomplete: record.incomplete(),
        },
        status_chart,
    }
}

impl DashboardView {
    pub fn tiles(&self) -> &[Tile] {
        match self {
            DashboardView::Overview { tiles, .. } | DashboardView::Detail { tiles, .. } => tiles,
        }
    }
}
