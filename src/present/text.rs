//! Plain-text rendering of a [`DashboardView`] for the terminal.

use std::fmt::Write;

use super::format::minutes;
use super::view::DashboardView;

/// Render `view` as a fixed-width text report.
pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = match view {
        DashboardView::Overview { .. } => render_overview(view, &mut out),
        DashboardView::Detail { .. } => render_detail(view, &mut out),
    };
    out
}

fn render_tiles(view: &DashboardView, out: &mut String) -> std::fmt::Result {
    let line = view
        .tiles()
        .iter()
        .map(|t| format!("{}: {}", t.title, t.value))
        .collect::<Vec<_>>()
        .join("   ");
    writeln!(out, "{}", line)
}

fn render_overview(view: &DashboardView, out: &mut String) -> std::fmt::Result {
    let DashboardView::Overview {
        filter,
        cases_chart,
        duration_chart,
        rows,
        ..
    } = view
    else {
        return Ok(());
    };

    writeln!(out, "\n=== Test Executions (filter: {}) ===", filter)?;
    render_tiles(view, out)?;

    if rows.is_empty() {
        writeln!(out, "\nNo executions available")?;
        return Ok(());
    }

    writeln!(out, "\nPassed, Failed, and Incomplete Cases per Execution")?;
    writeln!(out, "{:<25} | {:>6} | {:>6} | {:>10}", "Name", "Passed", "Failed", "Incomplete")?;
    writeln!(out, "{:-<25}-|-{:-<6}-|-{:-<6}-|-{:-<10}", "", "", "", "")?;
    for i in 0..cases_chart.labels.len() {
        writeln!(
            out,
            "{:<25} | {:>6} | {:>6} | {:>10}",
            cases_chart.labels[i], cases_chart.passed[i], cases_chart.failed[i], cases_chart.incomplete[i]
        )?;
    }

    writeln!(out, "\nExecution Times (in minutes)")?;
    for (label, value) in duration_chart.labels.iter().zip(&duration_chart.minutes) {
        writeln!(out, "{:<25} | {:>8}", label, minutes(*value))?;
    }

    writeln!(out, "\nExecution Data")?;
    writeln!(
        out,
        "{:<8} | {:<25} | {:>5} | {:>8} | {:>8} | {:>10} | {:<10}",
        "ID", "Test Case Name", "Cases", "Pass", "Fail", "Incomplete", "Status"
    )?;
    writeln!(
        out,
        "{:-<8}-|-{:-<25}-|-{:-<5}-|-{:-<8}-|-{:-<8}-|-{:-<10}-|-{:-<10}",
        "", "", "", "", "", "", ""
    )?;
    for row in rows {
        let id = row
            .execution_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        writeln!(
            out,
            "{:<8} | {:<25} | {:>5} | {:>8} | {:>8} | {:>10} | {:<10}",
            id,
            row.name,
            row.test_case_count,
            row.pass.text,
            row.fail.text,
            row.incomplete.text,
            row.status.label
        )?;
    }

    Ok(())
}

fn render_detail(view: &DashboardView, out: &mut String) -> std::fmt::Result {
    let DashboardView::Detail {
        title,
        row,
        status_chart,
        ..
    } = view
    else {
        return Ok(());
    };

    writeln!(out, "\n=== {} ===", title)?;
    render_tiles(view, out)?;

    writeln!(out)?;
    for (label, value) in [
        ("Execution ID", row.execution_id.clone()),
        ("Name", row.name.clone()),
        ("Status", row.status.label.clone()),
        ("Start Time", row.start_time.clone()),
        ("End Time", row.end_time.clone()),
        ("Total Test Cases", row.test_case_count.to_string()),
        ("Passed", row.passed.to_string()),
        ("Failed", row.failed.to_string()),
        ("Incomplete", row.incomplete.to_string()),
    ] {
        writeln!(out, "{:<18} : {}", label, value)?;
    }

    writeln!(out, "\nExecution Status for {}", row.name)?;
    for bar in status_chart {
        writeln!(out, "{:<12} | {}", bar.label, bar.count)?;
    }

    Ok(())
}
