//! Execution summary table.

use anyhow::Result;
use rusqlite::Connection;

/// Table the repository reads from.
pub const EXECUTION_TABLE: &str = "ExecutionSummary";

/// Create the execution summary table if it does not exist yet.
///
/// An existing table is left as it is, extra columns included.
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS ExecutionSummary (
            ExecutionID INTEGER PRIMARY KEY,
            Name TEXT NOT NULL,
            Status TEXT NOT NULL,
            StartTime TEXT,
            EndTime TEXT,
            TestCaseCount INTEGER NOT NULL DEFAULT 0,
            PassedCount INTEGER NOT NULL DEFAULT 0,
            FailedCount INTEGER NOT NULL DEFAULT 0,
            IncompleteCount INTEGER NOT NULL DEFAULT 0
        );",
    )?;

    Ok(())
}
