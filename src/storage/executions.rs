//! Read-only access to the execution summary table.

use rusqlite::types::ValueRef;
use serde_json::{Map, Number, Value};
use tracing::debug;

use super::schema::EXECUTION_TABLE;
use super::{DataAccessError, Pool};

/// One table row as read: column name to cell value, every column included.
pub type StoredRow = Map<String, Value>;

/// Source of the full execution record set.
///
/// Implementations return every row in store order, column for column, with
/// no filtering, paging or reinterpretation. Calls may block.
pub trait ExecutionRepository: Send + Sync {
    fn fetch_all(&self) -> Result<Vec<StoredRow>, DataAccessError>;
}

pub struct SqliteExecutionRepository {
    pool: Pool,
}

impl SqliteExecutionRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

impl ExecutionRepository for SqliteExecutionRepository {
    fn fetch_all(&self) -> Result<Vec<StoredRow>, DataAccessError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("SELECT * FROM {EXECUTION_TABLE}"))?;

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let rows = stmt
            .query_map([], |row| {
                let mut object = Map::with_capacity(columns.len());
                for (i, name) in columns.iter().enumerate() {
                    object.insert(name.clone(), column_value(row.get_ref(i)?));
                }
                Ok(object)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = rows.len(), "fetched execution rows");
        Ok(rows)
    }
}

/// Map a SQLite cell onto the JSON value the API hands out.
fn column_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        // Binary columns have no JSON form.
        ValueRef::Blob(_) => Value::Null,
    }
}
