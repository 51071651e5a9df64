//! Execution records as they come out of the `ExecutionSummary` table.
//!
//! Decoding is lenient. The store may hand back nulls, negative counts or stray
//! columns: missing counts read as zero, missing timestamps read as a gap, and
//! unknown columns are carried through so a row re-serializes verbatim.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// An element of a fetched record set that could not be read as a record at all.
#[derive(Debug, Error)]
#[error("record {index} is malformed: {reason}")]
pub struct MalformedRecordError {
    pub index: usize,
    pub reason: String,
}

/// Store-assigned execution identifier.
///
/// The table may key rows by integer identity or by text. Integral reals
/// (SQLite hands back `1.0` from a REAL column) read as numbers; any other
/// value is kept as its JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ExecutionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionId::Number(n) => write!(f, "{}", n),
            ExecutionId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ExecutionId {
    fn from(n: i64) -> Self {
        ExecutionId::Number(n)
    }
}

impl ExecutionId {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => ExecutionId::Number(i),
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        ExecutionId::Number(f as i64)
                    }
                    _ => ExecutionId::Text(n.to_string()),
                },
            },
            Value::String(s) => ExecutionId::Text(s),
            other => ExecutionId::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for ExecutionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ExecutionId::from_json)
    }
}

impl std::str::FromStr for ExecutionId {
    type Err = std::convert::Infallible;

    /// Numeric text becomes a numeric id so it compares equal to integer keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(n) => ExecutionId::Number(n),
            Err(_) => ExecutionId::Text(s.to_string()),
        })
    }
}

/// Coarse outcome of an execution. Open set: anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Passed,
    Failed,
    Incomplete,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Passed => "Passed",
            Status::Failed => "Failed",
            Status::Incomplete => "Incomplete",
            Status::Other(s) => s,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Other(String::new())
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        match s {
            "Passed" => Status::Passed,
            "Failed" => Status::Failed,
            "Incomplete" => Status::Incomplete,
            other => Status::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::String(s)) => Status::from(s.as_str()),
            Some(Value::Null) | None => Status::default(),
            Some(other) => Status::Other(other.to_string()),
        })
    }
}

/// One row of the execution summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    #[serde(rename = "ExecutionID", default)]
    pub execution_id: Option<ExecutionId>,
    #[serde(rename = "Name", default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Status,
    #[serde(rename = "StartTime", default, deserialize_with = "lenient_text")]
    pub start_time: Option<String>,
    #[serde(rename = "EndTime", default, deserialize_with = "lenient_text")]
    pub end_time: Option<String>,
    #[serde(rename = "TestCaseCount", default, deserialize_with = "lenient_count")]
    pub test_case_count: Option<u64>,
    #[serde(rename = "PassedCount", default, deserialize_with = "lenient_count")]
    pub passed_count: Option<u64>,
    #[serde(rename = "FailedCount", default, deserialize_with = "lenient_count")]
    pub failed_count: Option<u64>,
    #[serde(rename = "IncompleteCount", default, deserialize_with = "lenient_count")]
    pub incomplete_count: Option<u64>,
    /// Columns this crate does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ExecutionRecord {
    pub fn new(id: impl Into<ExecutionId>, name: &str, status: Status) -> Self {
        Self {
            execution_id: Some(id.into()),
            name: Some(name.to_string()),
            status,
            start_time: None,
            end_time: None,
            test_case_count: None,
            passed_count: None,
            failed_count: None,
            incomplete_count: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_counts(mut self, total: u64, passed: u64, failed: u64, incomplete: u64) -> Self {
        self.test_case_count = Some(total);
        self.passed_count = Some(passed);
        self.failed_count = Some(failed);
        self.incomplete_count = Some(incomplete);
        self
    }

    pub fn with_times(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_time = start.map(str::to_string);
        self.end_time = end.map(str::to_string);
        self
    }

    /// Display label; empty when the store left it out.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn test_cases(&self) -> u64 {
        self.test_case_count.unwrap_or(0)
    }

    pub fn passed(&self) -> u64 {
        self.passed_count.unwrap_or(0)
    }

    pub fn failed(&self) -> u64 {
        self.failed_count.unwrap_or(0)
    }

    pub fn incomplete(&self) -> u64 {
        self.incomplete_count.unwrap_or(0)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time.as_deref().and_then(parse_timestamp)
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.end_time.as_deref().and_then(parse_timestamp)
    }
}

/// Decode a fetched JSON array element by element.
///
/// Elements that are not objects are reported and skipped; everything else
/// decodes because every field is lenient.
pub fn decode_records(values: Vec<Value>) -> (Vec<ExecutionRecord>, Vec<MalformedRecordError>) {
    let mut records = Vec::with_capacity(values.len());
    let mut malformed = Vec::new();

    for (index, value) in values.into_iter().enumerate() {
        if !value.is_object() {
            malformed.push(MalformedRecordError {
                index,
                reason: format!("expected an object, got {}", json_kind(&value)),
            });
            continue;
        }
        match serde_json::from_value::<ExecutionRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => malformed.push(MalformedRecordError {
                index,
                reason: e.to_string(),
            }),
        }
    }

    (records, malformed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a stored timestamp. Naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| match v {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}
