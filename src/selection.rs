//! Selection and status-filter state for the dashboard.
//!
//! The selection is a key into the live record set, never a copy of a record,
//! so a re-fetch either resolves to the fresh row or drops the selection.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::model::{ExecutionId, ExecutionRecord, Status};

/// Active status filter. `All` is the empty filter; any non-empty text,
/// including `"All"`, filters on that exact status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    /// The value handed to [`crate::aggregate::filter_by_status`].
    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::All => "",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" => StatusFilter::All,
            other => StatusFilter::Only(Status::from(other)),
        })
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<ExecutionId>,
    filter: StatusFilter,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `record`, replacing any previous selection.
    ///
    /// Returns `false` and leaves the state untouched when the record carries
    /// no `ExecutionID`.
    pub fn select(&mut self, record: &ExecutionRecord) -> bool {
        match &record.execution_id {
            Some(id) => {
                self.selected = Some(id.clone());
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Changing the filter keeps the current selection.
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    /// Full reset: no selection, no filter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn filter(&self) -> &StatusFilter {
        &self.filter
    }

    pub fn selected_id(&self) -> Option<&ExecutionId> {
        self.selected.as_ref()
    }

    /// Resolve the selection against the live record set.
    pub fn current<'a>(&self, records: &'a [ExecutionRecord]) -> Option<&'a ExecutionRecord> {
        let id = self.selected.as_ref()?;
        records
            .iter()
            .find(|r| r.execution_id.as_ref() == Some(id))
    }

    /// Drop the selection if `records` no longer contains it.
    /// Returns whether a selection was dropped.
    pub fn retain_in(&mut self, records: &[ExecutionRecord]) -> bool {
        if self.selected.is_some() && self.current(records).is_none() {
            self.selected = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ExecutionRecord> {
        vec![
            ExecutionRecord::new(1, "a", Status::Passed),
            ExecutionRecord::new(2, "b", Status::Failed),
        ]
    }

    #[test]
    fn test_select_replaces_previous() {
        let records = records();
        let mut state = SelectionState::new();

        assert!(state.select(&records[0]));
        assert!(state.select(&records[1]));

        assert_eq!(state.selected_id(), Some(&ExecutionId::Number(2)));
        assert_eq!(state.current(&records).unwrap().name(), "b");
    }

    #[test]
    fn test_clear_selection() {
        let records = records();
        let mut state = SelectionState::new();
        state.select(&records[0]);
        state.clear_selection();

        assert!(state.selected_id().is_none());
        assert!(state.current(&records).is_none());
    }

    #[test]
    fn test_filter_does_not_clear_selection() {
        let records = records();
        let mut state = SelectionState::new();
        state.select(&records[0]);
        state.set_filter("Failed".parse().unwrap());

        assert_eq!(state.filter(), &StatusFilter::Only(Status::Failed));
        assert!(state.current(&records).is_some());
    }

    #[test]
    fn test_reset_clears_both() {
        let records = records();
        let mut state = SelectionState::new();
        state.select(&records[1]);
        state.set_filter(StatusFilter::Only(Status::Passed));
        state.reset();

        assert_eq!(state, SelectionState::default());
    }

    #[test]
    fn test_record_without_id_is_not_selectable() {
        let mut record = ExecutionRecord::new(9, "orphan", Status::Passed);
        record.execution_id = None;
        let mut state = SelectionState::new();

        assert!(!state.select(&record));
        assert!(state.selected_id().is_none());
    }

    #[test]
    fn test_selection_tracks_live_record() {
        let mut state = SelectionState::new();
        state.select(&records()[1]);

        let refreshed = vec![ExecutionRecord::new(2, "b (rerun)", Status::Passed)];
        assert!(!state.retain_in(&refreshed));
        assert_eq!(state.current(&refreshed).unwrap().name(), "b (rerun)");
    }

    #[test]
    fn test_selection_invalidated_when_row_disappears() {
        let mut state = SelectionState::new();
        state.select(&records()[0]);

        let refreshed = vec![ExecutionRecord::new(2, "b", Status::Failed)];
        assert!(state.retain_in(&refreshed));
        assert!(state.selected_id().is_none());
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "All".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(Status::Other("All".into()))
        );
        assert_eq!(
            "Incomplete".parse::<StatusFilter>().unwrap().as_str(),
            "Incomplete"
        );
    }

    #[test]
    fn test_literal_all_status_is_filterable() {
        let records = vec![
            ExecutionRecord::new(1, "a", Status::Other("All".into())),
            ExecutionRecord::new(2, "b", Status::Passed),
        ];
        let filter: StatusFilter = "All".parse().unwrap();
        let kept = crate::aggregate::filter_by_status(&records, filter.as_str());

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name(), "a");
    }
}
