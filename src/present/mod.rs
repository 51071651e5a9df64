//! Presentation layer: the dashboard controller and its view model.

pub mod format;
pub mod text;
pub mod view;

pub use self::text::render_text;
pub use self::view::{build_view, DashboardView};

use tracing::{debug, info, warn};

use crate::client::{ExecutionSource, LoadState};
use crate::export::{self, ExportContext, ExportError, ExportFile, ExportFormat};
use crate::model::{ExecutionId, ExecutionRecord};
use crate::selection::{SelectionState, StatusFilter};

/// Owns the data-loading task and the selection/filter state for one session.
///
/// Fetches happen only when [`Dashboard::refresh`] is called. There is no
/// polling, no timeout and no retry.
pub struct Dashboard<S> {
    source: S,
    load: LoadState,
    selection: SelectionState,
}

impl<S: ExecutionSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            load: LoadState::Idle,
            selection: SelectionState::new(),
        }
    }

    /// Fetch the record set and replace the current one wholesale.
    ///
    /// On failure the dashboard shows no data rather than an error screen.
    pub async fn refresh(&mut self) {
        self.load = LoadState::Loading;
        match self.source.fetch().await {
            Ok(records) => {
                if self.selection.retain_in(&records) {
                    debug!("selected execution no longer present, selection cleared");
                }
                info!(count = records.len(), "dashboard loaded");
                self.load = LoadState::Loaded(records);
            }
            Err(e) => {
                warn!(error = %e, "failed to load executions");
                self.load = LoadState::Failed(e.to_string());
            }
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn records(&self) -> &[ExecutionRecord] {
        self.load.records()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Select the execution with `id` in the loaded set.
    /// Returns `false` when no such execution is loaded.
    pub fn select(&mut self, id: &ExecutionId) -> bool {
        let records = self.load.records();
        match records.iter().find(|r| r.execution_id.as_ref() == Some(id)) {
            Some(record) => self.selection.select(record),
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.selection.set_filter(filter);
    }

    /// Navigation reset: forget selection and filter.
    pub fn reset(&mut self) {
        self.selection.reset();
    }

    pub fn selected(&self) -> Option<&ExecutionRecord> {
        self.selection.current(self.load.records())
    }

    pub fn view(&self) -> DashboardView {
        build_view(self.load.records(), &self.selection)
    }

    /// Export the selected execution, if any.
    pub fn export_selected(
        &self,
        context: ExportContext,
        format: ExportFormat,
    ) -> Result<Option<ExportFile>, ExportError> {
        self.selected()
            .map(|record| export::render(record, context, format))
            .transpose()
    }
}
