use std::sync::Arc;

use crate::storage::ExecutionRepository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn ExecutionRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn ExecutionRepository>) -> Self {
        Self { repo }
    }
}
