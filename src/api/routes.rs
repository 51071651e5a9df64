//! API route definitions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use thiserror::Error;
use tracing::{error, info};

use super::state::AppState;
use crate::storage::{DataAccessError, StoredRow};

pub fn api_routes() -> Router<AppState> {
    Router::new().route("/executions", get(list_executions))
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::DataAccess(e) => {
                error!(error = %e, "Error querying the database");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error querying the database",
                )
                    .into_response()
            }
        }
    }
}

async fn list_executions(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredRow>>, ApiError> {
    let repo = state.repo.clone();
    let rows = tokio::task::spawn_blocking(move || repo.fetch_all())
        .await
        .map_err(|e| DataAccessError::Aborted(e.to_string()))??;

    info!(count = rows.len(), "served executions");
    Ok(Json(rows))
}
