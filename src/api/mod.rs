//! API layer -- axum routes, handlers, and middleware.

mod routes;
pub mod state;

pub use self::routes::ApiError;

use self::state::AppState;
use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Build the application router with all API routes.
///
/// Cross-origin reads are allowed from `config.allowed_origin` only.
pub fn router(state: AppState, config: &ServerConfig) -> Result<Router> {
    let origin: HeaderValue = config
        .allowed_origin
        .parse()
        .with_context(|| format!("invalid allowed_origin: {}", config.allowed_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET]);

    Ok(Router::new()
        .merge(routes::api_routes())
        .fallback(fallback)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn fallback() -> (axum::http::StatusCode, &'static str) {
    (axum::http::StatusCode::NOT_FOUND, "not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DataAccessError, ExecutionRepository, StoredRow};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    struct FixedRepo(Vec<Value>);

    impl ExecutionRepository for FixedRepo {
        fn fetch_all(&self) -> Result<Vec<StoredRow>, DataAccessError> {
            Ok(self
                .0
                .iter()
                .filter_map(|v| v.as_object().cloned())
                .collect())
        }
    }

    struct BrokenRepo;

    impl ExecutionRepository for BrokenRepo {
        fn fetch_all(&self) -> Result<Vec<StoredRow>, DataAccessError> {
            Err(DataAccessError::Query(rusqlite::Error::QueryReturnedNoRows))
        }
    }

    fn app(repo: impl ExecutionRepository + 'static) -> Router {
        router(AppState::new(Arc::new(repo)), &ServerConfig::default()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), 1_000_000)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_executions_returns_records() {
        let app = app(FixedRepo(vec![
            json!({ "ExecutionID": 1, "Name": "Login", "Status": "Passed", "TestCaseCount": 4 }),
            json!({ "ExecutionID": 2, "Name": "Checkout", "Status": "Failed", "EndTime": null }),
        ]));

        let request = Request::builder()
            .uri("/executions")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ExecutionID"], 1);
        assert_eq!(rows[0]["Name"], "Login");
        assert_eq!(rows[0]["TestCaseCount"], 4);
        assert_eq!(rows[1]["Status"], "Failed");
        assert!(rows[1]["EndTime"].is_null());
    }

    #[tokio::test]
    async fn test_executions_served_as_stored() {
        let stored = json!({ "ExecutionID": 1, "Name": "x", "Status": null, "TestCaseCount": "12", "PassedCount": -3 });
        let app = app(FixedRepo(vec![stored.clone()]));

        let request = Request::builder()
            .uri("/executions")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json, json!([stored]));
    }

    #[tokio::test]
    async fn test_executions_failure_is_500_without_data() {
        let app = app(BrokenRepo);

        let request = Request::builder()
            .uri("/executions")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_bytes(response).await;
        assert_eq!(body, b"Error querying the database");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let app = app(FixedRepo(Vec::new()));

        let request = Request::builder()
            .uri("/executions/1")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = app(FixedRepo(Vec::new()));

        let request = Request::builder()
            .uri("/executions")
            .header("Origin", "http://localhost:3001")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:3001"
        );
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let config = ServerConfig {
            allowed_origin: "bad\norigin".to_string(),
            ..ServerConfig::default()
        };
        assert!(router(AppState::new(Arc::new(BrokenRepo)), &config).is_err());
    }
}
