// Metrics endpoint

use crate::core::error::MonitoringError;
use crate::core::state::AppState;
use crate::utils::auth::verify_api_key;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    #[serde(default)]
    pub api_key: String,
}

/// Returns JSON with request counters, table sizes, live sessions and uptime.
///
/// Disabled unless `[admin] api_key` is configured; the key must be passed
/// as `?api_key=`.
pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MetricsQuery>,
) -> Result<Response, MonitoringError> {
    let authorized = state
        .config
        .admin
        .api_key
        .as_deref()
        .is_some_and(|expected| verify_api_key(&params.api_key, expected));

    if !authorized {
        warn!("Unauthorized metrics access attempt");
        return Err(MonitoringError::InvalidApiKey);
    }

    let snapshot = state.metrics.get_snapshot(&state.store, &state.sessions);

    Ok((StatusCode::OK, Json(snapshot)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::test_config;
    use crate::metrics::collector::MetricsSnapshot;
    use crate::stores::store::Store;
    use axum::body::Body;
    use http_body_util::BodyExt;

    fn create_test_state() -> Arc<AppState> {
        Arc::new(AppState::new(test_config(), Store::in_memory()))
    }

    fn query(api_key: &str) -> Query<MetricsQuery> {
        Query(MetricsQuery {
            api_key: api_key.to_string(),
        })
    }

    async fn snapshot_of(response: Response) -> MetricsSnapshot {
        let (_, body) = response.into_parts();
        let bytes = Body::new(body).collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_metrics_handler_success() {
        let state = create_test_state();

        let response = metrics_handler(State(state), query("test-api-key"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let snapshot = snapshot_of(response).await;
        assert_eq!(snapshot.registrations, 0);
        assert_eq!(snapshot.users, 0);
        assert!(snapshot.uptime_seconds >= 0);
    }

    #[tokio::test]
    async fn test_metrics_handler_invalid_api_key() {
        let state = create_test_state();

        let result = metrics_handler(State(state), query("wrong-key")).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_metrics_disabled_without_key() {
        let mut config = test_config();
        config.admin.api_key = None;
        let state = Arc::new(AppState::new(config, Store::in_memory()));

        let result = metrics_handler(State(state), query("")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_metrics_handler_with_data() {
        let state = create_test_state();
        state.store.insert_user("alice", "h".to_string()).unwrap();
        state.metrics.increment_registrations();
        state.metrics.increment_reports_served();

        let response = metrics_handler(State(state), query("test-api-key"))
            .await
            .unwrap();
        let snapshot = snapshot_of(response).await;

        assert_eq!(snapshot.registrations, 1);
        assert_eq!(snapshot.reports_served, 1);
        assert_eq!(snapshot.users, 1);
    }
}
