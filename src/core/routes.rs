// HTTP routes configuration

use crate::core::state::AppState;
use crate::handlers::{attendance, auth, fallback, health, metrics, report, timetable};
use axum::{
    http::{header, HeaderValue},
    middleware,
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Account endpoints
        .route("/register", get(auth::register_form).post(auth::register_handler))
        .route("/login", get(auth::login_form).post(auth::login_handler))
        .route("/logout", get(auth::logout_handler))

        // Session-protected pages
        .route("/", get(timetable::home_handler))
        .route("/log", get(timetable::log_form).post(timetable::log_handler))
        .route(
            "/attendance",
            get(attendance::attendance_form).post(attendance::attendance_handler),
        )
        .route("/report", get(report::report_handler))
        .route("/api/report", get(report::report_json_handler))

        // Operational endpoints
        .route("/health", get(health::health_handler))
        .route("/metrics", get(metrics::metrics_handler))

        // 404 fallback for all unmatched routes
        .fallback(fallback::fallback_handler)
        .layer(middleware::map_response(no_cache))
        .with_state(state)
}

/// Pages are per-user; browsers and proxies must not keep them
async fn no_cache(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    response
}
