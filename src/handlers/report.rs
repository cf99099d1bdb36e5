use crate::core::state::AppState;
use crate::models::report::AttendanceReport;
use crate::security::sessions::CurrentUser;
use crate::tracking::report::compute_report;
use crate::views::pages;
use axum::{extract::State, response::Html, Json};
use std::sync::Arc;
use tracing::debug;

fn report_for(state: &AppState, user_id: u32) -> AttendanceReport {
    let report = compute_report(&state.store, user_id, state.config.report.join_mode);
    state.metrics.increment_reports_served();
    debug!(
        user_id = user_id,
        subjects = report.subjects.len(),
        overall = ?report.overall_percentage,
        "Report computed"
    );
    report
}

/// Per-subject attendance and the overall percentage
///
/// GET /report
pub async fn report_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Html<String> {
    let report = report_for(&state, user.user_id);
    Html(pages::report(&report))
}

/// Same figures as `/report`, as JSON
///
/// GET /api/report
pub async fn report_json_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Json<AttendanceReport> {
    Json(report_for(&state, user.user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::test_config;
    use crate::models::attendance::AttendanceStatus;
    use crate::stores::store::Store;
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use std::sync::atomic::Ordering;

    fn create_test_state() -> (Arc<AppState>, CurrentUser) {
        let store = Store::in_memory();
        let user = store.insert_user("alice", "h".to_string()).unwrap();
        store
            .insert_slot(
                user.id,
                "Math".to_string(),
                Weekday::Mon,
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            )
            .unwrap();
        store
            .insert_attendance(
                user.id,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                AttendanceStatus::Present,
            )
            .unwrap();
        store
            .insert_attendance(
                user.id,
                NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                AttendanceStatus::Absent,
            )
            .unwrap();

        let state = Arc::new(AppState::new(test_config(), store));
        (state, CurrentUser { user_id: user.id })
    }

    #[tokio::test]
    async fn test_json_report() {
        let (state, user) = create_test_state();

        let Json(report) = report_json_handler(State(Arc::clone(&state)), user).await;

        let math = &report.subjects["Math"];
        assert_eq!((math.attended, math.absent, math.total), (1, 1, 2));
        assert_eq!(math.percentage, Some(50.0));
        assert_eq!(report.overall_percentage, Some(50.0));
        assert_eq!(state.metrics.reports_served.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_html_report() {
        let (state, user) = create_test_state();

        let Html(page) = report_handler(State(state), user).await;

        assert!(page.contains("Math"));
        assert!(page.contains("50.00"));
    }

    #[tokio::test]
    async fn test_report_without_data() {
        let state = Arc::new(AppState::new(test_config(), Store::in_memory()));
        let user = state.store.insert_user("bob", "h".to_string()).unwrap();

        let Json(report) = report_json_handler(State(state), CurrentUser { user_id: user.id }).await;

        assert!(report.subjects.is_empty());
        assert_eq!(report.overall_percentage, None);
    }
}
