use crate::core::error::AppError;
use crate::core::state::AppState;
use crate::security::sessions::CurrentUser;
use crate::tracking::recorder::{history, record_attendance};
use crate::validation::forms::AttendanceForm;
use crate::views::pages;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use std::sync::Arc;

/// Attendance form with the days already marked
///
/// GET /attendance
pub async fn attendance_form(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Html<String> {
    let records = history(&state.store, user.user_id);
    Html(pages::attendance_form(&records))
}

/// POST /attendance
pub async fn attendance_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Form(form): Form<AttendanceForm>,
) -> Result<Redirect, AppError> {
    let result = form
        .validate()
        .map_err(AppError::from)
        .and_then(|attendance| record_attendance(&state.store, user.user_id, attendance));

    match result {
        Ok(_) => {
            state.metrics.increment_attendance_recorded();
            Ok(Redirect::to("/report"))
        }
        Err(e) => {
            state.metrics.increment_rejected_writes();
            Err(e)
        }
    }
}
