use crate::core::error::AppError;
use crate::core::state::AppState;
use crate::security::sessions::CurrentUser;
use crate::tracking::timetable::{add_slot, weekly_view};
use crate::validation::forms::SlotForm;
use crate::views::pages;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use std::sync::Arc;

/// Weekly timetable of the logged-in user
///
/// GET /
pub async fn home_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Html<String> {
    let week = weekly_view(&state.store, user.user_id);
    Html(pages::home(&week))
}

/// GET /log
pub async fn log_form(_user: CurrentUser) -> Html<String> {
    Html(pages::log_form())
}

/// POST /log
pub async fn log_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Form(form): Form<SlotForm>,
) -> Result<Redirect, AppError> {
    let result = form
        .validate()
        .map_err(AppError::from)
        .and_then(|slot| add_slot(&state.store, user.user_id, slot));

    match result {
        Ok(_) => {
            state.metrics.increment_slots_added();
            Ok(Redirect::to("/"))
        }
        Err(e) => {
            state.metrics.increment_rejected_writes();
            Err(e)
        }
    }
}
