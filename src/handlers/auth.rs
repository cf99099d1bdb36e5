use crate::core::error::AppError;
use crate::core::state::AppState;
use crate::security::gateway;
use crate::security::sessions::{clear_session_cookie, session_cookie, session_token};
use crate::utils::time::current_timestamp;
use crate::validation::forms::{LoginForm, RegisterForm};
use crate::views::pages;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tokio::task;

/// GET /register
pub async fn register_form() -> Html<String> {
    Html(pages::register_form())
}

/// Create an account, then send the browser home (which asks for a login)
///
/// POST /register
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let registration = form.validate().inspect_err(|_| {
        state.metrics.increment_rejected_writes();
    })?;

    let store = Arc::clone(&state.store);
    let result = task::spawn_blocking(move || gateway::register(&store, registration))
        .await
        .map_err(|e| AppError::InternalError(e.into()))?;

    match result {
        Ok(_) => {
            state.metrics.increment_registrations();
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            state.metrics.increment_rejected_writes();
            Err(e)
        }
    }
}

/// Any existing session ends when the login page is shown
///
/// GET /login
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let cookie_name = &state.config.session.cookie_name;
    end_session(&state, &headers);

    (
        [(header::SET_COOKIE, clear_session_cookie(cookie_name))],
        Html(pages::login_form()),
    )
        .into_response()
}

/// Check credentials and start a session
///
/// POST /login
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    end_session(&state, &headers);

    let credentials = form.validate().inspect_err(|_| {
        state.metrics.increment_failed_logins();
    })?;

    let verify_state = Arc::clone(&state);
    let result = task::spawn_blocking(move || {
        gateway::verify(
            &verify_state.store,
            &verify_state.login_limiter,
            &credentials,
            current_timestamp(),
        )
    })
    .await
    .map_err(|e| AppError::InternalError(e.into()))?;

    let user_id = result.inspect_err(|_| {
        state.metrics.increment_failed_logins();
    })?;

    state.metrics.increment_successful_logins();

    let session = &state.config.session;
    let token = state.sessions.create(user_id, current_timestamp());
    let cookie = session_cookie(&session.cookie_name, &token, session.ttl_seconds, session.secure_cookie);

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

/// GET /logout
pub async fn logout_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    end_session(&state, &headers);

    (
        [(
            header::SET_COOKIE,
            clear_session_cookie(&state.config.session.cookie_name),
        )],
        Redirect::to("/"),
    )
        .into_response()
}

fn end_session(state: &AppState, headers: &HeaderMap) {
    if let Some(token) = session_token(headers, &state.config.session.cookie_name) {
        state.sessions.revoke(&token);
    }
}
