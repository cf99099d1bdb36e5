use crate::views::pages;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

pub async fn fallback_handler() -> Response {
    (StatusCode::NOT_FOUND, Html(pages::not_found())).into_response()
}
