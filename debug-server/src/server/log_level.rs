//! `/log-level` handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::info;

use super::routes::AppState;
use crate::logging::{level_name, parse_level};

/// `GET /log-level`
pub async fn get_level(State(state): State<AppState>) -> String {
    format!("{}\n", level_name(state.sink.min_level()))
}

/// `PUT|POST /log-level` with the level name as the body.
///
/// An empty body reads the level instead of writing it. An unrecognised
/// name answers 400 and leaves the sink untouched.
pub async fn set_level(State(state): State<AppState>, body: String) -> Response {
    if body.trim().is_empty() {
        return get_level(State(state)).await.into_response();
    }

    match parse_level(&body) {
        Ok(level) => {
            let previous = state.sink.min_level();
            state.sink.set_min_level(level);
            info!("Log level changed from {} to {}", level_name(previous), level_name(level));
            (StatusCode::OK, format!("log level set to {}\n", level_name(level))).into_response()
        }
        Err(e) => (StatusCode::BAD_REQUEST, format!("{e}\n")).into_response(),
    }
}
