//! Router and shared handler state

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;

use super::{log_level, pprof};
use crate::logging::LevelSink;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn LevelSink>,
    pub max_profile_duration: Duration,
}

impl AppState {
    pub fn new(sink: Arc<dyn LevelSink>, max_profile_duration: Duration) -> Self {
        Self { sink, max_profile_duration }
    }
}

/// Build the debug router. Methods not listed answer 405.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/log-level",
            get(log_level::get_level).put(log_level::set_level).post(log_level::set_level),
        )
        .route("/debug/pprof", get(pprof::redirect_index))
        .route("/debug/pprof/", get(pprof::index))
        .route("/debug/pprof/:profile", get(pprof::profile))
        .with_state(state)
}
