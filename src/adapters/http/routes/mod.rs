pub mod join;
pub mod leaderboard;
pub mod status;

use axum::Router;

use crate::{adapters::http::app_state::AppState, app_error::AppError};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(join::router())
        .merge(status::router())
        .merge(leaderboard::router())
}

/// Method fallback for every route, so a wrong verb gets the JSON error body.
async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
