use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{app_state::AppState, routes::method_not_allowed},
    app_error::AppResult,
    domain::entities::waitlist_entry::LeaderboardEntry,
};

#[derive(Deserialize, Default)]
struct LeaderboardQuery {
    // Kept as text so a malformed value falls back to the default limit.
    limit: Option<String>,
}

#[derive(Serialize)]
struct LeaderboardResponse {
    leaderboard: Vec<LeaderboardEntry>,
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/leaderboard",
        get(leaderboard)
            .head(method_not_allowed)
            .fallback(method_not_allowed),
    )
}

async fn leaderboard(
    State(app_state): State<AppState>,
    query: Result<Query<LeaderboardQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let query = query.map(|Query(q)| q).unwrap_or_default();

    let leaderboard = app_state
        .waitlist_use_cases
        .leaderboard(query.limit.as_deref())
        .await?;

    Ok(Json(LeaderboardResponse { leaderboard }))
}
