use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::{
    adapters::http::{app_state::AppState, routes::method_not_allowed},
    app_error::{AppError, AppResult},
};

#[derive(Deserialize)]
struct StatusQuery {
    email: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/status",
        get(status)
            .head(method_not_allowed)
            .fallback(method_not_allowed),
    )
}

async fn status(
    State(app_state): State<AppState>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(query) = query.map_err(|_| AppError::InvalidInput("Email required".into()))?;

    let status = app_state
        .waitlist_use_cases
        .status(query.email.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(status))
}
