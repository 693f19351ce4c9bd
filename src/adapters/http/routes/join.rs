use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;

use crate::{
    adapters::http::{app_state::AppState, routes::method_not_allowed},
    app_error::{AppError, AppResult},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinPayload {
    email: Option<String>,
    referral_code: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/join", post(join).fallback(method_not_allowed))
}

async fn join(
    State(app_state): State<AppState>,
    payload: Result<Json<JoinPayload>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    // An unreadable body carries no usable email.
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "Unreadable join payload");
        AppError::InvalidInput("Invalid email".into())
    })?;

    let result = app_state
        .waitlist_use_cases
        .join(
            payload.email.as_deref().unwrap_or_default(),
            payload.referral_code.as_deref(),
        )
        .await?;

    Ok(Json(result))
}
