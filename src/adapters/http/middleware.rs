use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN,
        },
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::app_state::AppState;

/// Grants credentialed cross-origin access to allow-listed origins and
/// answers every preflight with an empty 200 without reaching the routes.
pub async fn cors_gate(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let granted = allowed_origin(request.headers(), &app_state.config.allowed_origins);

    let mut response = if *request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    if let Some(origin) = granted {
        apply_cors_headers(response.headers_mut(), origin);
    }

    response
}

/// The request's `Origin`, if it exactly matches an allow-list entry.
pub fn allowed_origin(headers: &HeaderMap, allow_list: &[HeaderValue]) -> Option<HeaderValue> {
    let origin = headers.get(ORIGIN)?;
    allow_list
        .iter()
        .any(|allowed| allowed == origin)
        .then(|| origin.clone())
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}
