// handlers/public/auth/logout.rs - GET /api/logout handler

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use tower_cookies::Cookies;

use crate::middleware::auth::{clear_session_cookie, session_id_from_cookies};
use crate::AppState;

/// GET /api/logout - Drop the session (if any) and redirect to the app root
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> impl IntoResponse {
    let cookie_name = &state.config.session.cookie_name;

    if let Some(session_id) = session_id_from_cookies(&cookies, cookie_name) {
        match state.sessions.load(session_id).await {
            Ok(Some(session)) => tracing::info!("User '{}' logged out", session.username),
            Ok(None) => tracing::debug!("Logout with expired or unknown session {}", session_id),
            Err(e) => tracing::error!("Failed to load session {}: {}", session_id, e),
        }
        if let Err(e) = state.sessions.destroy(session_id).await {
            tracing::error!("Failed to destroy session {}: {}", session_id, e);
        }
    }
    clear_session_cookie(&cookies, cookie_name);

    (StatusCode::FOUND, [(header::LOCATION, "/")])
}
