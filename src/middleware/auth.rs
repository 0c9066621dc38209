use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::{
    cookie::{time::Duration as CookieDuration, SameSite},
    Cookie, Cookies,
};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::sessions::Session;
use crate::AppState;

/// Authenticated user context resolved from the session cookie
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
}

impl From<Session> for AuthUser {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.id,
            user_id: session.user_id,
            username: session.username,
        }
    }
}

/// Session middleware for protected routes: resolves the cookie to a live
/// session, slides its expiry, re-issues the cookie and injects `AuthUser`.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_name = &state.config.session.cookie_name;

    let session_id = session_id_from_cookies(&cookies, cookie_name)
        .ok_or_else(|| ApiError::unauthorized("User unauthorized."))?;

    let Some(session) = state.sessions.touch(session_id).await? else {
        tracing::debug!("Rejected expired or unknown session {}", session_id);
        clear_session_cookie(&cookies, cookie_name);
        return Err(ApiError::unauthorized("User unauthorized."));
    };

    set_session_cookie(&cookies, &state.config, session.id);
    request.extensions_mut().insert(AuthUser::from(session));

    Ok(next.run(request).await)
}

/// Session id carried by the request, if the cookie is present and well formed
pub fn session_id_from_cookies(cookies: &Cookies, cookie_name: &str) -> Option<Uuid> {
    cookies
        .get(cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

pub fn set_session_cookie(cookies: &Cookies, config: &AppConfig, session_id: Uuid) {
    let mut cookie = Cookie::new(config.session.cookie_name.clone(), session_id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(config.session.secure_cookie);
    cookie.set_max_age(CookieDuration::minutes(config.session.ttl_minutes));
    cookies.add(cookie);
}

pub fn clear_session_cookie(cookies: &Cookies, cookie_name: &str) {
    let mut cookie = Cookie::new(cookie_name.to_string(), "");
    cookie.set_path("/");
    cookies.remove(cookie);
}
