use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::set_session_cookie;
use crate::AppState;

/// Login and registration body: `{usr, pwd}`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    pub usr: String,
    pub pwd: String,
}

/// Session identity returned to the client: `{uid, usr}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub uid: Uuid,
    pub usr: String,
}

/// Open a server-side session for the user and hand the browser its cookie
pub async fn start_session(
    state: &AppState,
    cookies: &Cookies,
    user_id: Uuid,
    username: &str,
) -> Result<SessionInfo, ApiError> {
    let session = state.sessions.create(user_id, username).await?;
    set_session_cookie(cookies, &state.config, session.id);

    Ok(SessionInfo {
        uid: session.user_id,
        usr: session.username,
    })
}
