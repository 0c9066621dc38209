use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Bodies name the acting user explicitly; it has to be the session's user.
pub fn ensure_session_user(auth: &AuthUser, uid: Uuid) -> Result<(), ApiError> {
    if auth.user_id != uid {
        tracing::warn!(
            "User '{}' ({}) sent a request for user {}",
            auth.username,
            auth.user_id,
            uid
        );
        return Err(ApiError::forbidden("User id does not match the session."));
    }
    Ok(())
}
