use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::cookies::ACCESS_TOKEN_COOKIE;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context resolved from the access-token cookie
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Cookie authentication middleware for protected routes. A missing cookie
/// and a failed verification are both a plain 401; the failure kind is only
/// logged, never surfaced to the caller.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let user_id = state.tokens.verify_access(&token).map_err(|e| {
        tracing::debug!("access token rejected: {}", e);
        ApiError::unauthorized("Unauthorized")
    })?;

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}
