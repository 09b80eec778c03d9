use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::auth::cookies::{session_cookie, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /refresh - Mint a new access token from the refresh-token cookie
///
/// The refresh token itself is not rotated; it stays valid for its full
/// seven-day lifetime.
pub async fn post(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("Refresh token not found"))?;

    let user_id = state.tokens.verify_refresh(&token).map_err(|e| {
        tracing::debug!("refresh token rejected: {}", e);
        ApiError::unauthorized("Invalid refresh token")
    })?;

    let access = state.tokens.issue_access(user_id)?;

    let jar = jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        access.clone(),
        state.tokens.access_ttl_secs(),
        state.secure_cookies,
    ));

    Ok((jar, Json(json!({ "accessToken": access }))))
}
