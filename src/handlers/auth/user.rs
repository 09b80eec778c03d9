use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::cookies::{session_cookie, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::auth::password::hash_password;
use crate::database::models::UserIdentity;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// GET /auth/user - Check if the caller is authenticated
///
/// Non-failing probe: a missing, expired, or otherwise invalid access token
/// all collapse to `{isAuthenticated: false}` with 200. A verified token
/// whose user row no longer exists (stale token after deletion) is a 404.
pub async fn get(State(state): State<AppState>, jar: CookieJar) -> Result<Json<Value>, ApiError> {
    let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) else {
        return Ok(Json(json!({ "isAuthenticated": false })));
    };

    let user_id = match state.tokens.verify_access(cookie.value()) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!("identity probe token rejected: {}", e);
            return Ok(Json(json!({ "isAuthenticated": false })));
        }
    };

    let user = sqlx::query_as::<_, UserIdentity>("SELECT name, email FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?;

    match user {
        Some(user) => Ok(Json(json!({ "isAuthenticated": true, "user": user }))),
        None => Err(ApiError::not_found("User not found")),
    }
}

/// POST /auth/user - Register a new user and initiate a session
///
/// Email uniqueness rides on the `users.email` unique constraint: the insert
/// is a single atomic statement and a unique violation maps to 409, so there
/// is no check-then-insert race window.
pub async fn post(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let password_hash = hash_password(&body.password)?;

    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&body.name)
    .bind(&body.email)
    .bind(&password_hash)
    .fetch_one(&state.pool)
    .await;

    let user_id = match inserted {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("Email already in use"));
        }
        Err(e) => return Err(e.into()),
    };

    let access = state.tokens.issue_access(user_id)?;
    let refresh = state.tokens.issue_refresh(user_id)?;

    let jar = jar
        .add(session_cookie(
            ACCESS_TOKEN_COOKIE,
            access,
            state.tokens.access_ttl_secs(),
            state.secure_cookies,
        ))
        .add(session_cookie(
            REFRESH_TOKEN_COOKIE,
            refresh,
            state.tokens.refresh_ttl_secs(),
            state.secure_cookies,
        ));

    Ok((jar, Json(json!({ "user": { "id": user_id } }))))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}
