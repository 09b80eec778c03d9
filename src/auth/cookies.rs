use axum_extra::extract::cookie::{Cookie, SameSite};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Build a session cookie for one of the token kinds. Max-Age always matches
/// the token's own TTL so the browser drops the cookie when the token dies.
pub fn session_cookie(
    name: &'static str,
    token: String,
    max_age_secs: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}
