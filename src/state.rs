use sqlx::PgPool;

use crate::auth::TokenService;

/// Shared per-request state: the connection pool plus the token service
/// constructed from the injected signing secrets.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenService,
    pub secure_cookies: bool,
}
