use std::env;

use thiserror::Error;

/// Fixed token lifetimes. Access tokens are short-lived; refresh tokens
/// cover a week of inactivity before re-login is required.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Signing secret for short-lived access tokens.
    pub access_token_secret: String,
    /// Signing secret for long-lived refresh tokens. Kept independent from
    /// the access secret so a leak of one cannot forge the other.
    pub refresh_token_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    /// Set the Secure attribute on session cookies (production only).
    pub secure_cookies: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/camwatch".to_string()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(match environment {
                    Environment::Production => 50,
                    Environment::Development => 10,
                }),
            acquire_timeout_secs: env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        };

        let security = SecurityConfig {
            access_token_secret: secret_from_env("JWT_ACCESS_SECRET", environment)?,
            refresh_token_secret: secret_from_env("JWT_REFRESH_SECRET", environment)?,
            access_token_ttl_secs: ACCESS_TOKEN_TTL_SECS,
            refresh_token_ttl_secs: REFRESH_TOKEN_TTL_SECS,
            secure_cookies: environment == Environment::Production,
        };

        Ok(Self {
            environment,
            server: ServerConfig { port },
            database,
            security,
        })
    }
}

/// Production refuses to start without real secrets; development falls back
/// to fixed values so `cargo run` works out of the box.
fn secret_from_env(name: &'static str, environment: Environment) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => match environment {
            Environment::Production => Err(ConfigError::MissingEnv(name)),
            Environment::Development => {
                tracing::warn!("{} not set, using development fallback secret", name);
                Ok(format!("camwatch-dev-{}", name.to_lowercase()))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_falls_back_to_dev_secret() {
        let secret = secret_from_env("JWT_TEST_UNSET_SECRET", Environment::Development).unwrap();
        assert!(secret.starts_with("camwatch-dev-"));
    }

    #[test]
    fn production_requires_secret() {
        let err = secret_from_env("JWT_TEST_UNSET_SECRET", Environment::Production);
        assert!(err.is_err());
    }

    #[test]
    fn token_lifetimes_match_cookie_max_ages() {
        assert_eq!(ACCESS_TOKEN_TTL_SECS, 900);
        assert_eq!(REFRESH_TOKEN_TTL_SECS, 604800);
    }
}
