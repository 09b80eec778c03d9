use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use camwatch_api::auth::TokenService;
use camwatch_api::config::AppConfig;
use camwatch_api::database;
use camwatch_api::handlers::{auth, configs, feed};
use camwatch_api::middleware::require_auth;
use camwatch_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT secrets
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    tracing::info!("Starting camwatch-api in {:?} mode", config.environment);

    let pool = database::connect(&config.database)?;

    // Apply schema when the database is reachable; a cold database only
    // degrades /health instead of blocking startup.
    if let Err(e) = sqlx::migrate!().run(&pool).await {
        tracing::warn!("skipping migrations, database unavailable: {}", e);
    }

    let state = AppState {
        pool,
        tokens: TokenService::new(&config.security),
        secure_cookies: config.security.secure_cookies,
    };

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    println!("🎥 camwatch-api listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    // Everything behind /configs and /feed requires the access-token cookie
    let protected = Router::new()
        .route(
            "/configs/factory",
            post(configs::factory::post).get(configs::factory::get),
        )
        .route(
            "/configs/location",
            post(configs::location::post).get(configs::location::get),
        )
        .route("/configs/worker", post(configs::worker::post))
        .route("/feed", get(feed::get))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Session lifecycle: probe, registration, access-token refresh
        .route("/auth/user", get(auth::user::get).post(auth::user::post))
        .route("/refresh", post(auth::refresh::post))
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "camwatch-api",
        "version": version,
        "description": "Camera-monitoring backend: JWT cookie auth and tenant-scoped configuration",
        "endpoints": {
            "auth": "/auth/user (GET probe, POST register), /refresh (POST)",
            "configs": "/configs/factory, /configs/location, /configs/worker (cookie required)",
            "feed": "/feed (cookie required)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
