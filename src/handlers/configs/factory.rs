use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use validator::Validate;

use crate::database::models::{Factory, FactorySummary};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::first_violation;

// Absent fields deserialize to their defaults so the schema reports them
// with the same message as empty ones.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateFactoryRequest {
    #[validate(length(min = 1, message = "Factory name is required"))]
    pub name: String,
}

const FIELD_ORDER: &[&str] = &["name"];

/// POST /configs/factory - Add a factory owned by the authenticated user
pub async fn post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateFactoryRequest>,
) -> Result<(StatusCode, Json<Factory>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::bad_request(first_violation(e, FIELD_ORDER)))?;

    let factory = sqlx::query_as::<_, Factory>(
        "INSERT INTO factories (name, user_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(&body.name)
    .bind(auth.user_id)
    .fetch_one(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(factory)))
}

/// GET /configs/factory - List the authenticated user's factories by name
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<FactorySummary>>, ApiError> {
    let factories = sqlx::query_as::<_, FactorySummary>(
        "SELECT id, name FROM factories WHERE user_id = $1 ORDER BY name",
    )
    .bind(auth.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(factories))
}
