use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use validator::Validate;

use crate::database::models::{Location, LocationWithFactory};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::first_violation;

// Absent fields deserialize to their defaults so the schema reports them
// with the same message as empty ones.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, message = "Location name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Factory ID must be a positive integer"))]
    pub factory_id: i64,
}

const FIELD_ORDER: &[&str] = &["name", "factory_id"];

/// POST /configs/location - Add a location under one of the user's factories
///
/// The ownership check and the insert are one statement: the SELECT source
/// filters on both factory id and owner, so a wrong id and a right id owned
/// by someone else are equally a zero-row insert (404). No window exists for
/// ownership to change between a check and the write.
pub async fn post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<Location>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::bad_request(first_violation(e, FIELD_ORDER)))?;

    let location = sqlx::query_as::<_, Location>(
        "INSERT INTO locations (name, factory_id) \
         SELECT $1, f.id FROM factories f WHERE f.id = $2 AND f.user_id = $3 \
         RETURNING id, name, factory_id, created_at",
    )
    .bind(&body.name)
    .bind(body.factory_id)
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?;

    match location {
        Some(location) => Ok((StatusCode::CREATED, Json(location))),
        None => Err(ApiError::not_found(
            "Factory not found or does not belong to user",
        )),
    }
}

/// GET /configs/location - List locations across the user's factories
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<LocationWithFactory>>, ApiError> {
    let locations = sqlx::query_as::<_, LocationWithFactory>(
        "SELECT l.id, l.name AS location, l.factory_id, f.name AS factory \
         FROM locations l \
         JOIN factories f ON l.factory_id = f.id \
         WHERE f.user_id = $1 \
         ORDER BY l.name",
    )
    .bind(auth.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(locations))
}
