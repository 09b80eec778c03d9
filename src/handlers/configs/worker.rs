use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use validator::Validate;

use crate::database::models::Worker;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::first_violation;

// Absent fields deserialize to their defaults so the schema reports them
// with the same message as empty ones.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateWorkerRequest {
    #[validate(length(min = 1, message = "Worker name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Employee ID is required"))]
    pub employee_id: String,
    pub department: Option<String>,
    #[validate(range(min = 1, message = "Factory ID must be a positive integer"))]
    pub factory_id: i64,
}

const FIELD_ORDER: &[&str] = &["name", "employee_id", "factory_id"];

/// POST /configs/worker - Add a worker to one of the user's factories
///
/// Same ownership-filtered insert as locations: zero affected rows means
/// the factory does not exist or belongs to another tenant, and the two
/// cases are indistinguishable to the caller.
pub async fn post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateWorkerRequest>,
) -> Result<(StatusCode, Json<Worker>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::bad_request(first_violation(e, FIELD_ORDER)))?;

    let worker = sqlx::query_as::<_, Worker>(
        "INSERT INTO workers (name, employee_id, department, factory_id) \
         SELECT $1, $2, $3, f.id FROM factories f WHERE f.id = $4 AND f.user_id = $5 \
         RETURNING id, name, employee_id, department, factory_id, created_at",
    )
    .bind(&body.name)
    .bind(&body.employee_id)
    .bind(&body.department)
    .bind(body.factory_id)
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?;

    match worker {
        Some(worker) => Ok((StatusCode::CREATED, Json(worker))),
        None => Err(ApiError::not_found(
            "Factory not found or does not belong to user",
        )),
    }
}
