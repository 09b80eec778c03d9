use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Public identity fields for the authenticated-user probe. The password
/// hash never leaves the database layer.
#[derive(Debug, Serialize, FromRow)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Factory {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Listing shape for GET /configs/factory (id + name only).
#[derive(Debug, Serialize, FromRow)]
pub struct FactorySummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub factory_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Listing shape for GET /configs/location: location joined with the name
/// of its owning factory.
#[derive(Debug, Serialize, FromRow)]
pub struct LocationWithFactory {
    pub id: i64,
    pub location: String,
    pub factory_id: i64,
    pub factory: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Worker {
    pub id: i64,
    pub name: String,
    pub employee_id: String,
    pub department: Option<String>,
    pub factory_id: i64,
    pub created_at: DateTime<Utc>,
}

/// One flat row of the factories -> locations -> cameras join behind /feed.
#[derive(Debug, FromRow)]
pub struct FeedRow {
    pub factory_id: i64,
    pub factory_name: String,
    pub location_id: i64,
    pub location_name: String,
    pub camera_id: i64,
    pub camera_name: String,
    pub status: String,
}
