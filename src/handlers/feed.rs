use std::collections::HashMap;

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::database::models::FeedRow;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

const FEED_QUERY: &str = "SELECT \
    f.id AS factory_id, f.name AS factory_name, \
    l.id AS location_id, l.name AS location_name, \
    c.id AS camera_id, c.name AS camera_name, c.status AS status \
 FROM factories f \
 JOIN locations l ON f.id = l.factory_id \
 JOIN cameras c ON l.id = c.location_id \
 WHERE f.user_id = $1 \
 ORDER BY f.name, l.name, c.name";

/// GET /feed - Cameras grouped by factory and location
///
/// One join over the ownership chain, then a fold of the sorted flat rows
/// into factories holding a location-id-keyed map of locations with their
/// cameras. First-seen order from the sorted query is preserved, so each
/// level comes out in name order.
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let rows = sqlx::query_as::<_, FeedRow>(FEED_QUERY)
        .bind(auth.user_id)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(group_feed(rows)))
}

#[derive(Debug, Serialize)]
struct CameraNode {
    id: i64,
    name: String,
    status: String,
}

struct LocationAcc {
    id: i64,
    name: String,
    cameras: Vec<CameraNode>,
}

struct FactoryAcc {
    id: i64,
    name: String,
    locations: Vec<LocationAcc>,
    location_index: HashMap<i64, usize>,
}

/// Fold the sorted row set into the nested feed shape. Grouping is keyed by
/// id (not name), so same-named factories or locations stay distinct while
/// interleaved rows of the same entity still merge.
fn group_feed(rows: Vec<FeedRow>) -> Vec<Value> {
    let mut factories: Vec<FactoryAcc> = Vec::new();
    let mut factory_index: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let fi = *factory_index.entry(row.factory_id).or_insert_with(|| {
            factories.push(FactoryAcc {
                id: row.factory_id,
                name: row.factory_name.clone(),
                locations: Vec::new(),
                location_index: HashMap::new(),
            });
            factories.len() - 1
        });

        let FactoryAcc {
            locations,
            location_index,
            ..
        } = &mut factories[fi];

        let li = *location_index.entry(row.location_id).or_insert_with(|| {
            locations.push(LocationAcc {
                id: row.location_id,
                name: row.location_name.clone(),
                cameras: Vec::new(),
            });
            locations.len() - 1
        });

        locations[li].cameras.push(CameraNode {
            id: row.camera_id,
            name: row.camera_name,
            status: row.status,
        });
    }

    factories
        .into_iter()
        .map(|factory| {
            let locations: Map<String, Value> = factory
                .locations
                .into_iter()
                .map(|location| {
                    (
                        location.id.to_string(),
                        json!({
                            "id": location.id,
                            "name": location.name,
                            "cameras": location.cameras,
                        }),
                    )
                })
                .collect();

            json!({
                "id": factory.id,
                "name": factory.name,
                "locations": locations,
            })
        })
        .collect()
}
