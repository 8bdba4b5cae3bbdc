use chrono::Utc;
use itertools::Itertools;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_db_pools::Connection;
use serde_json::{json, Value};

use crate::api::{Db, Error};
use crate::controller::queries;
use crate::dto;

/// # GET all places
/// Default places first, then alphabetical.
#[get("/places")]
pub async fn get_places(mut db: Connection<Db>) -> Result<Json<Value>, Error> {
    let places = queries::places(&mut **db)
        .await?
        .iter()
        .map(dto::Place::from)
        .collect_vec();
    Ok(Json(json!({
        "status": "success",
        "count": places.len(),
        "places": places,
    })))
}

/// # GET the track type library
#[get("/track-types")]
pub async fn get_track_types(mut db: Connection<Db>) -> Result<Json<Value>, Error> {
    let track_types = queries::track_types(&mut **db)
        .await?
        .iter()
        .map(dto::TrackType::from)
        .collect_vec();
    Ok(Json(json!({
        "status": "success",
        "count": track_types.len(),
        "track_types": track_types,
    })))
}

/// # GET track configuration of one place
/// Every track number is covered; unconfigured tracks fall back to the
/// default type. The score page fetches this to draw its icons.
#[get("/places/<place_id>/tracks")]
pub async fn get_place_track_config(
    mut db: Connection<Db>,
    place_id: i32,
) -> Result<Json<Value>, Error> {
    let (place, entries) = queries::place_track_config(&mut **db, place_id).await?;
    let track_config = entries.iter().map(dto::TrackConfigEntry::from).collect_vec();
    Ok(Json(json!({
        "status": "success",
        "place": {
            "id": place.id,
            "name": place.name,
            "track_count": place.track_count,
        },
        "track_config": track_config,
    })))
}

/// # GET health
/// 503 while the store is unreachable, so the hosting platform can tell.
#[get("/health")]
pub async fn health(db: &State<Db>) -> (Status, Json<Value>) {
    let counts = match db.0.acquire().await {
        Ok(mut conn) => queries::counts(&mut conn).await,
        Err(error) => Err(Error::Database(error)),
    };

    match counts {
        Ok(counts) => (
            Status::Ok,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "games_count": counts.games,
                "places_count": counts.places,
                "timestamp": Utc::now().to_rfc3339(),
            })),
        ),
        Err(error) => {
            warn!("Health check failed: {error}");
            (
                Status::ServiceUnavailable,
                Json(json!({
                    "status": "unhealthy",
                    "database": "disconnected",
                    "timestamp": Utc::now().to_rfc3339(),
                })),
            )
        }
    }
}
