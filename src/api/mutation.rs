use chrono::NaiveDate;
use rocket::serde::json::Json;
use rocket_db_pools::Connection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{Db, Error};
use crate::controller::queries;

#[derive(Deserialize)]
pub struct SaveGame {
    date: String,
    place: String,
    #[serde(default = "default_track_count")]
    track_count: i32,
    players: Vec<NewPlayerName>,
}

#[derive(Deserialize)]
pub struct NewPlayerName {
    name: String,
}

fn default_track_count() -> i32 {
    18
}

/// # POST a new game
/// Reuses the place by name when it exists; the game then inherits the
/// place's track count.
#[post("/save", data = "<game>")]
pub async fn save(mut db: Connection<Db>, game: Json<SaveGame>) -> Result<Json<Value>, Error> {
    let game = game.into_inner();
    let date = NaiveDate::parse_from_str(&game.date, "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(game.date.clone()))?;
    let place = game.place.clone();
    let player_count = game.players.len();

    let (game_id, place_id) = queries::create_game(
        &mut db,
        queries::NewGame {
            date,
            place: game.place,
            track_count: game.track_count,
            player_names: game.players.into_iter().map(|player| player.name).collect(),
        },
    )
    .await?;

    info!("Game created: {place} ({player_count} players)");
    Ok(Json(json!({
        "status": "success",
        "game_id": game_id,
        "place_id": place_id,
        "message": format!("Game created successfully with {player_count} players"),
    })))
}

#[derive(Deserialize)]
pub struct ScoreUpdate {
    player_id: i32,
    track: i32,
    value: i32,
}

/// # POST a score
/// Zero clears the hole back to "not yet played". Responds with fresh
/// totals for every player in the game.
#[post("/update_score", data = "<update>")]
pub async fn update_score(
    mut db: Connection<Db>,
    update: Json<ScoreUpdate>,
) -> Result<Json<Value>, Error> {
    let update = update.into_inner();
    let totals = queries::set_score(&mut db, update.player_id, update.track, update.value).await?;

    info!(
        "Score updated: Player {}, Track {} = {}",
        update.player_id, update.track, update.value
    );
    Ok(Json(json!({
        "status": "success",
        "totals": totals,
        "message": "Score updated successfully",
    })))
}

/// # POST game deletion
#[post("/delete_game/<game_id>")]
pub async fn delete_game(mut db: Connection<Db>, game_id: i32) -> Result<Json<Value>, Error> {
    let game = queries::delete_game(&mut db, game_id).await?;
    info!("Game deleted: {} on {}", game.place, game.date);
    Ok(Json(json!({
        "status": "success",
        "message": "Game deleted successfully",
    })))
}

#[derive(Deserialize)]
pub struct PlaceRequest {
    name: String,
    #[serde(default = "default_track_count")]
    track_count: i32,
    #[serde(default)]
    is_default: bool,
}

/// # POST a new place
#[post("/places", data = "<place>")]
pub async fn create_place(
    mut db: Connection<Db>,
    place: Json<PlaceRequest>,
) -> Result<Json<Value>, Error> {
    let place = place.into_inner();
    let name = place.name.clone();
    let place_id = queries::create_place(
        &mut db,
        queries::NewPlace {
            name: place.name,
            track_count: place.track_count,
            is_default: place.is_default,
        },
    )
    .await?;
    info!("Place created: {name}");
    Ok(Json(json!({"status": "success", "place_id": place_id})))
}

#[derive(Deserialize)]
pub struct PlacePatch {
    name: Option<String>,
    track_count: Option<i32>,
    is_default: Option<bool>,
}

/// # PUT place changes
#[put("/places/<place_id>", data = "<patch>")]
pub async fn update_place(
    mut db: Connection<Db>,
    place_id: i32,
    patch: Json<PlacePatch>,
) -> Result<Json<Value>, Error> {
    let patch = patch.into_inner();
    let place = queries::update_place(
        &mut db,
        place_id,
        queries::PlaceUpdate {
            name: patch.name,
            track_count: patch.track_count,
            is_default: patch.is_default,
        },
    )
    .await?;
    info!("Place updated: {}", place.name);
    Ok(Json(json!({"status": "success"})))
}

/// # DELETE a place
/// Refused while any game still references it.
#[delete("/places/<place_id>")]
pub async fn delete_place(mut db: Connection<Db>, place_id: i32) -> Result<Json<Value>, Error> {
    let name = queries::delete_place(&mut db, place_id).await?;
    info!("Place deleted: {name}");
    Ok(Json(json!({"status": "success"})))
}

#[derive(Deserialize)]
pub struct TrackTypeAssignment {
    track_type_id: i32,
}

/// # PUT the type of a single track
#[put("/places/<place_id>/tracks/<track_number>", data = "<assignment>")]
pub async fn update_single_track(
    mut db: Connection<Db>,
    place_id: i32,
    track_number: i32,
    assignment: Json<TrackTypeAssignment>,
) -> Result<Json<Value>, Error> {
    let entry = queries::set_place_track(
        &mut db,
        place_id,
        track_number,
        assignment.into_inner().track_type_id,
    )
    .await?;

    info!(
        "Track type updated: Place {place_id}, Track {track_number} -> {}",
        entry.track_type_name
    );
    Ok(Json(json!({
        "status": "success",
        "message": format!("Track {track_number} updated to {}", entry.track_type_name),
        "track": {
            "track_number": entry.track_number,
            "track_type_id": entry.track_type_id,
            "track_type_name": entry.track_type_name,
            "icon_url": entry.icon_url,
        },
    })))
}

#[derive(Deserialize)]
pub struct TrackConfigUpdate {
    track_config: Vec<TrackConfigItem>,
}

#[derive(Deserialize)]
pub struct TrackConfigItem {
    track_number: i32,
    track_type_id: i32,
}

/// # PUT the whole track configuration of a place
#[put("/places/<place_id>/tracks", data = "<config>")]
pub async fn update_track_config(
    mut db: Connection<Db>,
    place_id: i32,
    config: Json<TrackConfigUpdate>,
) -> Result<Json<Value>, Error> {
    let entries = config
        .into_inner()
        .track_config
        .into_iter()
        .map(|item| (item.track_number, item.track_type_id))
        .collect::<Vec<_>>();
    let updated = queries::set_place_track_config(&mut db, place_id, &entries).await?;

    info!("Track config updated: Place {place_id}, {updated} tracks");
    Ok(Json(json!({
        "status": "success",
        "message": format!("Updated {updated} tracks"),
        "updated_tracks": updated,
    })))
}
