use itertools::Itertools;
use rocket_db_pools::Connection;
use rocket_dyn_templates::Template;
use serde_json::{json, Value};

use crate::api::{Db, Error};
use crate::controller::queries::{self, Game};
use crate::controller::{compute_results, winner_names};
use crate::dto;

fn game_context(game: &Game) -> Value {
    json!({
        "id": game.id,
        "date": game.date.format("%d.%m.%Y").to_string(),
        "place": game.place,
        "place_id": game.place_id,
        "track_count": game.track_count,
    })
}

#[get("/")]
pub async fn index(mut db: Connection<Db>) -> Result<Template, Error> {
    let places = queries::places(&mut db)
        .await?
        .iter()
        .map(dto::Place::from)
        .collect_vec();
    Ok(Template::render("index", json!({ "places": places })))
}

/// Score-entry grid: one row per player, one cell per track.
#[get("/score/<game_id>")]
pub async fn score_detail(mut db: Connection<Db>, game_id: i32) -> Result<Template, Error> {
    let game = queries::game(&mut db, game_id).await?;
    let sheets = queries::player_scores(&mut db, game_id).await?;

    let players = sheets
        .iter()
        .map(|sheet| dto::ScoreRow {
            player_id: sheet.player_id,
            name: sheet.name.clone(),
            cells: (1..=game.track_count)
                .map(|track| sheet.scores.get(&(track as u8)).map(|value| *value as i32))
                .collect(),
            total: sheet.total() as i64,
        })
        .collect_vec();
    let tracks = (1..=game.track_count).collect_vec();

    Ok(Template::render(
        "score_detail",
        json!({
            "game": game_context(&game),
            "players": players,
            "tracks": tracks,
        }),
    ))
}

#[get("/history")]
pub async fn history(mut db: Connection<Db>) -> Result<Template, Error> {
    let games = queries::games_newest_first(&mut db).await?;

    let mut games_data = Vec::with_capacity(games.len());
    for game in &games {
        let players = queries::players_of_game(&mut db, game.id).await?;
        let totals = queries::totals_for_game(&mut db, game.id).await?;
        let players = players
            .iter()
            .map(|player| {
                dto::PlayerTotal::new(player, totals.get(&player.id).copied().unwrap_or(0))
            })
            .collect_vec();
        let (has_track_config, track_icons) = queries::track_icons_for_game(&mut db, game).await?;
        games_data.push(dto::GameSummary::new(
            game,
            players,
            has_track_config,
            track_icons,
        ));
    }

    info!("History accessed ({} games)", games_data.len());
    Ok(Template::render("history", json!({ "games": games_data })))
}

/// Final standings. Badges, tie flags and averages come fully resolved
/// from the ranking; the template only formats them.
#[get("/results/<game_id>")]
pub async fn game_results(mut db: Connection<Db>, game_id: i32) -> Result<Template, Error> {
    let game = queries::game(&mut db, game_id).await?;
    let sheets = queries::player_scores(&mut db, game_id).await?;

    let results = compute_results(sheets, game.track_count as u8);
    let winners = winner_names(&results);
    let rows = results
        .iter()
        .map(|result| dto::RankedRow::new(result, game.track_count as u8))
        .collect_vec();
    let tracks = (1..=game.track_count).collect_vec();

    Ok(Template::render(
        "results",
        json!({
            "game": game_context(&game),
            "results": rows,
            "has_winner": winners.is_some(),
            "winners": winners,
            "tracks": tracks,
        }),
    ))
}

#[get("/settings")]
pub async fn settings(mut db: Connection<Db>) -> Result<Template, Error> {
    let stats = queries::counts(&mut db).await?;
    let places = queries::places(&mut db)
        .await?
        .iter()
        .map(dto::Place::from)
        .collect_vec();
    let track_types = queries::track_types(&mut db)
        .await?
        .iter()
        .map(dto::TrackType::from)
        .collect_vec();

    Ok(Template::render(
        "settings",
        json!({
            "stats": stats,
            "places": places,
            "track_types": track_types,
        }),
    ))
}
