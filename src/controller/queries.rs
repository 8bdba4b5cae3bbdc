use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use itertools::Itertools;
use sqlx::{Connection, FromRow, PgConnection};

use crate::api::Error;
use crate::controller::results::PlayerScores;

pub const PLACEHOLDER_ICON: &str = "/static/track-icons/bahn_placeholder.png";

#[derive(Debug, Clone, FromRow)]
pub struct Game {
    pub id: i32,
    pub place: String,
    pub place_id: Option<i32>,
    pub date: NaiveDate,
    pub track_count: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct Player {
    pub id: i32,
    pub game_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ScoreEntry {
    pub player_id: i32,
    pub track: i32,
    pub value: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct Place {
    pub id: i32,
    pub name: String,
    pub track_count: i32,
    pub is_default: bool,
    pub configured_tracks: i64,
}

impl Place {
    pub fn has_custom_config(&self) -> bool {
        self.configured_tracks > 0
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TrackType {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub icon_filename: String,
    pub is_default: bool,
    pub is_placeholder: bool,
    pub sort_order: i32,
}

impl TrackType {
    pub fn icon_url(&self) -> String {
        format!("/static/track-icons/{}", self.icon_filename)
    }
}

/// Resolved type of one track at a place; unconfigured tracks carry the
/// default type (or just the placeholder icon when no default exists).
#[derive(Debug, Clone)]
pub struct TrackConfigEntry {
    pub track_number: i32,
    pub track_type_id: Option<i32>,
    pub track_type_name: String,
    pub icon_url: String,
}

pub struct NewGame {
    pub date: NaiveDate,
    pub place: String,
    pub track_count: i32,
    pub player_names: Vec<String>,
}

pub struct NewPlace {
    pub name: String,
    pub track_count: i32,
    pub is_default: bool,
}

#[derive(Default)]
pub struct PlaceUpdate {
    pub name: Option<String>,
    pub track_count: Option<i32>,
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Copy, FromRow, serde::Serialize)]
pub struct StoreCounts {
    pub places: i64,
    pub track_types: i64,
    pub games: i64,
    pub players: i64,
    pub scores: i64,
}

const PLACE_COLUMNS: &str = "id, name, track_count, is_default, \
     (SELECT count(*) FROM place_tracks pt WHERE pt.place_id = places.id) AS configured_tracks";

pub async fn game(conn: &mut PgConnection, game_id: i32) -> Result<Game, Error> {
    sqlx::query_as::<_, Game>(
        "SELECT id, place, place_id, date, track_count FROM games WHERE id = $1",
    )
    .bind(game_id)
    .fetch_optional(conn)
    .await?
    .ok_or(Error::GameNotFound(game_id))
}

pub async fn games_newest_first(conn: &mut PgConnection) -> Result<Vec<Game>, Error> {
    Ok(sqlx::query_as::<_, Game>(
        "SELECT id, place, place_id, date, track_count FROM games ORDER BY id DESC",
    )
    .fetch_all(conn)
    .await?)
}

pub async fn players_of_game(
    conn: &mut PgConnection,
    game_id: i32,
) -> Result<Vec<Player>, Error> {
    Ok(sqlx::query_as::<_, Player>(
        "SELECT id, game_id, name FROM players WHERE game_id = $1 ORDER BY id",
    )
    .bind(game_id)
    .fetch_all(conn)
    .await?)
}

pub async fn scores_of_game(
    conn: &mut PgConnection,
    game_id: i32,
) -> Result<Vec<ScoreEntry>, Error> {
    Ok(sqlx::query_as::<_, ScoreEntry>(
        "SELECT s.player_id, s.track, s.value FROM scores s \
         JOIN players p ON p.id = s.player_id WHERE p.game_id = $1 \
         ORDER BY s.player_id, s.track",
    )
    .bind(game_id)
    .fetch_all(conn)
    .await?)
}

/// Score sheets for the ranking engine, one per player, in the order the
/// players joined the game.
pub async fn player_scores(
    conn: &mut PgConnection,
    game_id: i32,
) -> Result<Vec<PlayerScores>, Error> {
    let players = players_of_game(conn, game_id).await?;
    let mut by_player: HashMap<i32, BTreeMap<u8, u8>> = HashMap::new();
    for entry in scores_of_game(conn, game_id).await? {
        by_player
            .entry(entry.player_id)
            .or_default()
            .insert(entry.track as u8, entry.value as u8);
    }

    Ok(players
        .into_iter()
        .map(|player| PlayerScores {
            scores: by_player.remove(&player.id).unwrap_or_default(),
            player_id: player.id,
            name: player.name,
        })
        .collect())
}

/// Creates a game together with its players. The place is reused by name
/// when it exists (the game then inherits the place's track count) and
/// created with the default track configuration otherwise.
pub async fn create_game(conn: &mut PgConnection, new: NewGame) -> Result<(i32, i32), Error> {
    if new.player_names.is_empty() {
        return Err(Error::NoPlayers);
    }
    if new.player_names.iter().any(|name| name.trim().is_empty()) {
        return Err(Error::EmptyPlayerName);
    }
    let place_name = new.place.trim();
    if place_name.is_empty() {
        return Err(Error::EmptyPlaceName);
    }

    let mut tx = conn.begin().await?;

    let existing = sqlx::query_as::<_, Place>(&format!(
        "SELECT {PLACE_COLUMNS} FROM places WHERE name = $1"
    ))
    .bind(place_name)
    .fetch_optional(&mut *tx)
    .await?;

    let (place_id, track_count) = match existing {
        Some(place) => (place.id, place.track_count),
        None => {
            if !(1..=50).contains(&new.track_count) {
                return Err(Error::TrackCountOutOfRange(new.track_count));
            }
            let place_id = insert_place_with_default_tracks(
                &mut tx,
                place_name,
                new.track_count,
                false,
            )
            .await?;
            info!("Auto-created place: {place_name}");
            (place_id, new.track_count)
        }
    };

    let (game_id,): (i32,) = sqlx::query_as(
        "INSERT INTO games (place, place_id, date, track_count) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(place_name)
    .bind(place_id)
    .bind(new.date)
    .bind(track_count)
    .fetch_one(&mut *tx)
    .await?;

    for name in &new.player_names {
        sqlx::query("INSERT INTO players (game_id, name) VALUES ($1, $2)")
            .bind(game_id)
            .bind(name.trim())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok((game_id, place_id))
}

pub async fn delete_game(conn: &mut PgConnection, game_id: i32) -> Result<Game, Error> {
    let game = game(conn, game_id).await?;
    sqlx::query("DELETE FROM games WHERE id = $1")
        .bind(game_id)
        .execute(conn)
        .await?;
    Ok(game)
}

/// Records one score. Zero deletes the entry ("not yet played"); the
/// stored value is always strictly positive.
pub async fn set_score(
    conn: &mut PgConnection,
    player_id: i32,
    track: i32,
    value: i32,
) -> Result<BTreeMap<i32, i64>, Error> {
    if !(0..=20).contains(&value) {
        return Err(Error::ScoreOutOfRange(value));
    }

    let player = sqlx::query_as::<_, Player>(
        "SELECT id, game_id, name FROM players WHERE id = $1",
    )
    .bind(player_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(Error::PlayerNotFound(player_id))?;
    let game = game(conn, player.game_id).await?;

    if track < 1 || track > game.track_count {
        return Err(Error::TrackNumberOutOfRange {
            track,
            track_count: game.track_count,
        });
    }

    if value == 0 {
        sqlx::query("DELETE FROM scores WHERE player_id = $1 AND track = $2")
            .bind(player_id)
            .bind(track)
            .execute(&mut *conn)
            .await?;
    } else {
        sqlx::query(
            "INSERT INTO scores (player_id, track, value) VALUES ($1, $2, $3) \
             ON CONFLICT (player_id, track) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(player_id)
        .bind(track)
        .bind(value)
        .execute(&mut *conn)
        .await?;
    }

    totals_for_game(conn, game.id).await
}

/// Current total per player id, zero for players without any score.
pub async fn totals_for_game(
    conn: &mut PgConnection,
    game_id: i32,
) -> Result<BTreeMap<i32, i64>, Error> {
    let rows: Vec<(i32, i64)> = sqlx::query_as(
        "SELECT p.id, COALESCE(SUM(s.value), 0)::BIGINT FROM players p \
         LEFT JOIN scores s ON s.player_id = p.id \
         WHERE p.game_id = $1 GROUP BY p.id",
    )
    .bind(game_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().collect())
}

pub async fn places(conn: &mut PgConnection) -> Result<Vec<Place>, Error> {
    Ok(sqlx::query_as::<_, Place>(&format!(
        "SELECT {PLACE_COLUMNS} FROM places ORDER BY is_default DESC, name"
    ))
    .fetch_all(conn)
    .await?)
}

pub async fn place(conn: &mut PgConnection, place_id: i32) -> Result<Place, Error> {
    sqlx::query_as::<_, Place>(&format!(
        "SELECT {PLACE_COLUMNS} FROM places WHERE id = $1"
    ))
    .bind(place_id)
    .fetch_optional(conn)
    .await?
    .ok_or(Error::PlaceNotFound(place_id))
}

pub async fn create_place(conn: &mut PgConnection, new: NewPlace) -> Result<i32, Error> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(Error::EmptyPlaceName);
    }
    if !(1..=50).contains(&new.track_count) {
        return Err(Error::TrackCountOutOfRange(new.track_count));
    }

    let mut tx = conn.begin().await?;
    let taken: Option<(i32,)> = sqlx::query_as("SELECT id FROM places WHERE name = $1")
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?;
    if taken.is_some() {
        return Err(Error::PlaceAlreadyExists(name.to_string()));
    }

    let place_id =
        insert_place_with_default_tracks(&mut tx, name, new.track_count, new.is_default).await?;
    tx.commit().await?;
    Ok(place_id)
}

pub async fn update_place(
    conn: &mut PgConnection,
    place_id: i32,
    update: PlaceUpdate,
) -> Result<Place, Error> {
    let current = place(conn, place_id).await?;

    let name = match update.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        Some(_) => return Err(Error::EmptyPlaceName),
        None => current.name,
    };
    let track_count = update.track_count.unwrap_or(current.track_count);
    if !(1..=50).contains(&track_count) {
        return Err(Error::TrackCountOutOfRange(track_count));
    }
    let is_default = update.is_default.unwrap_or(current.is_default);

    sqlx::query("UPDATE places SET name = $1, track_count = $2, is_default = $3 WHERE id = $4")
        .bind(&name)
        .bind(track_count)
        .bind(is_default)
        .bind(place_id)
        .execute(&mut *conn)
        .await?;
    place(conn, place_id).await
}

pub async fn delete_place(conn: &mut PgConnection, place_id: i32) -> Result<String, Error> {
    let place = place(conn, place_id).await?;
    let (games,): (i64,) = sqlx::query_as("SELECT count(*) FROM games WHERE place_id = $1")
        .bind(place_id)
        .fetch_one(&mut *conn)
        .await?;
    if games > 0 {
        return Err(Error::PlaceInUse { games });
    }
    sqlx::query("DELETE FROM places WHERE id = $1")
        .bind(place_id)
        .execute(conn)
        .await?;
    Ok(place.name)
}

pub async fn track_types(conn: &mut PgConnection) -> Result<Vec<TrackType>, Error> {
    Ok(sqlx::query_as::<_, TrackType>(
        "SELECT id, name, description, icon_filename, is_default, is_placeholder, sort_order \
         FROM track_types ORDER BY sort_order, name",
    )
    .fetch_all(conn)
    .await?)
}

async fn default_track_type(conn: &mut PgConnection) -> Result<Option<TrackType>, Error> {
    Ok(sqlx::query_as::<_, TrackType>(
        "SELECT id, name, description, icon_filename, is_default, is_placeholder, sort_order \
         FROM track_types ORDER BY is_default DESC, sort_order LIMIT 1",
    )
    .fetch_optional(conn)
    .await?)
}

/// Per-track type resolution for a place, covering every track number even
/// when only some are configured.
pub async fn place_track_config(
    conn: &mut PgConnection,
    place_id: i32,
) -> Result<(Place, Vec<TrackConfigEntry>), Error> {
    let place = place(&mut *conn, place_id).await?;
    let configured = configured_tracks(&mut *conn, place_id).await?;
    let fallback = default_track_type(&mut *conn).await?;

    let entries = (1..=place.track_count)
        .map(|track_number| match configured.get(&track_number) {
            Some(entry) => entry.clone(),
            None => TrackConfigEntry {
                track_number,
                track_type_id: fallback.as_ref().map(|tt| tt.id),
                track_type_name: fallback
                    .as_ref()
                    .map(|tt| tt.name.clone())
                    .unwrap_or_else(|| "Standard".to_string()),
                icon_url: fallback
                    .as_ref()
                    .map(TrackType::icon_url)
                    .unwrap_or_else(|| PLACEHOLDER_ICON.to_string()),
            },
        })
        .collect_vec();
    Ok((place, entries))
}

async fn configured_tracks(
    conn: &mut PgConnection,
    place_id: i32,
) -> Result<BTreeMap<i32, TrackConfigEntry>, Error> {
    let rows: Vec<(i32, i32, String, String)> = sqlx::query_as(
        "SELECT pt.track_number, tt.id, tt.name, tt.icon_filename \
         FROM place_tracks pt JOIN track_types tt ON tt.id = pt.track_type_id \
         WHERE pt.place_id = $1 ORDER BY pt.track_number",
    )
    .bind(place_id)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(track_number, type_id, name, icon_filename)| {
            (
                track_number,
                TrackConfigEntry {
                    track_number,
                    track_type_id: Some(type_id),
                    track_type_name: name,
                    icon_url: format!("/static/track-icons/{icon_filename}"),
                },
            )
        })
        .collect())
}

pub async fn set_place_track(
    conn: &mut PgConnection,
    place_id: i32,
    track_number: i32,
    track_type_id: i32,
) -> Result<TrackConfigEntry, Error> {
    let place = place(&mut *conn, place_id).await?;
    if track_number < 1 || track_number > place.track_count {
        return Err(Error::TrackNumberOutOfRange {
            track: track_number,
            track_count: place.track_count,
        });
    }
    let track_type = sqlx::query_as::<_, TrackType>(
        "SELECT id, name, description, icon_filename, is_default, is_placeholder, sort_order \
         FROM track_types WHERE id = $1",
    )
    .bind(track_type_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(Error::TrackTypeNotFound(track_type_id))?;

    sqlx::query(
        "INSERT INTO place_tracks (place_id, track_number, track_type_id) VALUES ($1, $2, $3) \
         ON CONFLICT (place_id, track_number) DO UPDATE SET track_type_id = EXCLUDED.track_type_id",
    )
    .bind(place_id)
    .bind(track_number)
    .bind(track_type_id)
    .execute(conn)
    .await?;

    Ok(TrackConfigEntry {
        track_number,
        track_type_id: Some(track_type.id),
        track_type_name: track_type.name.clone(),
        icon_url: track_type.icon_url(),
    })
}

/// Bulk assignment. Entries pointing at unknown types or track numbers
/// outside the place are skipped, matching the tolerant behavior of the
/// configuration UI.
pub async fn set_place_track_config(
    conn: &mut PgConnection,
    place_id: i32,
    entries: &[(i32, i32)],
) -> Result<usize, Error> {
    let place = place(&mut *conn, place_id).await?;
    let mut updated = 0;
    for &(track_number, track_type_id) in entries {
        if track_number < 1 || track_number > place.track_count {
            continue;
        }
        let known: Option<(i32,)> = sqlx::query_as("SELECT id FROM track_types WHERE id = $1")
            .bind(track_type_id)
            .fetch_optional(&mut *conn)
            .await?;
        if known.is_none() {
            continue;
        }
        sqlx::query(
            "INSERT INTO place_tracks (place_id, track_number, track_type_id) VALUES ($1, $2, $3) \
             ON CONFLICT (place_id, track_number) DO UPDATE SET track_type_id = EXCLUDED.track_type_id",
        )
        .bind(place_id)
        .bind(track_number)
        .bind(track_type_id)
        .execute(&mut *conn)
        .await?;
        updated += 1;
    }
    Ok(updated)
}

/// Icon url per track number for a game, placeholder-filled. The flag says
/// whether any track of the game's place is actually configured.
pub async fn track_icons_for_game(
    conn: &mut PgConnection,
    game: &Game,
) -> Result<(bool, BTreeMap<i32, String>), Error> {
    let configured = match game.place_id {
        Some(place_id) => configured_tracks(conn, place_id).await?,
        None => BTreeMap::new(),
    };
    let has_config = !configured.is_empty();
    let icons = (1..=game.track_count)
        .map(|track_number| {
            let url = configured
                .get(&track_number)
                .map(|entry| entry.icon_url.clone())
                .unwrap_or_else(|| PLACEHOLDER_ICON.to_string());
            (track_number, url)
        })
        .collect();
    Ok((has_config, icons))
}

pub async fn counts(conn: &mut PgConnection) -> Result<StoreCounts, Error> {
    Ok(sqlx::query_as::<_, StoreCounts>(
        "SELECT (SELECT count(*) FROM places) AS places, \
                (SELECT count(*) FROM track_types) AS track_types, \
                (SELECT count(*) FROM games) AS games, \
                (SELECT count(*) FROM players) AS players, \
                (SELECT count(*) FROM scores) AS scores",
    )
    .fetch_one(conn)
    .await?)
}

async fn insert_place_with_default_tracks(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    name: &str,
    track_count: i32,
    is_default: bool,
) -> Result<i32, Error> {
    let (place_id,): (i32,) = sqlx::query_as(
        "INSERT INTO places (name, track_count, is_default) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(track_count)
    .bind(is_default)
    .fetch_one(&mut **tx)
    .await?;

    if let Some(track_type) = default_track_type(&mut **tx).await? {
        for track_number in 1..=track_count {
            sqlx::query(
                "INSERT INTO place_tracks (place_id, track_number, track_type_id) \
                 VALUES ($1, $2, $3) ON CONFLICT (place_id, track_number) DO NOTHING",
            )
            .bind(place_id)
            .bind(track_number)
            .bind(track_type.id)
            .execute(&mut **tx)
            .await?;
        }
    }
    Ok(place_id)
}
