use std::collections::BTreeMap;

use serde::Serialize;

use crate::controller::queries;
use crate::dto::PlayerTotal;

/// One game on the history page, totals and track icons resolved.
#[derive(Serialize, Debug, Clone)]
pub struct GameSummary {
    pub id: i32,
    pub date: String,
    pub place: String,
    pub place_id: Option<i32>,
    pub track_count: i32,
    pub players: Vec<PlayerTotal>,
    pub player_count: usize,
    pub has_track_config: bool,
    pub track_icons: BTreeMap<i32, String>,
}

impl GameSummary {
    pub fn new(
        game: &queries::Game,
        players: Vec<PlayerTotal>,
        has_track_config: bool,
        track_icons: BTreeMap<i32, String>,
    ) -> Self {
        Self {
            id: game.id,
            date: game.date.format("%d.%m.%Y").to_string(),
            place: game.place.clone(),
            place_id: game.place_id,
            track_count: game.track_count,
            player_count: players.len(),
            players,
            has_track_config,
            track_icons,
        }
    }
}
