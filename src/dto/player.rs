use serde::Serialize;

use crate::controller::queries;

#[derive(Serialize, Debug, Clone)]
pub struct PlayerTotal {
    pub id: i32,
    pub name: String,
    pub total: i64,
}

impl PlayerTotal {
    pub fn new(player: &queries::Player, total: i64) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            total,
        }
    }
}

/// One row of the score-entry grid: a cell per track, empty when the hole
/// has not been played yet.
#[derive(Serialize, Debug, Clone)]
pub struct ScoreRow {
    pub player_id: i32,
    pub name: String,
    pub cells: Vec<Option<i32>>,
    pub total: i64,
}
