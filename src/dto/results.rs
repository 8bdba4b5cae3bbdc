use serde::Serialize;

use crate::controller::{RankBadge, RankedResult};

/// A fully resolved line of the results page. The template only formats;
/// badge, tie flag and average arrive decided.
#[derive(Serialize, Debug, Clone)]
pub struct RankedRow {
    pub player_id: i32,
    pub name: String,
    pub total: u32,
    pub position: usize,
    pub badge: String,
    pub is_winner: bool,
    pub is_tie: bool,
    pub average: Option<f64>,
    pub cells: Vec<Option<u8>>,
}

impl RankedRow {
    pub fn new(result: &RankedResult, track_count: u8) -> Self {
        Self {
            player_id: result.player_id,
            name: result.name.clone(),
            total: result.total,
            position: result.position,
            badge: badge_label(result.badge),
            is_winner: result.is_winner,
            is_tie: result.is_tie,
            average: result.average,
            cells: (1..=track_count)
                .map(|track| result.scores.get(&track).copied())
                .collect(),
        }
    }
}

fn badge_label(badge: RankBadge) -> String {
    match badge {
        RankBadge::Gold => "🥇".to_string(),
        RankBadge::Silver => "🥈".to_string(),
        RankBadge::Bronze => "🥉".to_string(),
        RankBadge::Ordinal(position) => format!("{position}."),
        RankBadge::Tie => "🤝".to_string(),
        RankBadge::Unscored => "–".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{compute_results, PlayerScores};

    #[test]
    fn cells_align_with_track_numbers() {
        let mut player = PlayerScores::new(7, "Anna");
        player.scores.insert(1, 3);
        player.scores.insert(4, 5);

        let results = compute_results(vec![player], 4);
        let row = RankedRow::new(&results[0], 4);
        assert_eq!(row.cells, vec![Some(3), None, None, Some(5)]);
        assert_eq!(row.badge, "🥇");
        assert_eq!(row.total, 8);
    }

    #[test]
    fn unscored_row_has_no_average_and_a_dash() {
        let results = compute_results(vec![PlayerScores::new(1, "Ben")], 18);
        let row = RankedRow::new(&results[0], 18);
        assert_eq!(row.average, None);
        assert_eq!(row.badge, "–");
        assert!(row.cells.iter().all(Option::is_none));
    }
}
