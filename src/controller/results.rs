use std::collections::BTreeMap;

use itertools::Itertools;

/// Raw score sheet of one player, as loaded from the store.
///
/// A hole missing from `scores` has not been played yet. Values are
/// strictly positive; the store never hands out zero-stroke entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScores {
    pub player_id: i32,
    pub name: String,
    pub scores: BTreeMap<u8, u8>,
}

impl PlayerScores {
    pub fn new(player_id: i32, name: impl Into<String>) -> Self {
        Self {
            player_id,
            name: name.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn total(&self) -> u32 {
        self.scores.values().map(|strokes| *strokes as u32).sum()
    }
}

/// What the results page shows next to a player's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBadge {
    Gold,
    Silver,
    Bronze,
    Ordinal(usize),
    /// Shares the winning total with at least one other player.
    Tie,
    /// No holes played yet.
    Unscored,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RankedResult {
    pub player_id: i32,
    pub name: String,
    pub scores: BTreeMap<u8, u8>,
    pub total: u32,
    pub position: usize,
    pub badge: RankBadge,
    pub is_winner: bool,
    pub is_tie: bool,
    pub average: Option<f64>,
}

/// Ranks a game's players by total strokes, lowest first.
///
/// Players without any recorded score sort after every player that has
/// one, keeping their input order among themselves. The winner set is
/// everyone sharing the minimum positive total; only that group carries
/// the tie flag when it has more than one member. The per-hole average
/// divides by the full track count, not by holes played.
pub fn compute_results(players: Vec<PlayerScores>, track_count: u8) -> Vec<RankedResult> {
    debug_assert!(track_count >= 1);

    let (scored, unscored): (Vec<_>, Vec<_>) = players
        .into_iter()
        .map(|player| {
            let total = player.total();
            (player, total)
        })
        .partition(|(_, total)| *total > 0);

    let scored = scored
        .into_iter()
        .sorted_by_key(|(_, total)| *total)
        .collect_vec();

    let min_total = scored.first().map(|(_, total)| *total);
    let winner_count = scored
        .iter()
        .take_while(|(_, total)| Some(*total) == min_total)
        .count();
    let tie = winner_count > 1;

    scored
        .into_iter()
        .chain(unscored)
        .enumerate()
        .map(|(index, (player, total))| {
            let position = index + 1;
            let is_winner = total > 0 && Some(total) == min_total;
            let is_tie = is_winner && tie;
            RankedResult {
                badge: badge_for(position, total, is_tie),
                average: (total > 0).then(|| per_hole_average(total, track_count)),
                player_id: player.player_id,
                name: player.name,
                scores: player.scores,
                total,
                position,
                is_winner,
                is_tie,
            }
        })
        .collect()
}

fn badge_for(position: usize, total: u32, is_tie: bool) -> RankBadge {
    if total == 0 {
        RankBadge::Unscored
    } else if is_tie {
        RankBadge::Tie
    } else {
        match position {
            1 => RankBadge::Gold,
            2 => RankBadge::Silver,
            3 => RankBadge::Bronze,
            other => RankBadge::Ordinal(other),
        }
    }
}

// Quotients that terminate within two decimals (11/4 = 2.75) are shown
// as-is; everything else rounds to one decimal (10/3 = 3.3).
fn per_hole_average(total: u32, track_count: u8) -> f64 {
    let exact = total as f64 / track_count as f64;
    if (total as u64 * 100) % track_count as u64 == 0 {
        exact
    } else {
        (exact * 10.0).round() / 10.0
    }
}

/// Winner banner text, e.g. "Anna & Ben" on a tie. `None` when nobody
/// has a score yet.
pub fn winner_names(results: &[RankedResult]) -> Option<String> {
    let names = results
        .iter()
        .filter(|result| result.is_winner)
        .map(|result| result.name.as_str())
        .join(" & ");
    (!names.is_empty()).then_some(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::name::en::FirstName;
    use fake::Fake;

    fn player(id: i32, name: &str, strokes: &[u8]) -> PlayerScores {
        let mut player = PlayerScores::new(id, name);
        for (hole, strokes) in (1u8..).zip(strokes.iter().copied()) {
            player.scores.insert(hole, strokes);
        }
        player
    }

    #[test]
    fn totals_are_conserved() {
        let players = (0..12)
            .map(|id| {
                let holes = (id % 5) as u8;
                let name: String = FirstName().fake();
                player(id, &name, &vec![3; holes as usize])
            })
            .collect_vec();
        let input_sum: u32 = players.iter().map(PlayerScores::total).sum();

        let results = compute_results(players, 18);
        let output_sum: u32 = results.iter().map(|result| result.total).sum();
        assert_eq!(input_sum, output_sum);
    }

    #[test]
    fn identical_input_yields_identical_output() {
        let players = vec![
            player(1, "Anna", &[3, 4, 2]),
            player(2, "Ben", &[2, 2, 2]),
            player(3, "Cleo", &[]),
        ];
        let first = compute_results(players.clone(), 6);
        let second = compute_results(players, 6);
        assert_eq!(first, second);
    }

    #[test]
    fn no_scores_means_no_winners() {
        let players = vec![
            player(1, "Anna", &[]),
            player(2, "Ben", &[]),
        ];
        let results = compute_results(players, 18);
        assert!(results.iter().all(|result| !result.is_winner));
        assert!(results.iter().all(|result| !result.is_tie));
        assert!(results
            .iter()
            .all(|result| result.badge == RankBadge::Unscored));
        assert_eq!(winner_names(&results), None);
        // Input order survives among unscored players.
        assert_eq!(results[0].name, "Anna");
        assert_eq!(results[1].name, "Ben");
    }

    #[test]
    fn single_lowest_total_wins_without_tie() {
        let players = vec![
            player(1, "Anna", &[4, 4]),
            player(2, "Ben", &[3, 3]),
            player(3, "Cleo", &[5, 5]),
        ];
        let results = compute_results(players, 2);
        assert_eq!(results[0].name, "Ben");
        assert!(results[0].is_winner);
        assert!(!results[0].is_tie);
        assert_eq!(results[0].badge, RankBadge::Gold);
        assert_eq!(results[1].badge, RankBadge::Silver);
        assert_eq!(results[2].badge, RankBadge::Bronze);
    }

    #[test]
    fn shared_minimum_flags_the_whole_top_group() {
        // Totals 42, 50, 42, 55 over three holes.
        let players = vec![
            player(1, "Anna", &[20, 20, 2]),
            player(2, "Ben", &[20, 20, 10]),
            player(3, "Cleo", &[20, 20, 2]),
            player(4, "Dan", &[20, 20, 15]),
        ];
        let results = compute_results(players, 3);
        assert_eq!(results[0].total, 42);
        assert_eq!(results[1].total, 42);
        assert!(results[0].is_tie && results[1].is_tie);
        assert_eq!(results[0].badge, RankBadge::Tie);
        assert_eq!(results[1].badge, RankBadge::Tie);
        // Remaining players rank below in ascending total order, untied.
        assert_eq!(results[2].total, 50);
        assert_eq!(results[3].total, 55);
        assert!(!results[2].is_tie && !results[3].is_tie);
        assert_eq!(results[2].badge, RankBadge::Bronze);
        assert_eq!(results[3].badge, RankBadge::Ordinal(4));
    }

    #[test]
    fn unscored_player_never_outranks_a_scored_one() {
        let players = vec![
            player(1, "A", &[3, 4, 3, 4]),
            player(2, "B", &[4, 4, 4, 4]),
            player(3, "C", &[]),
        ];
        let results = compute_results(players, 4);

        assert_eq!(results[0].name, "A");
        assert_eq!(results[0].total, 11);
        assert_eq!(results[0].position, 1);
        assert!(results[0].is_winner);
        assert_eq!(results[0].average, Some(2.75));

        assert_eq!(results[1].name, "B");
        assert_eq!(results[1].total, 16);
        assert_eq!(results[1].position, 2);
        assert_eq!(results[1].average, Some(4.0));

        assert_eq!(results[2].name, "C");
        assert_eq!(results[2].total, 0);
        assert_eq!(results[2].position, 3);
        assert_eq!(results[2].average, None);
        assert!(!results[2].is_winner);
    }

    #[test]
    fn two_way_tie_joins_winner_names() {
        let players = vec![
            player(1, "A", &[3, 3, 3]),
            player(2, "B", &[4, 3, 2]),
        ];
        let results = compute_results(players, 3);
        assert_eq!(results[0].total, 9);
        assert_eq!(results[1].total, 9);
        assert!(results[0].is_tie && results[1].is_tie);
        assert_eq!(winner_names(&results).as_deref(), Some("A & B"));
        // Equal totals keep input order.
        assert_eq!(results[0].name, "A");
        assert_eq!(results[1].name, "B");
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(per_hole_average(11, 4), 2.75);
        assert_eq!(per_hole_average(10, 3), 3.3);
        assert_eq!(per_hole_average(16, 4), 4.0);
        assert_eq!(per_hole_average(13, 6), 2.2);
    }
}
