pub use results::{compute_results, winner_names, PlayerScores, RankBadge, RankedResult};

pub(crate) mod queries;
pub mod results;
pub(crate) mod setup_helpers;
