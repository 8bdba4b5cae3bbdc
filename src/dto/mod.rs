mod game;
mod place;
mod player;
mod results;
mod track;

pub use game::GameSummary;
pub use place::Place;
pub use player::{PlayerTotal, ScoreRow};
pub use results::RankedRow;
pub use track::{TrackConfigEntry, TrackType};
