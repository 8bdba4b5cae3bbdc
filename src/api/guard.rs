use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{response, Request};
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Game `{0}` not found")]
    GameNotFound(i32),
    #[error("Player `{0}` not found")]
    PlayerNotFound(i32),
    #[error("Place `{0}` not found")]
    PlaceNotFound(i32),
    #[error("Track type `{0}` not found")]
    TrackTypeNotFound(i32),
    #[error("Score must be between 0 and 20, got {0}")]
    ScoreOutOfRange(i32),
    #[error("Track {track} is outside 1..={track_count}")]
    TrackNumberOutOfRange { track: i32, track_count: i32 },
    #[error("Track count must be between 1 and 50, got {0}")]
    TrackCountOutOfRange(i32),
    #[error("Player name cannot be empty")]
    EmptyPlayerName,
    #[error("A game needs at least one player")]
    NoPlayers,
    #[error("Place name cannot be empty")]
    EmptyPlaceName,
    #[error("Place `{0}` already exists")]
    PlaceAlreadyExists(String),
    #[error("Place is used by {games} games")]
    PlaceInUse { games: i64 },
    #[error("Invalid date: `{0}`")]
    InvalidDate(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    fn status(&self) -> Status {
        use Error::*;
        match self {
            GameNotFound(_) | PlayerNotFound(_) | PlaceNotFound(_) | TrackTypeNotFound(_) => {
                Status::NotFound
            }
            ScoreOutOfRange(_)
            | TrackNumberOutOfRange { .. }
            | TrackCountOutOfRange(_)
            | EmptyPlayerName
            | NoPlayers
            | EmptyPlaceName
            | PlaceAlreadyExists(_)
            | PlaceInUse { .. }
            | InvalidDate(_) => Status::BadRequest,
            Database(_) => Status::InternalServerError,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        warn!("{}", self);

        let status = self.status();
        let body = Json(json!({"status": "error", "message": self.to_string()}));
        let mut response = body.respond_to(req)?;
        response.set_status(status);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors() {
        assert_eq!(Error::ScoreOutOfRange(21).status(), Status::BadRequest);
        assert_eq!(
            Error::TrackNumberOutOfRange {
                track: 19,
                track_count: 18
            }
            .status(),
            Status::BadRequest
        );
        assert_eq!(Error::TrackCountOutOfRange(0).status(), Status::BadRequest);
        assert_eq!(Error::EmptyPlayerName.status(), Status::BadRequest);
        assert_eq!(
            Error::InvalidDate("gestern".into()).status(),
            Status::BadRequest
        );
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        assert_eq!(Error::GameNotFound(1).status(), Status::NotFound);
        assert_eq!(Error::PlayerNotFound(1).status(), Status::NotFound);
        assert_eq!(Error::PlaceNotFound(1).status(), Status::NotFound);
    }
}
