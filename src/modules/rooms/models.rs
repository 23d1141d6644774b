use serde::{Deserialize, Serialize};

use crate::controller::ValidationError;
use crate::modules::movies::models::{Movie, MovieView};

/// A screening room and the movies scheduled into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub number: u16,
    pub description: String,
    pub movies: Vec<Movie>,
}

impl Room {
    /// Build a room, failing when the room or any of its movies is invalid.
    pub fn new(
        number: u16,
        description: impl Into<String>,
        movies: Vec<Movie>,
    ) -> Result<Self, ValidationError> {
        let room = Self {
            id: String::new(),
            number,
            description: description.into(),
            movies,
        };
        room.validate()?;
        Ok(room)
    }

    /// Room fields first, then every movie in order; the first failure wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.number == 0 {
            return Err(ValidationError::new("room number must be provided"));
        }
        if self.description.is_empty() {
            return Err(ValidationError::new("room description must be provided"));
        }
        self.movies.iter().try_for_each(Movie::validate)
    }
}

/// Room columns as stored; movies live in `room_movies`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct RoomRow {
    pub id: String,
    pub number: u16,
    pub description: String,
}

impl RoomRow {
    pub(crate) fn with_movies(self, movies: Vec<Movie>) -> Room {
        Room {
            id: self.id,
            number: self.number,
            description: self.description,
            movies,
        }
    }
}

/// Request body for creating or replacing a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInput {
    #[serde(default)]
    pub number: u16,
    #[serde(default)]
    pub description: String,
    /// Ids of the movies to schedule; unknown ids are ignored
    #[serde(default)]
    pub movies_id: Vec<String>,
}

/// Room as rendered to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub id: String,
    pub number: u16,
    pub description: String,
    pub movies: Vec<MovieView>,
}

impl From<Room> for RoomView {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            number: room.number,
            description: room.description,
            movies: room.movies.into_iter().map(MovieView::from).collect(),
        }
    }
}
