use serde::{Deserialize, Serialize};

use crate::controller::ValidationError;

/// A movie that can be scheduled into rooms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Server-generated identifier, empty until created
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub director: String,
    pub duration_in_seconds: u16,
}

impl Movie {
    /// Build a movie from an input payload, rejecting invalid fields.
    pub fn new(input: MovieInput) -> Result<Self, ValidationError> {
        let movie = Self {
            id: String::new(),
            name: input.name,
            director: input.director,
            duration_in_seconds: input.duration_in_seconds,
        };
        movie.validate()?;
        Ok(movie)
    }

    /// Checks fields in declaration order and reports the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::new("movie name must be provided"));
        }
        if self.director.is_empty() {
            return Err(ValidationError::new("movie director must be provided"));
        }
        if self.duration_in_seconds == 0 {
            return Err(ValidationError::new("movie duration must be provided"));
        }
        Ok(())
    }

    /// Duration rendered as `HH:MM:SS`.
    pub fn duration_in_hours(&self) -> String {
        let total = u32::from(self.duration_in_seconds);
        format!(
            "{:02}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

/// Request body for creating or replacing a movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub duration_in_seconds: u16,
}

/// Movie as rendered to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    pub id: String,
    pub name: String,
    pub director: String,
    pub duration_in_seconds: u16,
    pub duration_in_hours: String,
}

impl From<Movie> for MovieView {
    fn from(movie: Movie) -> Self {
        let duration_in_hours = movie.duration_in_hours();
        Self {
            id: movie.id,
            name: movie.name,
            director: movie.director,
            duration_in_seconds: movie.duration_in_seconds,
            duration_in_hours,
        }
    }
}
