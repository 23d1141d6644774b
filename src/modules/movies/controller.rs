use async_trait::async_trait;
use marquee_db::Pool;
use uuid::Uuid;

use super::models::Movie;
use crate::controller::{ControllerError, FindAllResponse, GenericController};
use crate::utils::pagination::{self, PAGE_SIZE};

const ENTITY: &str = "movie";

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, director, duration_in_seconds";

/// CRUD operations over the `movies` table.
#[derive(Clone)]
pub struct MovieController {
    pool: Pool,
}

impl MovieController {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn total(&self) -> Result<u32, ControllerError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;
        Ok(pagination::total(count))
    }
}

#[async_trait]
impl GenericController<Movie> for MovieController {
    async fn create(&self, movie: &mut Movie) -> Result<String, ControllerError> {
        movie.validate()?;
        movie.id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO movies (id, name, director, duration_in_seconds) VALUES (?, ?, ?, ?)",
        )
        .bind(&movie.id)
        .bind(&movie.name)
        .bind(&movie.director)
        .bind(movie.duration_in_seconds)
        .execute(&self.pool)
        .await?;

        tracing::debug!(movie_id = %movie.id, "movie created");
        Ok(movie.id.clone())
    }

    async fn find_by(&self, id: &str) -> Result<Movie, ControllerError> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = ? LIMIT 1");
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ControllerError::NotFound(ENTITY))?;

        movie.validate()?;
        Ok(movie)
    }

    async fn find_all(&self, page: u16) -> Result<FindAllResponse<Movie>, ControllerError> {
        let offset = pagination::offset(page)?;
        let query = format!("SELECT {COLUMNS} FROM movies ORDER BY rowid LIMIT ? OFFSET ?");
        let rows = sqlx::query_as::<_, Movie>(&query)
            .bind(i64::from(PAGE_SIZE))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;

        let registers = rows
            .into_iter()
            .filter(|movie| match movie.validate() {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(movie_id = %movie.id, error = %err, "skipping invalid movie row");
                    false
                }
            })
            .collect();

        Ok(FindAllResponse {
            total: self.total().await?,
            page,
            registers,
        })
    }

    async fn update_by(&self, id: &str, movie: &Movie) -> Result<(), ControllerError> {
        movie.validate()?;

        let result = sqlx::query(
            "UPDATE movies SET name = ?, director = ?, duration_in_seconds = ? WHERE id = ?",
        )
        .bind(&movie.name)
        .bind(&movie.director)
        .bind(movie.duration_in_seconds)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ControllerError::NotFound(ENTITY));
        }
        tracing::debug!(movie_id = %id, "movie updated");
        Ok(())
    }

    async fn delete_by(&self, id: &str) -> Result<(), ControllerError> {
        // room_movies rows go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ControllerError::NotFound(ENTITY));
        }
        tracing::debug!(movie_id = %id, "movie deleted");
        Ok(())
    }
}
