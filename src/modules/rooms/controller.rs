use std::sync::Arc;

use async_trait::async_trait;
use marquee_db::Pool;
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::models::{Room, RoomRow};
use crate::controller::{ControllerError, FindAllResponse, GenericController};
use crate::modules::movies::models::Movie;
use crate::utils::pagination::{self, PAGE_SIZE};

const ENTITY: &str = "room";

/// CRUD operations over `rooms` and their `room_movies` associations.
///
/// Every write touching more than one row runs in a single transaction.
/// Dropping an uncommitted `sqlx::Transaction` rolls it back, so an early
/// return through `?` always leaves the store untouched.
#[derive(Clone)]
pub struct RoomController {
    pool: Pool,
    movies: Arc<dyn GenericController<Movie>>,
}

impl RoomController {
    pub fn new(pool: Pool, movies: Arc<dyn GenericController<Movie>>) -> Self {
        Self { pool, movies }
    }

    async fn total(&self) -> Result<u32, ControllerError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms")
            .fetch_one(&self.pool)
            .await?;
        Ok(pagination::total(count))
    }

    /// Resolve the movies scheduled in a room, in insertion order.
    ///
    /// Ids that no longer resolve to a valid movie are left out.
    async fn associated_movies(&self, room_id: &str) -> Result<Vec<Movie>, ControllerError> {
        let movie_ids: Vec<String> = sqlx::query_scalar(
            "SELECT fk_movie_id FROM room_movies WHERE fk_room_id = ? ORDER BY rowid",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        let mut movies = Vec::with_capacity(movie_ids.len());
        for movie_id in movie_ids {
            match self.movies.find_by(&movie_id).await {
                Ok(movie) => movies.push(movie),
                Err(err) => {
                    tracing::debug!(%room_id, %movie_id, error = %err, "skipping unresolved movie");
                }
            }
        }
        Ok(movies)
    }

    async fn insert_associations(
        conn: &mut SqliteConnection,
        room_id: &str,
        movies: &[Movie],
    ) -> Result<(), sqlx::Error> {
        for movie in movies {
            sqlx::query("INSERT INTO room_movies (fk_room_id, fk_movie_id) VALUES (?, ?)")
                .bind(room_id)
                .bind(&movie.id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl GenericController<Room> for RoomController {
    async fn create(&self, room: &mut Room) -> Result<String, ControllerError> {
        room.validate()?;
        let id = Uuid::new_v4().to_string();

        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT INTO rooms (id, number, description) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(room.number)
            .bind(&room.description)
            .execute(&mut *tx)
            .await?;
        Self::insert_associations(&mut tx, &id, &room.movies).await?;
        tx.commit().await?;

        tracing::debug!(room_id = %id, movies = room.movies.len(), "room created");
        room.id = id;
        Ok(room.id.clone())
    }

    async fn find_by(&self, id: &str) -> Result<Room, ControllerError> {
        let row = sqlx::query_as::<_, RoomRow>(
            "SELECT id, number, description FROM rooms WHERE id = ? LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ControllerError::NotFound(ENTITY))?;

        let movies = self.associated_movies(&row.id).await?;
        let room = row.with_movies(movies);
        room.validate()?;
        Ok(room)
    }

    async fn find_all(&self, page: u16) -> Result<FindAllResponse<Room>, ControllerError> {
        let offset = pagination::offset(page)?;
        let rows = sqlx::query_as::<_, RoomRow>(
            "SELECT id, number, description FROM rooms ORDER BY rowid LIMIT ? OFFSET ?",
        )
        .bind(i64::from(PAGE_SIZE))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        let mut registers = Vec::with_capacity(rows.len());
        for row in rows {
            let movies = self.associated_movies(&row.id).await?;
            let room = row.with_movies(movies);
            match room.validate() {
                Ok(()) => registers.push(room),
                Err(err) => {
                    tracing::warn!(room_id = %room.id, error = %err, "skipping invalid room row");
                }
            }
        }

        Ok(FindAllResponse {
            total: self.total().await?,
            page,
            registers,
        })
    }

    async fn update_by(&self, id: &str, room: &Room) -> Result<(), ControllerError> {
        room.validate()?;

        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query("UPDATE rooms SET number = ?, description = ? WHERE id = ?")
            .bind(room.number)
            .bind(&room.description)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(ControllerError::NotFound(ENTITY));
        }

        // Full replace: the new movie list is the whole association set.
        sqlx::query("DELETE FROM room_movies WHERE fk_room_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_associations(&mut tx, id, &room.movies).await?;
        tx.commit().await?;

        tracing::debug!(room_id = %id, movies = room.movies.len(), "room updated");
        Ok(())
    }

    async fn delete_by(&self, id: &str) -> Result<(), ControllerError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM room_movies WHERE fk_room_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(ControllerError::NotFound(ENTITY));
        }
        tx.commit().await?;

        tracing::debug!(room_id = %id, "room deleted");
        Ok(())
    }
}
