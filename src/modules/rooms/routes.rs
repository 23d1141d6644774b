use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use marquee_http::{error::AppError, extract::ApiJson};

use super::models::{Room, RoomInput, RoomView};
use crate::controller::{FindAllResponse, GenericController};
use crate::modules::movies::{models::Movie, routes::parse_page};

/// Controllers the room handlers talk to.
#[derive(Clone)]
pub struct RoomsState {
    pub rooms: Arc<dyn GenericController<Room>>,
    pub movies: Arc<dyn GenericController<Movie>>,
}

impl RoomsState {
    /// Turn a payload into a validated room, resolving each movie id.
    ///
    /// Ids that do not resolve are dropped from the room.
    async fn room_from(&self, input: RoomInput) -> Result<Room, AppError> {
        let mut movies = Vec::with_capacity(input.movies_id.len());
        for movie_id in &input.movies_id {
            match self.movies.find_by(movie_id).await {
                Ok(movie) => movies.push(movie),
                Err(err) => tracing::debug!(%movie_id, error = %err, "ignoring unknown movie id"),
            }
        }
        Ok(Room::new(input.number, input.description, movies)?)
    }
}

pub fn router(state: RoomsState) -> Router {
    Router::new()
        .route("/", post(create_room))
        .route("/{id}", get(find_room).put(update_room).delete(delete_room))
        .route("/all/{page}", get(list_rooms))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn create_room(
    State(state): State<RoomsState>,
    ApiJson(input): ApiJson<RoomInput>,
) -> Result<(StatusCode, String), AppError> {
    let mut room = state.room_from(input).await?;
    let id = state.rooms.create(&mut room).await?;
    Ok((StatusCode::CREATED, id))
}

async fn find_room(
    State(state): State<RoomsState>,
    Path(id): Path<String>,
) -> Result<Json<RoomView>, AppError> {
    let room = state.rooms.find_by(&id).await?;
    Ok(Json(room.into()))
}

async fn list_rooms(
    State(state): State<RoomsState>,
    Path(page): Path<String>,
) -> Result<Json<FindAllResponse<RoomView>>, AppError> {
    let page = parse_page(&page)?;
    let listing = state.rooms.find_all(page).await?;
    Ok(Json(listing.map(RoomView::from)))
}

async fn update_room(
    State(state): State<RoomsState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<RoomInput>,
) -> Result<Json<bool>, AppError> {
    let room = state.room_from(input).await?;
    state.rooms.update_by(&id, &room).await?;
    Ok(Json(true))
}

async fn delete_room(
    State(state): State<RoomsState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    state.rooms.delete_by(&id).await?;
    Ok(Json(true))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "rooms module is healthy"
}
