use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use marquee_http::{error::AppError, extract::ApiJson};

use super::models::{Movie, MovieInput, MovieView};
use crate::controller::{FindAllResponse, GenericController};

/// Shared handle to the movie controller.
pub type MoviesState = Arc<dyn GenericController<Movie>>;

pub fn router(state: MoviesState) -> Router {
    Router::new()
        .route("/", post(create_movie))
        .route(
            "/{id}",
            get(find_movie).put(update_movie).delete(delete_movie),
        )
        .route("/all/{page}", get(list_movies))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Parse the page segment of `/all/{page}`.
pub(crate) fn parse_page(raw: &str) -> Result<u16, AppError> {
    raw.parse::<u16>()
        .map_err(|_| AppError::bad_request("page must be provided"))
}

async fn create_movie(
    State(movies): State<MoviesState>,
    ApiJson(input): ApiJson<MovieInput>,
) -> Result<(StatusCode, String), AppError> {
    let mut movie = Movie::new(input)?;
    let id = movies.create(&mut movie).await?;
    Ok((StatusCode::CREATED, id))
}

async fn find_movie(
    State(movies): State<MoviesState>,
    Path(id): Path<String>,
) -> Result<Json<MovieView>, AppError> {
    let movie = movies.find_by(&id).await?;
    Ok(Json(movie.into()))
}

async fn list_movies(
    State(movies): State<MoviesState>,
    Path(page): Path<String>,
) -> Result<Json<FindAllResponse<MovieView>>, AppError> {
    let page = parse_page(&page)?;
    let listing = movies.find_all(page).await?;
    Ok(Json(listing.map(MovieView::from)))
}

async fn update_movie(
    State(movies): State<MoviesState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<MovieInput>,
) -> Result<Json<bool>, AppError> {
    let movie = Movie::new(input)?;
    movies.update_by(&id, &movie).await?;
    Ok(Json(true))
}

async fn delete_movie(
    State(movies): State<MoviesState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    movies.delete_by(&id).await?;
    Ok(Json(true))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "movies module is healthy"
}
