use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use super::types::{CreateMovieRequest, MovieResponse};
use crate::auth::AuthClaims;
use crate::shared::{ApiJson, AppError, AppState, ErrorResponse, MessageResponse};

/// HTTP handler for listing all movies
///
/// GET /movies
#[utoipa::path(
    get,
    path = "/movies",
    tag = "movies",
    responses((status = 200, description = "Every movie on show", body = [MovieResponse]))
)]
#[instrument(name = "list_movies", skip(state))]
pub async fn list_movies(
    State(state): State<AppState>,
) -> Result<Json<Vec<MovieResponse>>, AppError> {
    let movies = state.movie_service().list_movies().await?;

    info!(movie_count = movies.len(), "Movies listed successfully");

    Ok(Json(movies))
}

/// HTTP handler for fetching one movie
///
/// GET /movies/:movie_id
#[utoipa::path(
    get,
    path = "/movies/{movie_id}",
    tag = "movies",
    params(("movie_id" = i64, Path, description = "Movie id")),
    responses(
        (status = 200, description = "The movie", body = MovieResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
#[instrument(name = "get_movie", skip(state))]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> Result<Json<MovieResponse>, AppError> {
    let movie = state.movie_service().get_movie(movie_id).await?;
    Ok(Json(movie))
}

/// HTTP handler for putting a movie on show
///
/// POST /showing_movies (admin)
#[utoipa::path(
    post,
    path = "/showing_movies",
    tag = "movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie created", body = MovieResponse),
        (status = 400, description = "Title, room or seats missing", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 409, description = "Room already in use", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(name = "create_movie", skip(state, claims, request))]
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    ApiJson(request): ApiJson<CreateMovieRequest>,
) -> Result<(StatusCode, Json<MovieResponse>), AppError> {
    let movie = state.movie_service().create_movie(&claims, request).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// HTTP handler for removing a movie and its reservations
///
/// DELETE /movies/:movie_id (admin)
#[utoipa::path(
    delete,
    path = "/movies/{movie_id}",
    tag = "movies",
    params(("movie_id" = i64, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie and its reservations deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(name = "delete_movie", skip(state, claims))]
pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(movie_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.movie_service().delete_movie(&claims, movie_id).await?;
    Ok(Json(MessageResponse::new("Movie deleted successfully")))
}
