use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::NewMovie,
    repository::{DeleteMovieResult, MovieRepository},
    types::{CreateMovieRequest, MovieResponse},
};
use crate::auth::{AuthClaims, Role};
use crate::shared::{required_field, AppError};

/// Service for handling movie business logic
pub struct MovieService {
    repository: Arc<dyn MovieRepository + Send + Sync>,
}

impl MovieService {
    pub fn new(repository: Arc<dyn MovieRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Lists all movies
    #[instrument(skip(self))]
    pub async fn list_movies(&self) -> Result<Vec<MovieResponse>, AppError> {
        let movies = self.repository.list_movies().await?;

        debug!(movie_count = movies.len(), "Movies retrieved successfully");
        Ok(movies.into_iter().map(MovieResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_movie(&self, movie_id: i64) -> Result<MovieResponse, AppError> {
        self.repository
            .get_movie(movie_id)
            .await?
            .map(MovieResponse::from)
            .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))
    }

    /// Puts a movie on show; admin only
    #[instrument(skip(self, claims, request))]
    pub async fn create_movie(
        &self,
        claims: &AuthClaims,
        request: CreateMovieRequest,
    ) -> Result<MovieResponse, AppError> {
        claims.require_role(Role::Admin)?;

        let (Some(title), Some(room), Some(seats)) = (
            required_field(request.title),
            required_field(request.room),
            request.seats.filter(|seats| *seats > 0),
        ) else {
            return Err(AppError::BadRequest(
                "Title, room and seats are required".to_string(),
            ));
        };

        let movie = self
            .repository
            .create_movie(&NewMovie {
                title,
                description: required_field(request.description),
                room,
                seats,
                showtime: request.showtime,
            })
            .await?;

        info!(
            movie_id = movie.id,
            title = %movie.title,
            room = %movie.room,
            seats = movie.seats,
            "Movie created successfully"
        );

        Ok(MovieResponse::from(movie))
    }

    /// Deletes a movie and its reservations; admin only
    #[instrument(skip(self, claims))]
    pub async fn delete_movie(&self, claims: &AuthClaims, movie_id: i64) -> Result<(), AppError> {
        claims.require_role(Role::Admin)?;

        match self.repository.delete_movie(movie_id).await? {
            DeleteMovieResult::Deleted {
                reservations_removed,
            } => {
                info!(movie_id, reservations_removed, "Movie deleted successfully");
                Ok(())
            }
            DeleteMovieResult::MovieNotFound => {
                Err(AppError::NotFound("Movie not found".to_string()))
            }
        }
    }
}
