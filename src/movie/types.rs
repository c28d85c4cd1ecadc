use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::models::MovieModel;

/// Request payload for putting a movie on show
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub room: Option<String>,
    pub seats: Option<i32>,
    pub showtime: Option<DateTime<Utc>>,
}

/// Movie as returned by create, get and list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct MovieResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub room: String,
    pub seats: i32,
    pub showtime: Option<DateTime<Utc>>,
}

impl From<MovieModel> for MovieResponse {
    fn from(movie: MovieModel) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            description: movie.description,
            room: movie.room,
            seats: movie.seats,
            showtime: movie.showtime,
        }
    }
}
