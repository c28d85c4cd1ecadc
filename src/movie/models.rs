use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for movies table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct MovieModel {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub room: String, // At most one movie per room
    pub seats: i32,   // Seats still available for booking
    pub showtime: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl MovieModel {
    pub fn is_sold_out(&self) -> bool {
        self.seats <= 0
    }
}

/// Validated fields for inserting a movie
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub description: Option<String>,
    pub room: String,
    pub seats: i32,
    pub showtime: Option<DateTime<Utc>>,
}

impl NewMovie {
    pub fn into_model(self, id: i64) -> MovieModel {
        MovieModel {
            id,
            title: self.title,
            description: self.description,
            room: self.room,
            seats: self.seats,
            showtime: self.showtime,
            created_at: Utc::now(),
        }
    }
}
