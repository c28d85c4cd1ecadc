use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for reservations table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct ReservationModel {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub room: String, // Copied from the movie at booking time
    pub created_at: DateTime<Utc>,
}
