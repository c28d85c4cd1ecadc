use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::models::ReservationModel;

/// Request payload for booking a seat
///
/// `user_id` defaults to the caller; only admins may book for someone else.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub movie_id: Option<i64>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ReservationResponse {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub room: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReservationModel> for ReservationResponse {
    fn from(reservation: ReservationModel) -> Self {
        Self {
            id: reservation.id,
            user_id: reservation.user_id,
            movie_id: reservation.movie_id,
            room: reservation.room,
            created_at: reservation.created_at,
        }
    }
}
