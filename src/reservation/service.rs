use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    repository::{ReservationRepository, ReserveSeatResult},
    types::{CreateReservationRequest, ReservationResponse},
};
use crate::auth::AuthClaims;
use crate::shared::AppError;
use crate::user::repository::UserRepository;

/// Service for handling reservation business logic
pub struct ReservationService {
    repository: Arc<dyn ReservationRepository + Send + Sync>,
    user_repository: Arc<dyn UserRepository + Send + Sync>,
}

impl ReservationService {
    pub fn new(
        repository: Arc<dyn ReservationRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self {
            repository,
            user_repository,
        }
    }

    /// Books one seat for the caller, or for `request.user_id` when the caller is an admin
    #[instrument(skip(self, claims, request))]
    pub async fn create_reservation(
        &self,
        claims: &AuthClaims,
        request: CreateReservationRequest,
    ) -> Result<ReservationResponse, AppError> {
        let movie_id = request
            .movie_id
            .ok_or_else(|| AppError::BadRequest("The movie_id is required".to_string()))?;

        let caller_id = claims.user_id()?;
        let user_id = request.user_id.unwrap_or(caller_id);
        claims.require_self_or_admin(user_id)?;

        match self.repository.try_reserve_seat(movie_id, user_id).await? {
            ReserveSeatResult::Success(reservation) => {
                info!(
                    reservation_id = reservation.id,
                    movie_id,
                    user_id,
                    "Reservation created successfully"
                );
                Ok(ReservationResponse::from(reservation))
            }
            ReserveSeatResult::SoldOut => {
                warn!(movie_id, "Reservation rejected: no seats left");
                Err(AppError::Conflict(
                    "Don't have available seats to this movie".to_string(),
                ))
            }
            ReserveSeatResult::MovieNotFound => {
                Err(AppError::NotFound("Movie not found".to_string()))
            }
            ReserveSeatResult::UserNotFound => {
                Err(AppError::NotFound("User not found".to_string()))
            }
        }
    }

    /// Lists a user's reservations; the caller must be that user or an admin
    #[instrument(skip(self, claims))]
    pub async fn list_reservations(
        &self,
        claims: &AuthClaims,
        user_id: i64,
    ) -> Result<Vec<ReservationResponse>, AppError> {
        claims.require_self_or_admin(user_id)?;

        if self.user_repository.get_user(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let reservations = self.repository.list_for_user(user_id).await?;
        debug!(count = reservations.len(), "Reservations retrieved");

        Ok(reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect())
    }
}
