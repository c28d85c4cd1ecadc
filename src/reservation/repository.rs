use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

use super::models::ReservationModel;
use crate::shared::AppError;
use crate::store::InMemoryStore;

/// Result of attempting to book a seat
#[derive(Debug, Clone, PartialEq)]
pub enum ReserveSeatResult {
    /// Seat taken, returns the stored reservation
    Success(ReservationModel),
    /// No seats left for the movie
    SoldOut,
    /// Movie does not exist
    MovieNotFound,
    /// User does not exist
    UserNotFound,
}

/// Trait for reservation repository operations
#[async_trait]
pub trait ReservationRepository {
    /// Atomically checks capacity, decrements the movie's seats and stores the reservation
    /// This prevents overbooking when several users book the last seat simultaneously
    async fn try_reserve_seat(
        &self,
        movie_id: i64,
        user_id: i64,
    ) -> Result<ReserveSeatResult, AppError>;

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<ReservationModel>, AppError>;
}

/// In-memory implementation of ReservationRepository for development and testing
#[derive(Default)]
pub struct InMemoryReservationRepository {
    store: InMemoryStore,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    #[instrument(skip(self))]
    async fn try_reserve_seat(
        &self,
        movie_id: i64,
        user_id: i64,
    ) -> Result<ReserveSeatResult, AppError> {
        debug!("Attempting to reserve seat atomically");

        let mut tables = self.store.lock()?;

        // Same precedence as the database path: movie, then seats, then user
        match tables.movies.get(&movie_id) {
            None => {
                debug!("Movie not found");
                return Ok(ReserveSeatResult::MovieNotFound);
            }
            Some(movie) if movie.is_sold_out() => {
                debug!("Movie is sold out");
                return Ok(ReserveSeatResult::SoldOut);
            }
            Some(_) => {}
        }

        if !tables.users.contains_key(&user_id) {
            debug!("User not found");
            return Ok(ReserveSeatResult::UserNotFound);
        }

        let room = match tables.movies.get_mut(&movie_id) {
            Some(movie) => {
                movie.seats -= 1;
                movie.room.clone()
            }
            None => return Ok(ReserveSeatResult::MovieNotFound),
        };

        let id = tables.next_reservation_id();
        let reservation = ReservationModel {
            id,
            user_id,
            movie_id,
            room,
            created_at: Utc::now(),
        };
        tables.reservations.insert(id, reservation.clone());

        info!(reservation_id = id, "Seat reserved in memory");
        Ok(ReserveSeatResult::Success(reservation))
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<ReservationModel>, AppError> {
        debug!("Listing reservations for user in memory");

        let tables = self.store.lock()?;
        Ok(tables
            .reservations
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// PostgreSQL implementation of reservation repository
pub struct PostgresReservationRepository {
    pool: PgPool,
}

impl PostgresReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    #[instrument(skip(self))]
    async fn try_reserve_seat(
        &self,
        movie_id: i64,
        user_id: i64,
    ) -> Result<ReserveSeatResult, AppError> {
        debug!("Reserving seat in database");

        let db_error = |e: sqlx::Error| {
            warn!(error = %e, "Failed to reserve seat in database");
            AppError::DatabaseError(e.to_string())
        };

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // Conditional decrement; no row back means missing movie or no seats
        let room: Option<String> = sqlx::query_scalar(
            "UPDATE movies SET seats = seats - 1 WHERE id = $1 AND seats > 0 RETURNING room",
        )
        .bind(movie_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        let Some(room) = room else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM movies WHERE id = $1)")
                    .bind(movie_id)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(db_error)?;
            tx.rollback().await.map_err(db_error)?;

            return Ok(if exists {
                debug!("Movie is sold out");
                ReserveSeatResult::SoldOut
            } else {
                debug!("Movie not found");
                ReserveSeatResult::MovieNotFound
            });
        };

        let inserted = sqlx::query_as::<_, ReservationModel>(
            "INSERT INTO reservations (user_id, movie_id, room) VALUES ($1, $2, $3) \
             RETURNING id, user_id, movie_id, room, created_at",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(&room)
        .fetch_one(&mut *tx)
        .await;

        let reservation = match inserted {
            Ok(reservation) => reservation,
            Err(sqlx::Error::Database(ref db)) if db.is_foreign_key_violation() => {
                tx.rollback().await.map_err(db_error)?;
                debug!("User not found");
                return Ok(ReserveSeatResult::UserNotFound);
            }
            Err(e) => return Err(db_error(e)),
        };

        tx.commit().await.map_err(db_error)?;

        info!(reservation_id = reservation.id, "Seat reserved in database");
        Ok(ReserveSeatResult::Success(reservation))
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<ReservationModel>, AppError> {
        debug!("Listing reservations for user in database");

        sqlx::query_as::<_, ReservationModel>(
            "SELECT id, user_id, movie_id, room, created_at FROM reservations WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list reservations from database");
            AppError::DatabaseError(e.to_string())
        })
    }
}
