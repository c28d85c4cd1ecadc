use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

use super::models::{MovieModel, NewMovie};
use crate::shared::AppError;
use crate::store::InMemoryStore;

const ROOM_IN_USE: &str = "Room already in use";

/// Result of attempting to delete a movie
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteMovieResult {
    /// Movie removed together with its reservations
    Deleted { reservations_removed: u64 },
    /// Movie does not exist
    MovieNotFound,
}

/// Trait for movie repository operations
#[async_trait]
pub trait MovieRepository {
    /// Inserts a movie; fails with `Conflict` when the room already hosts one
    async fn create_movie(&self, movie: &NewMovie) -> Result<MovieModel, AppError>;
    async fn get_movie(&self, movie_id: i64) -> Result<Option<MovieModel>, AppError>;
    async fn list_movies(&self) -> Result<Vec<MovieModel>, AppError>;

    /// Atomically deletes a movie and every reservation for it
    async fn delete_movie(&self, movie_id: i64) -> Result<DeleteMovieResult, AppError>;
}

/// In-memory implementation of MovieRepository for development and testing
#[derive(Default)]
pub struct InMemoryMovieRepository {
    store: InMemoryStore,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    #[instrument(skip(self, movie), fields(title = %movie.title, room = %movie.room))]
    async fn create_movie(&self, movie: &NewMovie) -> Result<MovieModel, AppError> {
        debug!("Creating movie in memory");

        let mut tables = self.store.lock()?;
        if tables.movies.values().any(|m| m.room == movie.room) {
            warn!("Room already in use in memory");
            return Err(AppError::Conflict(ROOM_IN_USE.to_string()));
        }

        let id = tables.next_movie_id();
        let model = movie.clone().into_model(id);
        tables.movies.insert(id, model.clone());

        debug!(movie_id = id, "Movie created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_movie(&self, movie_id: i64) -> Result<Option<MovieModel>, AppError> {
        debug!("Fetching movie from memory");

        let tables = self.store.lock()?;
        Ok(tables.movies.get(&movie_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_movies(&self) -> Result<Vec<MovieModel>, AppError> {
        debug!("Listing all movies in memory");

        let tables = self.store.lock()?;
        Ok(tables.movies.values().cloned().collect())
    }

    #[instrument(skip(self))]
    async fn delete_movie(&self, movie_id: i64) -> Result<DeleteMovieResult, AppError> {
        debug!("Deleting movie from memory");

        let mut tables = self.store.lock()?;
        if tables.movies.remove(&movie_id).is_none() {
            debug!("Movie not found for deletion in memory");
            return Ok(DeleteMovieResult::MovieNotFound);
        }

        let before = tables.reservations.len();
        tables.reservations.retain(|_, r| r.movie_id != movie_id);
        let reservations_removed = (before - tables.reservations.len()) as u64;

        info!(movie_id, reservations_removed, "Movie deleted from memory");
        Ok(DeleteMovieResult::Deleted {
            reservations_removed,
        })
    }
}

/// PostgreSQL implementation of movie repository
pub struct PostgresMovieRepository {
    pool: PgPool,
}

impl PostgresMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    #[instrument(skip(self, movie), fields(title = %movie.title, room = %movie.room))]
    async fn create_movie(&self, movie: &NewMovie) -> Result<MovieModel, AppError> {
        debug!("Creating movie in database");

        let model = sqlx::query_as::<_, MovieModel>(
            "INSERT INTO movies (title, description, room, seats, showtime) VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, title, description, room, seats, showtime, created_at",
        )
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(&movie.room)
        .bind(movie.seats)
        .bind(movie.showtime)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                warn!("Room already in use in database");
                AppError::Conflict(ROOM_IN_USE.to_string())
            }
            e => {
                warn!(error = %e, "Failed to create movie in database");
                AppError::DatabaseError(e.to_string())
            }
        })?;

        debug!(movie_id = model.id, "Movie created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_movie(&self, movie_id: i64) -> Result<Option<MovieModel>, AppError> {
        debug!("Fetching movie from database");

        sqlx::query_as::<_, MovieModel>(
            "SELECT id, title, description, room, seats, showtime, created_at FROM movies WHERE id = $1",
        )
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch movie from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn list_movies(&self) -> Result<Vec<MovieModel>, AppError> {
        debug!("Listing all movies in database");

        sqlx::query_as::<_, MovieModel>(
            "SELECT id, title, description, room, seats, showtime, created_at FROM movies ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list movies from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn delete_movie(&self, movie_id: i64) -> Result<DeleteMovieResult, AppError> {
        debug!("Deleting movie from database");

        let db_error = |e: sqlx::Error| {
            warn!(error = %e, "Failed to delete movie from database");
            AppError::DatabaseError(e.to_string())
        };

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let reservations_removed = sqlx::query("DELETE FROM reservations WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(movie_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await.map_err(db_error)?;
            debug!("Movie not found for deletion");
            return Ok(DeleteMovieResult::MovieNotFound);
        }

        tx.commit().await.map_err(db_error)?;

        info!(movie_id, reservations_removed, "Movie deleted from database");
        Ok(DeleteMovieResult::Deleted {
            reservations_removed,
        })
    }
}


#[cfg(test)]
mod postgres_tests {
    use super::*;
    use crate::auth::Role;
    use crate::reservation::repository::{
        PostgresReservationRepository, ReservationRepository, ReserveSeatResult,
    };
    use crate::user::models::NewUser;
    use crate::user::repository::{PostgresUserRepository, UserRepository};

    fn new_movie(title: &str, room: &str, seats: i32) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            description: None,
            room: room.to_string(),
            seats,
            showtime: None,
        }
    }

    #[sqlx::test]
    #[ignore] // Requires Postgres at DATABASE_URL
    async fn test_room_in_use_conflicts(pool: PgPool) {
        let repo = PostgresMovieRepository::new(pool);
        repo.create_movie(&new_movie("Alien", "A", 10)).await.unwrap();

        let result = repo.create_movie(&new_movie("Heat", "A", 5)).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[sqlx::test]
    #[ignore] // Requires Postgres at DATABASE_URL
    async fn test_delete_cascades_to_reservations(pool: PgPool) {
        let user = PostgresUserRepository::new(pool.clone())
            .create_user(&NewUser {
                username: "alice".to_string(),
                email: None,
                password_hash: "hash".to_string(),
                role: Role::User,
            })
            .await
            .unwrap();
        let repo = PostgresMovieRepository::new(pool.clone());
        let movie = repo.create_movie(&new_movie("Alien", "A", 10)).await.unwrap();

        let reservations = PostgresReservationRepository::new(pool);
        assert!(matches!(
            reservations.try_reserve_seat(movie.id, user.id).await.unwrap(),
            ReserveSeatResult::Success(_)
        ));

        assert_eq!(
            repo.delete_movie(movie.id).await.unwrap(),
            DeleteMovieResult::Deleted {
                reservations_removed: 1
            }
        );
        assert!(repo.get_movie(movie.id).await.unwrap().is_none());
        assert!(reservations.list_for_user(user.id).await.unwrap().is_empty());
        assert_eq!(
            repo.delete_movie(movie.id).await.unwrap(),
            DeleteMovieResult::MovieNotFound
        );
    }
}
