use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

use crate::movie::models::MovieModel;
use crate::reservation::models::ReservationModel;
use crate::shared::AppError;
use crate::user::models::UserModel;

/// Tables backing the in-memory repositories
///
/// All three tables live behind one lock so that multi-table operations
/// (booking a seat, deleting a movie with its reservations) are atomic.
#[derive(Debug, Default)]
pub struct Tables {
    pub users: BTreeMap<i64, UserModel>,
    pub movies: BTreeMap<i64, MovieModel>,
    pub reservations: BTreeMap<i64, ReservationModel>,
    user_seq: i64,
    movie_seq: i64,
    reservation_seq: i64,
}

impl Tables {
    pub fn next_user_id(&mut self) -> i64 {
        self.user_seq += 1;
        self.user_seq
    }

    pub fn next_movie_id(&mut self) -> i64 {
        self.movie_seq += 1;
        self.movie_seq
    }

    pub fn next_reservation_id(&mut self) -> i64 {
        self.reservation_seq += 1;
        self.reservation_seq
    }
}

/// Cheaply cloneable handle to the in-memory tables
///
/// Data is lost when the application restarts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables.lock().map_err(|_| {
            warn!("In-memory store lock poisoned");
            AppError::Internal
        })
    }
}
