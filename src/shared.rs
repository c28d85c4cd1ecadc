use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;
use utoipa::ToSchema;

use crate::auth::{password::PasswordHasher, service::AuthService, token::TokenConfig};
use crate::movie::{repository::MovieRepository, service::MovieService};
use crate::reservation::{repository::ReservationRepository, service::ReservationService};
use crate::user::{repository::UserRepository, service::UserService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub movie_repository: Arc<dyn MovieRepository + Send + Sync>,
    pub reservation_repository: Arc<dyn ReservationRepository + Send + Sync>,
    pub token_config: TokenConfig,
    pub password_hasher: PasswordHasher,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        movie_repository: Arc<dyn MovieRepository + Send + Sync>,
        reservation_repository: Arc<dyn ReservationRepository + Send + Sync>,
        token_config: TokenConfig,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            user_repository,
            movie_repository,
            reservation_repository,
            token_config,
            password_hasher,
        }
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            Arc::clone(&self.user_repository),
            self.token_config.clone(),
            self.password_hasher.clone(),
        )
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(
            Arc::clone(&self.user_repository),
            self.password_hasher.clone(),
        )
    }

    pub fn movie_service(&self) -> MovieService {
        MovieService::new(Arc::clone(&self.movie_repository))
    }

    pub fn reservation_service(&self) -> ReservationService {
        ReservationService::new(
            Arc::clone(&self.reservation_repository),
            Arc::clone(&self.user_repository),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::JwtError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
            }),
        )
            .into_response()
    }
}

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Plain `{"message": ...}` body used by endpoints that return no entity
#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JSON body extractor that reports every rejection as `AppError::BadRequest`
///
/// Malformed JSON, wrong field types and a missing content type all surface
/// with the same JSON error body as the rest of the API.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "Rejected request body");
                Err(AppError::BadRequest(rejection.body_text()))
            }
        }
    }
}

/// Returns the trimmed value if the field is present and not blank
pub fn required_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::movie::repository::InMemoryMovieRepository;
    use crate::reservation::repository::InMemoryReservationRepository;
    use crate::store::InMemoryStore;
    use crate::user::repository::InMemoryUserRepository;

    pub const TEST_SECRET: &str = "test-secret";

    /// Builder for creating AppState backed by one shared in-memory store
    pub struct AppStateBuilder {
        store: InMemoryStore,
        token_config: TokenConfig,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                token_config: TokenConfig::new(TEST_SECRET.to_string(), 15, true),
            }
        }

        pub fn with_store(mut self, store: InMemoryStore) -> Self {
            self.store = store;
            self
        }

        pub fn with_token_config(mut self, token_config: TokenConfig) -> Self {
            self.token_config = token_config;
            self
        }

        pub fn build(self) -> AppState {
            AppState::new(
                Arc::new(InMemoryUserRepository::with_store(self.store.clone())),
                Arc::new(InMemoryMovieRepository::with_store(self.store.clone())),
                Arc::new(InMemoryReservationRepository::with_store(self.store)),
                self.token_config,
                PasswordHasher::new(crate::config::MIN_BCRYPT_COST),
            )
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
