use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use super::models::{NewUser, UserModel};
use crate::shared::AppError;
use crate::store::InMemoryStore;

const USER_EXISTS: &str = "The user already exists";

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    /// Inserts a user; fails with `Conflict` when the username or email is taken
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError>;
    async fn get_user(&self, user_id: i64) -> Result<Option<UserModel>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError>;
    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError>;
    async fn has_admin(&self) -> Result<bool, AppError>;
}

/// In-memory implementation of UserRepository for development and testing
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

impl InMemoryUserRepository {
    /// Creates a repository over its own empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository sharing tables with other in-memory repositories
    pub fn with_store(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!("Creating user in memory");

        let mut tables = self.store.lock()?;
        let taken = tables.users.values().any(|existing| {
            existing.username == user.username
                || (user.email.is_some() && existing.email == user.email)
        });
        if taken {
            warn!("User already exists in memory");
            return Err(AppError::Conflict(USER_EXISTS.to_string()));
        }

        let id = tables.next_user_id();
        let model = user.clone().into_model(id);
        tables.users.insert(id, model.clone());

        debug!(user_id = id, "User created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: i64) -> Result<Option<UserModel>, AppError> {
        debug!("Fetching user from memory");

        let tables = self.store.lock()?;
        Ok(tables.users.get(&user_id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        debug!("Looking up user by username in memory");

        let tables = self.store.lock()?;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError> {
        debug!("Updating password in memory");

        let mut tables = self.store.lock()?;
        match tables.users.get_mut(&user_id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(())
            }
            None => {
                warn!("User not found for password update in memory");
                Err(AppError::NotFound("User not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn has_admin(&self) -> Result<bool, AppError> {
        let tables = self.store.lock()?;
        Ok(tables.users.values().any(|user| user.is_admin))
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!("Creating user in database");

        let model = sqlx::query_as::<_, UserModel>(
            "INSERT INTO users (username, email, password_hash, is_admin) VALUES ($1, $2, $3, $4) \
             RETURNING id, username, email, password_hash, is_admin, created_at",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.is_admin())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                warn!("User already exists in database");
                AppError::Conflict(USER_EXISTS.to_string())
            }
            e => {
                warn!(error = %e, "Failed to create user in database");
                AppError::DatabaseError(e.to_string())
            }
        })?;

        debug!(user_id = model.id, "User created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: i64) -> Result<Option<UserModel>, AppError> {
        debug!("Fetching user from database");

        sqlx::query_as::<_, UserModel>(
            "SELECT id, username, email, password_hash, is_admin, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        debug!("Looking up user by username in database");

        sqlx::query_as::<_, UserModel>(
            "SELECT id, username, email, password_hash, is_admin, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to look up user in database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError> {
        debug!("Updating password in database");

        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to update password in database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!("User not found for password update");
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn has_admin(&self) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE is_admin)")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to check for admin users");
                AppError::DatabaseError(e.to_string())
            })
    }
}
