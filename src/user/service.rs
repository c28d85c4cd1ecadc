use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{NewUser, UserModel},
    repository::UserRepository,
    types::{CreateUserRequest, ResetPasswordRequest},
};
use crate::auth::{password::PasswordHasher, types::AuthClaims, Role};
use crate::shared::{required_field, AppError};

/// Service for handling user business logic
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    password_hasher: PasswordHasher,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    /// Registers a regular user with a hashed password
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: CreateUserRequest) -> Result<UserModel, AppError> {
        let (Some(username), Some(password)) = (
            required_field(request.username),
            request.password.filter(|p| !p.trim().is_empty()),
        ) else {
            return Err(AppError::BadRequest(
                "User and password are required".to_string(),
            ));
        };
        let email = required_field(request.email);

        if self.repository.find_by_username(&username).await?.is_some() {
            warn!(username = %username, "Registration rejected: username taken");
            return Err(AppError::Conflict("The user already exists".to_string()));
        }

        let password_hash = self.password_hasher.hash(&password).await?;
        let user = self
            .repository
            .create_user(&NewUser {
                username,
                email,
                password_hash,
                role: Role::User,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Replaces a user's password; the caller must be that user or an admin
    #[instrument(skip(self, claims, request))]
    pub async fn reset_password(
        &self,
        claims: &AuthClaims,
        user_id: i64,
        request: ResetPasswordRequest,
    ) -> Result<(), AppError> {
        claims.require_self_or_admin(user_id)?;

        if self.repository.get_user(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let new_password = request
            .new_password
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("The new password is required".to_string()))?;

        let password_hash = self.password_hasher.hash(&new_password).await?;
        self.repository
            .update_password(user_id, &password_hash)
            .await?;

        info!(user_id, by = %claims.sub, "Password reset");
        Ok(())
    }

    /// Creates the default admin account when no admin exists yet
    ///
    /// Returns the created admin, or `None` if one was already present.
    #[instrument(skip(self, password))]
    pub async fn seed_default_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserModel>, AppError> {
        if self.repository.has_admin().await? {
            debug!("Admin account already present");
            return Ok(None);
        }

        let password_hash = self.password_hasher.hash(password).await?;
        let admin = self
            .repository
            .create_user(&NewUser {
                username: username.to_string(),
                email: None,
                password_hash,
                role: Role::Admin,
            })
            .await?;

        info!(user_id = admin.id, username = %admin.username, "Default admin created");
        Ok(Some(admin))
    }
}
