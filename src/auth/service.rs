use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    password::PasswordHasher,
    token::TokenConfig,
    types::{AuthClaims, LoginRequest, LoginResponse, Role},
};
use crate::shared::{required_field, AppError};
use crate::user::repository::UserRepository;

const INVALID_CREDENTIALS: &str = "Credentials are incorrect. Please try again.";

/// Service for credential checks and token handling
pub struct AuthService {
    user_repository: Arc<dyn UserRepository + Send + Sync>,
    token_config: TokenConfig,
    password_hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        token_config: TokenConfig,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            user_repository,
            token_config,
            password_hasher,
        }
    }

    /// Verifies credentials and issues an access token
    ///
    /// Unknown usernames and wrong passwords fail identically, and a hash is
    /// computed in both cases so response time does not reveal which.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        // Stored usernames are trimmed at registration
        let username = required_field(request.username).unwrap_or_default();
        let password = request.password.unwrap_or_default();

        let user = self.user_repository.find_by_username(&username).await?;

        let Some(user) = user else {
            self.password_hasher.hash(&password).await?;
            warn!("Login rejected: unknown username");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !self
            .password_hasher
            .verify(&password, &user.password_hash)
            .await?
        {
            warn!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let role = user.role();
        let access_token = self.token_config.create_token(user.id, role)?;

        info!(user_id = user.id, role = %role, "Login successful");

        Ok(LoginResponse {
            message: "Login successful".to_string(),
            access_token,
            id: user.id,
            is_admin: role.is_admin(),
        })
    }

    /// Verifies a token and, when given, that its role satisfies `required_role`
    #[instrument(skip(self, token))]
    pub fn authorize(
        &self,
        token: &str,
        required_role: Option<Role>,
    ) -> Result<AuthClaims, AppError> {
        let claims = self.token_config.validate_token(token)?;

        if let Some(required) = required_role {
            if let Err(e) = claims.require_role(required) {
                warn!(sub = %claims.sub, role = %claims.role, required = %required, "Insufficient role");
                return Err(e);
            }
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::models::NewUser;
    use crate::user::repository::InMemoryUserRepository;

    async fn service_with_user(username: &str, password: &str, role: Role) -> (AuthService, i64) {
        let hasher = PasswordHasher::new(crate::config::MIN_BCRYPT_COST);
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = repo
            .create_user(&NewUser {
                username: username.to_string(),
                email: None,
                password_hash: hasher.hash(password).await.unwrap(),
                role,
            })
            .await
            .unwrap();

        let service = AuthService::new(
            repo,
            TokenConfig::new("test-secret".to_string(), 15, true),
            hasher,
        );
        (service, user.id)
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_issues_token_with_identity() {
        let (service, user_id) = service_with_user("alice", "pw", Role::User).await;

        let response = service.login(login_request("alice", "pw")).await.unwrap();
        assert_eq!(response.id, user_id);
        assert!(!response.is_admin);

        let claims = service.authorize(&response.access_token, None).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_fail_the_same_way() {
        let (service, _) = service_with_user("alice", "pw", Role::User).await;

        let wrong_password = service.login(login_request("alice", "nope")).await;
        let unknown_user = service.login(login_request("bob", "pw")).await;

        match (wrong_password, unknown_user) {
            (Err(AppError::Unauthorized(a)), Err(AppError::Unauthorized(b))) => assert_eq!(a, b),
            other => panic!("expected two Unauthorized errors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_trims_username() {
        let (service, user_id) = service_with_user("alice", "pw", Role::User).await;

        let response = service.login(login_request("  alice ", "pw")).await.unwrap();
        assert_eq!(response.id, user_id);
    }

    #[tokio::test]
    async fn test_missing_credentials_are_unauthorized() {
        let (service, _) = service_with_user("alice", "pw", Role::User).await;

        let result = service
            .login(LoginRequest {
                username: None,
                password: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_authorize_enforces_required_role() {
        let (service, _) = service_with_user("alice", "pw", Role::User).await;
        let token = service
            .login(login_request("alice", "pw"))
            .await
            .unwrap()
            .access_token;

        assert!(service.authorize(&token, Some(Role::User)).is_ok());
        assert!(matches!(
            service.authorize(&token, Some(Role::Admin)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_authorize_admin_token() {
        let (service, _) = service_with_user("root", "pw", Role::Admin).await;
        let response = service.login(login_request("root", "pw")).await.unwrap();

        assert!(response.is_admin);
        assert!(service
            .authorize(&response.access_token, Some(Role::Admin))
            .is_ok());
    }

    #[tokio::test]
    async fn test_authorize_rejects_garbage() {
        let (service, _) = service_with_user("alice", "pw", Role::User).await;
        assert!(matches!(
            service.authorize("garbage", None),
            Err(AppError::JwtError(_))
        ));
    }
}
