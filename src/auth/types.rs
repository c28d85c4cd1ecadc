use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::shared::AppError;

/// Role carried in access tokens and stored on each user
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn from_is_admin(is_admin: bool) -> Self {
        if is_admin {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    /// Whether a holder of `self` may act where `required` is demanded
    pub fn satisfies(self, required: Role) -> bool {
        match required {
            Role::User => true,
            Role::Admin => self == Role::Admin,
        }
    }
}

/// JWT claims structure carrying the authenticated user's identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthClaims {
    /// User id, as a string per the JWT `sub` convention
    #[serde(default)]
    pub sub: String,
    pub role: Role,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

impl AuthClaims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Token subject is not a user id".to_string()))
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_role(&self, required: Role) -> Result<(), AppError> {
        if self.role.satisfies(required) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Access denied, you are not an admin".to_string(),
            ))
        }
    }

    /// Passes when the token belongs to `user_id` or to an admin
    pub fn require_self_or_admin(&self, user_id: i64) -> Result<(), AppError> {
        if self.is_admin() || self.user_id()? == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Access denied, this resource belongs to another user".to_string(),
            ))
        }
    }
}

/// Request payload for the login endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response structure for a successful login
#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub id: i64,
    pub is_admin: bool,
}
