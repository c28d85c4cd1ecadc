use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request payload for registering a user
///
/// Fields are optional so that missing values are reported as 400 by the
/// service rather than as a deserialization failure.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Response for a successful registration
#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CreateUserResponse {
    pub message: String,
    pub id: i64,
}

/// Request payload for resetting a password
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub new_password: Option<String>,
}
