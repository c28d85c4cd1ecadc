use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::{debug, instrument, warn};

use super::types::{AuthClaims, Role};
use crate::config::AppConfig;
use crate::shared::AppError;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration_minutes: i64,
    pub verify_sub: bool,
}

impl TokenConfig {
    pub fn new(secret: String, expiration_minutes: i64, verify_sub: bool) -> Self {
        Self {
            secret,
            expiration_minutes,
            verify_sub,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            config.jwt_expiration_minutes,
            config.jwt_verify_sub,
        )
    }

    /// Creates a new JWT token for the given user
    #[instrument(skip(self))]
    pub fn create_token(&self, user_id: i64, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = Duration::try_minutes(self.expiration_minutes)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                warn!(
                    expiration_minutes = self.expiration_minutes,
                    "Token lifetime out of range"
                );
                AppError::Internal
            })?
            .timestamp();

        debug!(
            expiration_minutes = self.expiration_minutes,
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = AuthClaims {
            sub: user_id.to_string(),
            role,
            exp: exp.max(0) as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::Internal
        })
    }

    /// Validates a JWT token and returns the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<AuthClaims, AppError> {
        debug!("Decoding and validating JWT token");

        let mut validation = Validation::default();
        if self.verify_sub {
            validation.set_required_spec_claims(&["exp", "sub"]);
        }

        let claims = decode::<AuthClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Token has expired".to_string())
                }
                _ => AppError::JwtError(e.to_string()),
            }
        })?;

        if self.verify_sub {
            claims.user_id()?;
        }

        debug!(
            sub = %claims.sub,
            role = %claims.role,
            exp = claims.exp,
            "JWT token decoded successfully"
        );

        Ok(claims)
    }
}
