//! Application configuration read from the environment.

use tracing::warn;

const DEV_SECRET: &str = "your-secret-key-change-in-production";

/// Lowest work factor bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;
/// Highest work factor bcrypt accepts
pub const MAX_BCRYPT_COST: u32 = 31;

/// Upper bound on access token lifetime (one year)
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 60 * 24 * 365;

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// Postgres connection URL; `None` runs on in-memory repositories
    pub database_url: Option<String>,
    /// Pool size for the Postgres connection pool
    pub database_max_connections: u32,
    /// Keep sqlx statement logging on
    pub track_modifications: bool,
    /// HMAC secret for signing access tokens
    pub jwt_secret: String,
    /// Require the `sub` claim when decoding tokens
    pub jwt_verify_sub: bool,
    /// Access token lifetime
    pub jwt_expiration_minutes: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Admin account created when the database has none
    pub default_admin_username: String,
    pub default_admin_password: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            database_url: None,
            database_max_connections: 5,
            track_modifications: false,
            jwt_secret: DEV_SECRET.to_string(),
            jwt_verify_sub: true,
            jwt_expiration_minutes: 15,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            default_admin_username: "admin".to_string(),
            default_admin_password: "admin".to_string(),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let jwt_secret = lookup("JWT_SECRET_KEY")
            .or_else(|| lookup("SECRET_KEY"))
            .unwrap_or_else(|| {
                warn!("JWT_SECRET_KEY not set, using development secret");
                DEV_SECRET.to_string()
            });

        Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            database_url: lookup("DATABASE_URL").or_else(|| lookup("SQLALCHEMY_DATABASE_URI")),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.database_max_connections),
            track_modifications: lookup("SQLALCHEMY_TRACK_MODIFICATIONS")
                .map(|s| parse_bool(&s))
                .unwrap_or(defaults.track_modifications),
            jwt_secret,
            jwt_verify_sub: lookup("JWT_VERIFY_SUB")
                .map(|s| parse_bool(&s))
                .unwrap_or(defaults.jwt_verify_sub),
            jwt_expiration_minutes: lookup("JWT_ACCESS_TOKEN_EXPIRES_MINUTES")
                .and_then(|s| s.parse().ok())
                .filter(|minutes| (1..=MAX_TOKEN_LIFETIME_MINUTES).contains(minutes))
                .unwrap_or(defaults.jwt_expiration_minutes),
            bcrypt_cost: lookup("BCRYPT_COST")
                .and_then(|s| s.parse().ok())
                .filter(|cost| (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(cost))
                .unwrap_or(defaults.bcrypt_cost),
            default_admin_username: lookup("DEFAULT_ADMIN_USERNAME")
                .unwrap_or(defaults.default_admin_username),
            default_admin_password: lookup("DEFAULT_ADMIN_PASSWORD")
                .unwrap_or(defaults.default_admin_password),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]);

        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert!(config.database_url.is_none());
        assert!(config.jwt_verify_sub);
        assert_eq!(config.jwt_expiration_minutes, 15);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.default_admin_username, "admin");
    }

    #[test]
    fn test_legacy_variable_names_are_fallbacks() {
        let config = config_from(&[
            ("SQLALCHEMY_DATABASE_URI", "postgres://legacy"),
            ("SECRET_KEY", "legacy-secret"),
        ]);
        assert_eq!(config.database_url.as_deref(), Some("postgres://legacy"));
        assert_eq!(config.jwt_secret, "legacy-secret");

        let config = config_from(&[
            ("DATABASE_URL", "postgres://primary"),
            ("SQLALCHEMY_DATABASE_URI", "postgres://legacy"),
            ("JWT_SECRET_KEY", "jwt-secret"),
            ("SECRET_KEY", "legacy-secret"),
        ]);
        assert_eq!(config.database_url.as_deref(), Some("postgres://primary"));
        assert_eq!(config.jwt_secret, "jwt-secret");
    }

    #[test]
    fn test_boolean_and_numeric_parsing() {
        let config = config_from(&[
            ("JWT_VERIFY_SUB", "False"),
            ("SQLALCHEMY_TRACK_MODIFICATIONS", "1"),
            ("JWT_ACCESS_TOKEN_EXPIRES_MINUTES", "60"),
            ("DATABASE_MAX_CONNECTIONS", "not-a-number"),
        ]);

        assert!(!config.jwt_verify_sub);
        assert!(config.track_modifications);
        assert_eq!(config.jwt_expiration_minutes, 60);
        assert_eq!(config.database_max_connections, 5);
    }

    #[test]
    fn test_out_of_range_bcrypt_cost_is_ignored() {
        let config = config_from(&[("BCRYPT_COST", "99")]);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);

        let config = config_from(&[("BCRYPT_COST", "3")]);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);

        let config = config_from(&[("BCRYPT_COST", "6")]);
        assert_eq!(config.bcrypt_cost, 6);
    }

    #[test]
    fn test_out_of_range_token_lifetime_is_ignored() {
        for value in ["0", "-5", "9223372036854775"] {
            let config = config_from(&[("JWT_ACCESS_TOKEN_EXPIRES_MINUTES", value)]);
            assert_eq!(config.jwt_expiration_minutes, 15, "accepted {}", value);
        }

        let config = config_from(&[("JWT_ACCESS_TOKEN_EXPIRES_MINUTES", "525600")]);
        assert_eq!(config.jwt_expiration_minutes, MAX_TOKEN_LIFETIME_MINUTES);
    }
}
