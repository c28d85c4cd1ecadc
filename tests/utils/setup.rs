use axum::Router;

use cine_reservation::{create_router, db, AppConfig, AppState};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-pw";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestAppBuilder {
    config: AppConfig,
    seed_admin: bool,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig {
                jwt_secret: "integration-test-secret".to_string(),
                bcrypt_cost: cine_reservation::config::MIN_BCRYPT_COST,
                default_admin_username: ADMIN_USERNAME.to_string(),
                default_admin_password: ADMIN_PASSWORD.to_string(),
                ..AppConfig::default()
            },
            seed_admin: true,
        }
    }

    pub fn with_token_lifetime_minutes(mut self, minutes: i64) -> Self {
        self.config.jwt_expiration_minutes = minutes;
        self
    }

    pub fn without_admin(mut self) -> Self {
        self.seed_admin = false;
        self
    }

    pub async fn build(self) -> TestApp {
        let state = db::build_state(&self.config).await.unwrap();

        if self.seed_admin {
            state
                .user_service()
                .seed_default_admin(
                    &self.config.default_admin_username,
                    &self.config.default_admin_password,
                )
                .await
                .unwrap();
        }

        TestApp {
            router: create_router(state.clone()),
            state,
        }
    }
}
