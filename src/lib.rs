// Library crate for the cinema reservation API
// This file exposes the public API for the binary and integration tests

pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod movie;
pub mod reservation;
pub mod routes;
pub mod shared;
pub mod store;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use auth::{AuthClaims, Role};
pub use config::AppConfig;
pub use routes::create_router;
pub use shared::{AppError, AppState};
pub use store::InMemoryStore;
