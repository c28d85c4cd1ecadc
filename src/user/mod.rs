// Public API - what other modules can use
pub use handlers::{create_user, reset_password};

// Internal modules
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
