// Public API - what other modules can use
pub use handlers::{create_movie, delete_movie, get_movie, list_movies};

// Internal modules
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
