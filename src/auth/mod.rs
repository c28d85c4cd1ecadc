// Public API - what other modules can use
pub use handlers::login;
pub use middleware::{admin_auth, jwt_auth};
pub use types::{AuthClaims, Role};

// Internal modules
pub mod handlers;
mod middleware;
pub mod password;
pub mod service;
pub mod token;
pub mod types;
