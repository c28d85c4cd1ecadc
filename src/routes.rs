use axum::{
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::shared::AppState;
use crate::{auth, docs, movie, reservation, user};

/// Builds the full application router
///
/// Public routes need no token, authenticated routes go through `jwt_auth`
/// and movie management goes through `admin_auth`.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/users", post(user::create_user))
        .route("/login", post(auth::login))
        .route("/movies", get(movie::list_movies))
        .route("/movies/:movie_id", get(movie::get_movie))
        .merge(docs::router());

    let authenticated = Router::new()
        .route("/users/:user_id/reset_password", post(user::reset_password))
        .route("/reservations", post(reservation::create_reservation))
        .route("/reservations/:user_id", get(reservation::list_reservations))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::jwt_auth,
        ));

    let admin = Router::new()
        .route("/showing_movies", post(movie::create_movie))
        .route("/movies/:movie_id", delete(movie::delete_movie))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::admin_auth,
        ));

    public
        .merge(authenticated)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
