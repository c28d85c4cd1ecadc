//! OpenAPI document and Swagger UI page.

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::shared::{AppState, ErrorResponse, MessageResponse};
use crate::{auth, movie, reservation, routes, user};

pub const SPEC_ROUTE: &str = "/apispec_1.json";
pub const UI_ROUTE: &str = "/apidocs";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cine Reservation API",
        description = "API for managing movie reservations"
    ),
    paths(
        routes::health,
        user::handlers::create_user,
        user::handlers::reset_password,
        auth::handlers::login,
        movie::handlers::list_movies,
        movie::handlers::get_movie,
        movie::handlers::create_movie,
        movie::handlers::delete_movie,
        reservation::handlers::create_reservation,
        reservation::handlers::list_reservations,
    ),
    components(schemas(
        ErrorResponse,
        MessageResponse,
        user::types::CreateUserRequest,
        user::types::CreateUserResponse,
        user::types::ResetPasswordRequest,
        auth::types::LoginRequest,
        auth::types::LoginResponse,
        movie::types::CreateMovieRequest,
        movie::types::MovieResponse,
        reservation::types::CreateReservationRequest,
        reservation::types::ReservationResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Access tokens"),
        (name = "users", description = "Registration and passwords"),
        (name = "movies", description = "Movies on show"),
        (name = "reservations", description = "Seat bookings")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Routes serving the JSON document and the Swagger UI under `/apidocs/`
pub fn router() -> Router<AppState> {
    SwaggerUi::new(UI_ROUTE)
        .url(SPEC_ROUTE, ApiDoc::openapi())
        .into()
}
