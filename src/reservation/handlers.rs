use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use super::types::{CreateReservationRequest, ReservationResponse};
use crate::auth::AuthClaims;
use crate::shared::{ApiJson, AppError, AppState, ErrorResponse};

/// HTTP handler for booking a seat
///
/// POST /reservations
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Seat booked", body = ReservationResponse),
        (status = 400, description = "movie_id missing", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Booking for another user without admin role", body = ErrorResponse),
        (status = 404, description = "Movie or user not found", body = ErrorResponse),
        (status = 409, description = "No seats left", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(name = "create_reservation", skip(state, claims, request))]
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    ApiJson(request): ApiJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    let reservation = state
        .reservation_service()
        .create_reservation(&claims, request)
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// HTTP handler for listing a user's reservations
///
/// GET /reservations/:user_id
#[utoipa::path(
    get,
    path = "/reservations/{user_id}",
    tag = "reservations",
    params(("user_id" = i64, Path, description = "Owner of the reservations")),
    responses(
        (status = 200, description = "The user's reservations", body = [ReservationResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token belongs to another user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(name = "list_reservations", skip(state, claims))]
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let reservations = state
        .reservation_service()
        .list_reservations(&claims, user_id)
        .await?;

    info!(count = reservations.len(), "Reservations listed successfully");

    Ok(Json(reservations))
}
