use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::types::{LoginRequest, LoginResponse};
use crate::shared::{ApiJson, AppError, AppState, ErrorResponse};

/// HTTP handler for logging in
///
/// POST /login
/// Returns an access token with the user's id and admin flag
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Credentials are incorrect", body = ErrorResponse)
    )
)]
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    info!("Login attempt");

    let response = state.auth_service().login(request).await?;

    Ok(Json(response))
}
