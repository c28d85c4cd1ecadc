use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use super::types::{CreateUserRequest, CreateUserResponse, ResetPasswordRequest};
use crate::auth::AuthClaims;
use crate::shared::{ApiJson, AppError, AppState, ErrorResponse, MessageResponse};

/// HTTP handler for registering a user
///
/// POST /users
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Username or password missing", body = ErrorResponse),
        (status = 409, description = "The user already exists", body = ErrorResponse)
    )
)]
#[instrument(name = "create_user", skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let user = state.user_service().register(request).await?;

    info!(user_id = user.id, "User created successfully");

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully".to_string(),
            id: user.id,
        }),
    ))
}

/// HTTP handler for resetting a password
///
/// POST /users/:user_id/reset_password (Bearer token of that user or an admin)
#[utoipa::path(
    post,
    path = "/users/{user_id}/reset_password",
    tag = "users",
    params(("user_id" = i64, Path, description = "Id of the user whose password changes")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "New password missing", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token belongs to another user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(name = "reset_password", skip(state, claims, request))]
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(user_id): Path<i64>,
    ApiJson(request): ApiJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .user_service()
        .reset_password(&claims, user_id, request)
        .await?;

    Ok(Json(MessageResponse::new("Password reset successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{jwt_auth, Role};
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{body::Body, http::Request, middleware, routing::post, Router};
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/users", post(create_user))
            .route(
                "/users/:user_id/reset_password",
                post(reset_password)
                    .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth)),
            )
            .with_state(state)
    }

    fn json_request(uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_create_user_handler() {
        let app = app(AppStateBuilder::new().build());

        let response = app
            .oneshot(json_request(
                "/users",
                r#"{"username": "alice", "password": "pw"}"#,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: CreateUserResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.message, "User created successfully");
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn test_create_user_handler_missing_password() {
        let app = app(AppStateBuilder::new().build());

        let response = app
            .oneshot(json_request("/users", r#"{"username": "alice"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_user_handler_wrong_field_type() {
        let app = app(AppStateBuilder::new().build());

        let response = app
            .oneshot(json_request(
                "/users",
                r#"{"username": 5, "password": "pw"}"#,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reset_password_handler_requires_token() {
        let app = app(AppStateBuilder::new().build());

        let response = app
            .oneshot(json_request(
                "/users/1/reset_password",
                r#"{"new_password": "x"}"#,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_reset_password_handler() {
        let state = AppStateBuilder::new().build();
        let user = state
            .user_service()
            .register(CreateUserRequest {
                username: Some("alice".to_string()),
                password: Some("pw".to_string()),
                email: None,
            })
            .await
            .unwrap();
        let token = state.token_config.create_token(user.id, Role::User).unwrap();

        let response = app(state)
            .oneshot(json_request(
                &format!("/users/{}/reset_password", user.id),
                r#"{"new_password": "new-pw"}"#,
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let message: MessageResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(message.message, "Password reset successfully");
    }
}
