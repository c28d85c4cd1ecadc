use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::{TestApp, ADMIN_PASSWORD, ADMIN_USERNAME};

// ============================================================================
// Action Helpers
// ============================================================================

/// A logged-in user as seen by the tests
#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub token: String,
}

impl TestApp {
    /// Sends a request through the full router and decodes the JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/users",
            None,
            json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/login",
            None,
            json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Registers and logs in a regular user
    pub async fn signed_up_user(&self, username: &str) -> Session {
        let (status, _) = self.register(username, "pw").await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self.login(username, "pw").await;
        assert_eq!(status, StatusCode::OK);
        session_from(&body)
    }

    /// Logs in as the seeded admin
    pub async fn admin(&self) -> Session {
        let (status, body) = self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_admin"], true);
        session_from(&body)
    }

    /// Creates a movie as admin and returns its JSON
    pub async fn create_movie(&self, admin: &Session, title: &str, room: &str, seats: i32) -> Value {
        let (status, body) = self
            .post(
                "/showing_movies",
                Some(&admin.token),
                json!({
                    "title": title,
                    "description": format!("{} description", title),
                    "room": room,
                    "seats": seats
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    pub async fn reserve(&self, user: &Session, movie_id: i64) -> (StatusCode, Value) {
        self.post(
            "/reservations",
            Some(&user.token),
            json!({ "movie_id": movie_id }),
        )
        .await
    }
}

fn session_from(body: &Value) -> Session {
    Session {
        id: body["id"].as_i64().unwrap(),
        token: body["access_token"].as_str().unwrap().to_string(),
    }
}
