// Fixtures shared by the database backed tests
use axum::{body::Body, http::{header, Request}, response::Response};
use pwhash::bcrypt;
use sqlx::MySqlPool;

use crate::AppState;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_VERSION: &str = "2.0.0";

pub fn test_state() -> AppState {
    AppState {
        jwt_secret: TEST_SECRET.to_string(),
        token_duration: 600,
        version: TEST_VERSION.to_string(),
    }
}

// Insert a user with a bcrypt hashed password, returning its uid
pub async fn create_test_user(pool: &MySqlPool, username: &str, email: &str, password: &str) -> i32 {
    let password_hash = bcrypt::hash(password).unwrap();
    sqlx::query("INSERT INTO user (email, username, password_hash) VALUES (?, ?, ?)")
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_id() as i32
}

pub async fn create_test_server(pool: &MySqlPool, owner_id: i32) {
    sqlx::query("INSERT INTO server (name, university, monetization_link, motd, owner_id) VALUES (?, ?, ?, ?, ?)")
        .bind("Erre2 Unimore")
        .bind("Unimore")
        .bind("https://example.org/donate")
        .bind("Welcome")
        .bind(owner_id)
        .execute(pool)
        .await
        .unwrap();
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
