//! Integration test harness
//!
//! These tests run against a live server (`cargo run`) with a clean database.
//! Run with: cargo test -- --ignored

mod api_tests;
mod borrow_flow;

use chrono::Utc;
use libris_server::models::user::IdentityClaims;
use reqwest::Client;
use serde_json::{json, Value};

pub const BASE_URL: &str = "http://localhost:3000";

/// Mint a bearer token the way the external identity provider would.
/// The secret must match the server's `auth.jwt_secret`.
pub fn token_for(email: &str) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = Utc::now().timestamp();
    let claims = IdentityClaims {
        sub: email.to_string(),
        iat: now,
        exp: now + 3600,
    };
    claims.create_token(&secret).expect("Failed to create token")
}

/// Unique email per test run so registrations never collide
pub fn unique_email(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}@example.org", prefix, nanos)
}

/// Register an account with the given role and return (email, token)
pub async fn register_account(client: &Client, prefix: &str, role: &str) -> (String, String) {
    let email = unique_email(prefix);
    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({
            "email": email,
            "name": format!("{} test account", prefix),
            "role": role
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert!(response.status().is_success());

    let token = token_for(&email);
    (email, token)
}

/// Create a book as admin and return its ID
pub async fn create_book(client: &Client, admin_token: &str, title: &str, copies: i32) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "title": title,
            "authors": ["Test Author"],
            "category": "Testing",
            "total_copies": copies
        }))
        .send()
        .await
        .expect("Failed to send create book request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse book response");
    body["id"].as_i64().expect("No book ID")
}
