//! API integration tests

use reqwest::Client;
use serde_json::{json, Value};

use crate::{create_book, register_account, token_for, unique_email, BASE_URL};

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_is_idempotent() {
    let client = Client::new();
    let email = unique_email("register");

    let payload = json!({ "email": email, "name": "Register Test" });

    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Registering the same email again is a no-op success
    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User already registered");
}

#[tokio::test]
#[ignore]
async fn test_register_without_email_fails() {
    let client = Client::new();

    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({ "email": "not-an-email", "name": "Bad Email" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_me_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/me", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unauthorized Access");
}

#[tokio::test]
#[ignore]
async fn test_invalid_token_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/me", BASE_URL))
        .header("Authorization", "Bearer not-a-real-token")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid Token");
}

#[tokio::test]
#[ignore]
async fn test_me_returns_profile() {
    let client = Client::new();
    let (email, token) = register_account(&client, "me", "member").await;

    let response = client
        .get(format!("{}/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["role"], "member");
}

#[tokio::test]
#[ignore]
async fn test_profile_update_ignores_role() {
    let client = Client::new();
    let (_email, token) = register_account(&client, "profile", "member").await;

    // The allow-list drops everything but the name
    let response = client
        .put(format!("{}/update", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Renamed", "role": "admin" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["name"], "Renamed");
    assert_eq!(body["user"]["role"], "member");
}

#[tokio::test]
#[ignore]
async fn test_public_book_listing() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["books"].is_array());
    assert!(body["total"].is_number());
    assert!(body["total_pages"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_book_crud_as_admin() {
    let client = Client::new();
    let (_email, admin_token) = register_account(&client, "bookadmin", "admin").await;

    let book_id = create_book(&client, &admin_token, "CRUD Test Book", 2).await;

    // New book starts fully available
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total_copies"], 2);
    assert_eq!(body["available_copies"], 2);
    assert_eq!(body["status"], "available");

    // Update the title
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({ "title": "CRUD Test Book (revised)" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Delete
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_book_creation_requires_admin() {
    let client = Client::new();
    let (_email, member_token) = register_account(&client, "bookmember", "member").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", member_token))
        .json(&json!({
            "title": "Forbidden Book",
            "authors": ["Someone"],
            "total_copies": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_member_dashboard_window_is_full_length() {
    let client = Client::new();
    let (_email, token) = register_account(&client, "dashboard", "member").await;

    // A brand-new account has no history; the series must still span the
    // whole window, all zeros.
    let response = client
        .get(format!("{}/dashboard/member", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["labels"].as_array().unwrap().len(), 30);
    assert_eq!(body["borrowed_series"].as_array().unwrap().len(), 30);
    assert_eq!(body["returned_series"].as_array().unwrap().len(), 30);
    assert!(body["borrowed_series"]
        .as_array()
        .unwrap()
        .iter()
        .all(|v| v == 0));
}

#[tokio::test]
#[ignore]
async fn test_dashboard_role_gates() {
    let client = Client::new();
    let (_email, member_token) = register_account(&client, "gates", "member").await;

    // Member cannot see the teacher dashboard
    let response = client
        .get(format!("{}/dashboard/teacher", BASE_URL))
        .header("Authorization", format!("Bearer {}", member_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Nor the admin dashboard
    let response = client
        .get(format!("{}/dashboard/admin", BASE_URL))
        .header("Authorization", format!("Bearer {}", member_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Admin access only");
}

#[tokio::test]
#[ignore]
async fn test_admin_dashboard_summary_shape() {
    let client = Client::new();
    let (_email, admin_token) = register_account(&client, "admindash", "admin").await;

    let response = client
        .get(format!("{}/dashboard/admin", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["labels"].as_array().unwrap().len(), 180);
    assert_eq!(body["borrowed_series"].as_array().unwrap().len(), 180);
    assert_eq!(body["pending_series"].as_array().unwrap().len(), 180);
    assert_eq!(body["returned_series"].as_array().unwrap().len(), 180);
    assert!(body["summary"]["total_books"].is_number());
    assert!(body["summary"]["borrows_last_30_days"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_contact_submission_is_public() {
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", BASE_URL))
        .json(&json!({
            "name": "Visitor",
            "email": "visitor@example.org",
            "message": "When do you open?"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    // But the inbox is admin-only
    let response = client
        .get(format!("{}/api/contact", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_admin_cannot_delete_self() {
    let client = Client::new();
    let (email, admin_token) = register_account(&client, "selfdelete", "admin").await;

    // Find own ID via /me
    let response = client
        .get(format!("{}/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_for(&email)))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["user"]["id"].as_i64().unwrap();

    let response = client
        .delete(format!("{}/users/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}
