//! End-to-end borrow workflow tests

use reqwest::Client;
use serde_json::Value;

use crate::{create_book, register_account, BASE_URL};

async fn book_snapshot(client: &Client, book_id: i64) -> Value {
    client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to fetch book")
        .json()
        .await
        .expect("Failed to parse book")
}

/// Full lifecycle: request -> confirm -> return request -> confirm, with the
/// inventory round-tripping back to its starting value.
#[tokio::test]
#[ignore]
async fn test_borrow_return_round_trip() {
    let client = Client::new();
    let (_admin_email, admin_token) = register_account(&client, "flow-admin", "admin").await;
    let (_teacher_email, teacher_token) = register_account(&client, "flow-teacher", "teacher").await;

    let book_id = create_book(&client, &admin_token, "Round Trip", 1).await;

    // Teacher requests the borrow; inventory is untouched while pending
    let response = client
        .post(format!("{}/books/borrow/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", teacher_token))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let record_id = body["record"]["id"].as_i64().expect("No record ID");
    assert_eq!(body["record"]["status"], "pending-borrow");

    let book = book_snapshot(&client, book_id).await;
    assert_eq!(book["available_copies"], 1);
    assert_eq!(book["status"], "available");

    // A second request for the same book is refused while one is active
    let response = client
        .post(format!("{}/books/borrow/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", teacher_token))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 409);

    // Confirming a return on a record still pending-borrow is refused
    let response = client
        .post(format!("{}/admin/confirm-return/{}", BASE_URL, record_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send confirm request");
    assert_eq!(response.status(), 409);

    // Admin confirms the borrow; the last copy is taken
    let response = client
        .post(format!("{}/admin/confirm-borrow/{}", BASE_URL, record_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send confirm request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["record"]["status"], "borrowed");
    assert!(body["record"]["return_date"].is_string());
    assert_eq!(body["book"]["available_copies"], 0);
    assert_eq!(body["book"]["status"], "unavailable");

    // With zero copies, another user's confirmed borrow must fail
    let (_other_email, other_token) = register_account(&client, "flow-other", "member").await;
    let response = client
        .post(format!("{}/books/borrow/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", other_token))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 409);

    // Teacher asks to give the book back
    let response = client
        .post(format!("{}/books/return/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", teacher_token))
        .send()
        .await
        .expect("Failed to send return request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["record"]["status"], "pending-return");

    // Inventory still reflects the loan until the admin confirms
    let book = book_snapshot(&client, book_id).await;
    assert_eq!(book["available_copies"], 0);

    // Admin confirms the return; the copy comes back
    let response = client
        .post(format!("{}/admin/confirm-return/{}", BASE_URL, record_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send confirm request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["record"]["status"], "returned");
    assert_eq!(body["book"]["available_copies"], 1);
    assert_eq!(body["book"]["status"], "available");

    // The finished cycle no longer blocks a new request
    let response = client
        .post(format!("{}/books/borrow/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", teacher_token))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 201);
}

/// A member may hold at most three active records, whatever their states.
#[tokio::test]
#[ignore]
async fn test_member_borrow_limit() {
    let client = Client::new();
    let (_admin_email, admin_token) = register_account(&client, "limit-admin", "admin").await;
    let (_member_email, member_token) = register_account(&client, "limit-member", "member").await;

    let mut book_ids = Vec::new();
    for i in 0..4 {
        book_ids.push(create_book(&client, &admin_token, &format!("Limit Book {}", i), 1).await);
    }

    for book_id in &book_ids[..3] {
        let response = client
            .post(format!("{}/books/borrow/{}", BASE_URL, book_id))
            .header("Authorization", format!("Bearer {}", member_token))
            .send()
            .await
            .expect("Failed to send borrow request");
        assert_eq!(response.status(), 201);
    }

    // The fourth request trips the limit even though copies are available
    let response = client
        .post(format!("{}/books/borrow/{}", BASE_URL, book_ids[3]))
        .header("Authorization", format!("Bearer {}", member_token))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Maximum active borrows reached"));
}

/// Borrow status and history endpoints follow the record through its states.
#[tokio::test]
#[ignore]
async fn test_status_and_history_views() {
    let client = Client::new();
    let (_admin_email, admin_token) = register_account(&client, "hist-admin", "admin").await;
    let (_member_email, member_token) = register_account(&client, "hist-member", "member").await;

    let book_id = create_book(&client, &admin_token, "History Book", 2).await;

    // No record yet
    let response = client
        .get(format!("{}/books/status/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", member_token))
        .send()
        .await
        .expect("Failed to send status request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["status"].is_null());

    // Request and observe the pending state
    let response = client
        .post(format!("{}/books/borrow/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", member_token))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/books/status/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", member_token))
        .send()
        .await
        .expect("Failed to send status request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "pending-borrow");

    // The request shows up in the active list and the history, with the book
    let response = client
        .get(format!("{}/my-borrowed-books", BASE_URL))
        .header("Authorization", format!("Bearer {}", member_token))
        .send()
        .await
        .expect("Failed to send list request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let active = body.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["book"]["title"], "History Book");

    let response = client
        .get(format!("{}/borrow-history", BASE_URL))
        .header("Authorization", format!("Bearer {}", member_token))
        .send()
        .await
        .expect("Failed to send history request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().unwrap().len(), 1);

    // And in the admin pending queue
    let response = client
        .get(format!("{}/admin/pending-requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send pending request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|item| item["book"]["title"] == "History Book"));
}
