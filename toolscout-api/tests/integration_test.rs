/// Integration tests for the ToolScout API
///
/// The first group runs without any external services: it exercises the
/// parts of the contract that must resolve before storage is touched
/// (token rejection, payload validation, enum listings). The second group
/// needs a running PostgreSQL (DATABASE_URL) and is `#[ignore]`d by
/// default; run it with `cargo test -- --ignored`.

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{
    assert_error_detail, body_json, json_request, offline_app, send, TestContext,
    TEST_JWT_SECRET,
};
use serde_json::json;
use toolscout_shared::auth::jwt::{create_token, Claims};
use toolscout_shared::models::tool::Tool;

// ---------------------------------------------------------------------------
// Offline: no database required
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_api_banner() {
    let mut app = offline_app();

    let response = send(&mut app, json_request("GET", "/api/", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "AI Tools Aggregator API");
}

#[tokio::test]
async fn test_enum_listings() {
    let mut app = offline_app();

    let response = send(&mut app, json_request("GET", "/api/categories", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let categories = body_json(response).await;
    assert_eq!(categories.as_array().unwrap().len(), 8);
    assert_eq!(categories[0]["value"], "music_generation");
    assert_eq!(categories[0]["label"], "Music Generation");

    let response = send(
        &mut app,
        json_request("GET", "/api/price-models", None, None),
    )
    .await;
    let price_models = body_json(response).await;
    assert_eq!(price_models.as_array().unwrap().len(), 4);

    let response = send(&mut app, json_request("GET", "/api/platforms", None, None)).await;
    let platforms = body_json(response).await;
    assert_eq!(platforms.as_array().unwrap().len(), 5);
    assert_eq!(platforms[4]["label"], "Browser Extension");
}

#[tokio::test]
async fn test_protected_route_rejects_missing_token() {
    let mut app = offline_app();

    let response = send(&mut app, json_request("GET", "/api/me", None, None)).await;
    let detail = assert_error_detail(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(detail, "Missing authorization header");
}

#[tokio::test]
async fn test_protected_route_rejects_non_bearer_header() {
    let mut app = offline_app();

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/me")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = send(&mut app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_garbage_token() {
    let mut app = offline_app();

    let response = send(
        &mut app,
        json_request("GET", "/api/me", Some("not.a.token"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_expired_token() {
    let mut app = offline_app();

    let claims = Claims::with_expiration("alice", Duration::seconds(-3600));
    let token = create_token(&claims, TEST_JWT_SECRET).unwrap();

    let response = send(&mut app, json_request("GET", "/api/me", Some(&token), None)).await;
    let detail = assert_error_detail(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(detail, "Token expired");
}

#[tokio::test]
async fn test_protected_route_rejects_foreign_signature() {
    let mut app = offline_app();

    // Signed with a different secret than the server's
    let token = create_token(&Claims::new("alice"), "some-other-secret-32-bytes-long!!").unwrap();

    let response = send(&mut app, json_request("GET", "/api/me", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_review_mutations_require_token() {
    let mut app = offline_app();

    // Rejection happens in middleware, before any storage access
    let body = json!({
        "tool_id": "00000000-0000-0000-0000-000000000000",
        "rating": 4,
        "title": "t",
        "content": "c"
    });

    for (method, uri) in [
        ("POST", "/api/reviews"),
        ("PUT", "/api/reviews/00000000-0000-0000-0000-000000000000"),
        (
            "DELETE",
            "/api/reviews/00000000-0000-0000-0000-000000000000",
        ),
        ("POST", "/api/comments"),
    ] {
        let request = json_request(method, uri, None, Some(body.clone()));
        let response = send(&mut app, request).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require a token",
            method,
            uri
        );
    }
}

#[tokio::test]
async fn test_register_validates_email_format() {
    let mut app = offline_app();

    let body = json!({
        "username": "alice",
        "email": "not-an-email",
        "password": "Password123!"
    });

    let response = send(&mut app, json_request("POST", "/api/register", None, Some(body))).await;
    let detail = assert_error_detail(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert!(detail.to_string().contains("email"));
}

#[tokio::test]
async fn test_register_validates_password_length() {
    let mut app = offline_app();

    let body = json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "short"
    });

    let response = send(&mut app, json_request("POST", "/api/register", None, Some(body))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Live database: run with `cargo test -- --ignored`
// ---------------------------------------------------------------------------

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_register_login_me_flow() {
    let ctx = TestContext::new().await.unwrap();
    let mut app = ctx.app.clone();

    let username = format!("alice_{}", &ctx.user.username[7..]);
    let email = format!("{}@x.com", username);

    // Register
    let body = json!({ "username": username, "email": email, "password": "Password123!" });
    let response = send(&mut app, json_request("POST", "/api/register", None, Some(body))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let registered = body_json(response).await;
    assert_eq!(registered["username"], username.as_str());
    assert!(registered.get("password_hash").is_none());

    // Same username, different email: conflict
    let body = json!({
        "username": username,
        "email": format!("other-{}", email),
        "password": "Password123!"
    });
    let response = send(&mut app, json_request("POST", "/api/register", None, Some(body))).await;
    assert_error_detail(response, StatusCode::CONFLICT).await;

    // Login
    let body = json!({ "username": username, "password": "Password123!" });
    let response = send(&mut app, json_request("POST", "/api/login", None, Some(body))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let login = body_json(response).await;
    let token = login["access_token"].as_str().unwrap().to_string();
    assert_eq!(login["token_type"], "bearer");

    // /me with the fresh token
    let response = send(&mut app, json_request("GET", "/api/me", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["username"], username.as_str());

    // /me without token
    let response = send(&mut app, json_request("GET", "/api/me", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(&username)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_login_does_not_leak_valid_usernames() {
    let ctx = TestContext::new().await.unwrap();
    let mut app = ctx.app.clone();

    // Known user, wrong password
    let body = json!({ "username": ctx.user.username, "password": "wrong-password" });
    let response = send(&mut app, json_request("POST", "/api/login", None, Some(body))).await;
    let wrong_password = assert_error_detail(response, StatusCode::UNAUTHORIZED).await;

    // Unknown user
    let body = json!({ "username": "no_such_user_ever", "password": "wrong-password" });
    let response = send(&mut app, json_request("POST", "/api/login", None, Some(body))).await;
    let unknown_user = assert_error_detail(response, StatusCode::UNAUTHORIZED).await;

    // Identical error shape in both cases
    assert_eq!(wrong_password, unknown_user);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_review_lifecycle_drives_rating() {
    let ctx = TestContext::new().await.unwrap();
    let mut app = ctx.app.clone();

    let tool = ctx.create_tool("Rating Lifecycle Tool").await.unwrap();
    assert_eq!(tool.rating, 0.0);
    assert_eq!(tool.review_count, 0);

    // alice (ctx.user) rates 4
    let body = json!({ "tool_id": tool.id, "rating": 4, "title": "Solid", "content": "Works." });
    let response = send(
        &mut app,
        json_request("POST", "/api/reviews", Some(&ctx.token), Some(body.clone())),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let alice_review = body_json(response).await;

    let t = Tool::find_by_id(&ctx.db, tool.id).await.unwrap().unwrap();
    assert_eq!(t.rating, 4.0);
    assert_eq!(t.review_count, 1);

    // A second review by the same user conflicts
    let response = send(
        &mut app,
        json_request("POST", "/api/reviews", Some(&ctx.token), Some(body)),
    )
    .await;
    assert_error_detail(response, StatusCode::CONFLICT).await;

    // bob rates 2 -> mean 3.0
    let (_bob, bob_token) = ctx.create_user("bob").await.unwrap();
    let body = json!({ "tool_id": tool.id, "rating": 2, "title": "Meh", "content": "Not for me." });
    let response = send(
        &mut app,
        json_request("POST", "/api/reviews", Some(&bob_token), Some(body)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bob_review = body_json(response).await;

    let t = Tool::find_by_id(&ctx.db, tool.id).await.unwrap().unwrap();
    assert_eq!(t.rating, 3.0);
    assert_eq!(t.review_count, 2);

    // bob cannot edit alice's review
    let alice_review_id = alice_review["id"].as_str().unwrap();
    let body = json!({ "tool_id": tool.id, "rating": 5, "title": "Hijack", "content": "x" });
    let response = send(
        &mut app,
        json_request(
            "PUT",
            &format!("/api/reviews/{}", alice_review_id),
            Some(&bob_token),
            Some(body),
        ),
    )
    .await;
    assert_error_detail(response, StatusCode::FORBIDDEN).await;

    // alice edits her own review; created_at is preserved
    let body = json!({ "tool_id": tool.id, "rating": 5, "title": "Even better", "content": "y" });
    let response = send(
        &mut app,
        json_request(
            "PUT",
            &format!("/api/reviews/{}", alice_review_id),
            Some(&ctx.token),
            Some(body),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["created_at"], alice_review["created_at"]);
    assert_eq!(updated["rating"], 5);

    let t = Tool::find_by_id(&ctx.db, tool.id).await.unwrap().unwrap();
    assert_eq!(t.rating, 3.5); // mean of [5, 2]

    // alice deletes hers -> recomputed from the remaining set
    let response = send(
        &mut app,
        json_request(
            "DELETE",
            &format!("/api/reviews/{}", alice_review_id),
            Some(&ctx.token),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let t = Tool::find_by_id(&ctx.db, tool.id).await.unwrap().unwrap();
    assert_eq!(t.rating, 2.0);
    assert_eq!(t.review_count, 1);

    // bob deletes the last review: derived columns keep their last values
    let bob_review_id = bob_review["id"].as_str().unwrap();
    let response = send(
        &mut app,
        json_request(
            "DELETE",
            &format!("/api/reviews/{}", bob_review_id),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let t = Tool::find_by_id(&ctx.db, tool.id).await.unwrap().unwrap();
    assert_eq!(t.rating, 2.0);
    assert_eq!(t.review_count, 1);

    sqlx::query("DELETE FROM tools WHERE id = $1")
        .bind(tool.id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_review_delete_cascades_to_comments() {
    let ctx = TestContext::new().await.unwrap();
    let mut app = ctx.app.clone();

    let tool = ctx.create_tool("Comment Cascade Tool").await.unwrap();

    let body = json!({ "tool_id": tool.id, "rating": 3, "title": "Fine", "content": "Okay." });
    let response = send(
        &mut app,
        json_request("POST", "/api/reviews", Some(&ctx.token), Some(body)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let review = body_json(response).await;
    let review_id = review["id"].as_str().unwrap();

    // Comment, then a threaded reply
    let body = json!({ "review_id": review_id, "content": "First!" });
    let response = send(
        &mut app,
        json_request("POST", "/api/comments", Some(&ctx.token), Some(body)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;

    let body = json!({
        "review_id": review_id,
        "content": "Replying to myself",
        "parent_id": first["id"]
    });
    let response = send(
        &mut app,
        json_request("POST", "/api/comments", Some(&ctx.token), Some(body)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Oldest first
    let response = send(
        &mut app,
        json_request("GET", &format!("/api/comments/{}", review_id), None, None),
    )
    .await;
    let listing = body_json(response).await;
    let comments = listing["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "First!");

    // Delete the review; its comments go with it
    let response = send(
        &mut app,
        json_request(
            "DELETE",
            &format!("/api/reviews/{}", review_id),
            Some(&ctx.token),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &mut app,
        json_request("GET", &format!("/api/comments/{}", review_id), None, None),
    )
    .await;
    let listing = body_json(response).await;
    assert!(listing["comments"].as_array().unwrap().is_empty());

    sqlx::query("DELETE FROM tools WHERE id = $1")
        .bind(tool.id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_review_for_missing_tool_is_404() {
    let ctx = TestContext::new().await.unwrap();
    let mut app = ctx.app.clone();

    let body = json!({
        "tool_id": uuid::Uuid::new_v4(),
        "rating": 4,
        "title": "Ghost",
        "content": "This tool does not exist."
    });
    let response = send(
        &mut app,
        json_request("POST", "/api/reviews", Some(&ctx.token), Some(body)),
    )
    .await;
    assert_error_detail(response, StatusCode::NOT_FOUND).await;

    ctx.cleanup().await.unwrap();
}
