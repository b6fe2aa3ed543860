#![allow(clippy::too_many_lines)]
//! Account lifecycle integration tests.
//!
//! Covers registration, login, refresh token rotation, logout, activation and
//! the password reset flow over HTTP.

use salvo::http::StatusCode;

use super::helpers::*;

/// ## Summary
/// Registering issues a token pair, stores a refresh session and mails an
/// activation link.
#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn register_issues_tokens_and_mails_activation_link() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);

    let user = register_user(&app, "ada").await;

    assert_eq!(test_db.count_refresh_sessions().await.expect("count"), 1);
    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, user.email);
    assert!(sent[0].body.contains("http://localhost:3000/auth/activate/"));

    let me = TestRequest::get("/api/user/me")
        .bearer(&user.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(me["email"], "ada@chronos.test");
    assert_eq!(me["is_active"], false);
    assert!(me.get("password_hash").is_none());
}

/// ## Summary
/// Emails are matched case-insensitively, so a second account with the same
/// address is rejected.
#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn register_rejects_duplicate_email() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);

    register_user(&app, "grace").await;

    TestRequest::post("/api/auth/register")
        .json(json!({
            "name": "Grace",
            "email": "GRACE@chronos.test",
            "password": TEST_PASSWORD,
        }))
        .send(&app)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body_contains("already");
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn login_checks_password() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let user = register_user(&app, "linus").await;

    TestRequest::post("/api/auth/login")
        .json(json!({ "email": user.email, "password": "not the password" }))
        .send(&app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let tokens = TestRequest::post("/api/auth/login")
        .json(json!({ "email": user.email, "password": TEST_PASSWORD }))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert!(tokens["access_token"].is_string());
    assert!(tokens["refresh_token"].is_string());
    assert_eq!(test_db.count_refresh_sessions().await.expect("count"), 2);
}

/// ## Summary
/// A refresh token can be traded exactly once.
#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn refresh_rotates_the_session() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let user = register_user(&app, "barbara").await;

    let rotated = TestRequest::post("/api/auth/refresh")
        .json(json!({ "refresh_token": user.refresh_token }))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    let new_refresh = string_field(&rotated, "refresh_token");
    assert_ne!(new_refresh, user.refresh_token);
    assert_eq!(test_db.count_refresh_sessions().await.expect("count"), 1);

    TestRequest::post("/api/auth/refresh")
        .json(json!({ "refresh_token": user.refresh_token }))
        .send(&app)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    TestRequest::post("/api/auth/refresh")
        .json(json!({ "refresh_token": new_refresh }))
        .send(&app)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn logout_revokes_refresh_token() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let user = register_user(&app, "edsger").await;

    TestRequest::post("/api/auth/logout")
        .json(json!({ "refresh_token": user.refresh_token }))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("true");
    assert_eq!(test_db.count_refresh_sessions().await.expect("count"), 0);

    TestRequest::post("/api/auth/refresh")
        .json(json!({ "refresh_token": user.refresh_token }))
        .send(&app)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn activation_link_activates_the_account() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let user = register_user(&app, "margaret").await;
    let token = app
        .mailer
        .last_token_for(&user.email)
        .expect("activation mail sent");

    TestRequest::post("/api/auth/activate/not-a-token")
        .bearer(&user.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::post(&format!("/api/auth/activate/{token}"))
        .send(&app)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    TestRequest::post(&format!("/api/auth/activate/{token}"))
        .bearer(&user.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::OK);

    let me = TestRequest::get("/api/user/me")
        .bearer(&user.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(me["is_active"], true);
}

/// ## Summary
/// Resetting the password signs the user out everywhere and switches the
/// credentials.
#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn password_reset_flow() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let user = register_user(&app, "alan").await;

    TestRequest::post("/api/auth/forgot-password")
        .json(json!({ "email": "nobody@chronos.test" }))
        .send(&app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::post("/api/auth/forgot-password")
        .json(json!({ "email": user.email }))
        .send(&app)
        .await
        .assert_status(StatusCode::OK);
    let token = app
        .mailer
        .last_token_for(&user.email)
        .expect("reset mail sent");

    TestRequest::post("/api/auth/reset-password")
        .json(json!({ "token": token, "password": "short" }))
        .send(&app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::post("/api/auth/reset-password")
        .json(json!({ "token": token, "password": "a brand new secret" }))
        .send(&app)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(test_db.count_refresh_sessions().await.expect("count"), 0);

    TestRequest::post("/api/auth/login")
        .json(json!({ "email": user.email, "password": TEST_PASSWORD }))
        .send(&app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::post("/api/auth/login")
        .json(json!({ "email": user.email, "password": "a brand new secret" }))
        .send(&app)
        .await
        .assert_status(StatusCode::OK);
}
