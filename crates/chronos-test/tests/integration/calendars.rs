//! Calendar integration tests.
//!
//! ## Visibility
//! - `public`: readable by anyone, including requests without a token
//! - `private`: readable by the owner only
//! - `shared`: readable by the owner and accepted participants

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn create_and_list_owned_calendars() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let owner = register_user(&app, "owner").await;

    let created = TestRequest::post("/api/calendars")
        .bearer(&owner.access_token)
        .json(json!({ "name": "  Work  ", "color": "#ff8800" }))
        .send(&app)
        .await
        .assert_status(StatusCode::CREATED)
        .value();
    assert_eq!(created["name"], "Work");
    assert_eq!(created["visibility"], "private");
    assert_eq!(created["owner_id"], owner.id.to_string());

    let owned = TestRequest::get("/api/calendars/my")
        .bearer(&owner.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(owned.as_array().map(Vec::len), Some(1));

    TestRequest::post("/api/calendars")
        .bearer(&owner.access_token)
        .json(json!({ "name": "   " }))
        .send(&app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::post("/api/calendars")
        .json(json!({ "name": "Anonymous" }))
        .send(&app)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn read_access_follows_visibility() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let owner = register_user(&app, "owner").await;
    let stranger = register_user(&app, "stranger").await;

    let public = create_calendar(&app, &owner, "Holidays", "public").await;
    let private = create_calendar(&app, &owner, "Diary", "private").await;
    let shared = create_calendar(&app, &owner, "Team", "shared").await;

    TestRequest::get(&format!("/api/calendars/{public}"))
        .send(&app)
        .await
        .assert_status(StatusCode::OK);

    TestRequest::get(&format!("/api/calendars/{private}"))
        .bearer(&owner.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::OK);

    TestRequest::get(&format!("/api/calendars/{private}"))
        .bearer(&stranger.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_body_contains("Calendar is private");

    TestRequest::get(&format!("/api/calendars/{shared}"))
        .bearer(&stranger.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_body_contains("not a participant");

    TestRequest::get(&format!("/api/calendars/{}", uuid::Uuid::now_v7()))
        .bearer(&owner.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn only_owner_can_update_or_delete() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let owner = register_user(&app, "owner").await;
    let stranger = register_user(&app, "stranger").await;
    let calendar = create_calendar(&app, &owner, "Gym", "public").await;
    let path = format!("/api/calendars/{calendar}");

    TestRequest::patch(&path)
        .bearer(&stranger.access_token)
        .json(json!({ "name": "Mine now" }))
        .send(&app)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let updated = TestRequest::patch(&path)
        .bearer(&owner.access_token)
        .json(json!({ "name": "Climbing", "visibility": "shared", "description": "Tuesdays" }))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(updated["name"], "Climbing");
    assert_eq!(updated["visibility"], "shared");
    assert_eq!(updated["description"], "Tuesdays");

    TestRequest::delete(&path)
        .bearer(&stranger.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    TestRequest::delete(&path)
        .bearer(&owner.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    TestRequest::get(&path)
        .bearer(&owner.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// The public listing filters by name, paginates and never shows private or
/// shared calendars.
#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn public_listing_is_filtered_and_paginated() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let owner = register_user(&app, "owner").await;

    for name in ["Football", "Football league", "Chess club"] {
        create_calendar(&app, &owner, name, "public").await;
    }
    create_calendar(&app, &owner, "Football secrets", "private").await;
    create_calendar(&app, &owner, "Football staff", "shared").await;

    let page = TestRequest::get("/api/calendars/public?name=foot&limit=1&page=1")
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(page["meta"]["total"], 2);
    assert_eq!(page["meta"]["last_page"], 2);
    assert_eq!(page["meta"]["next"], 2);
    assert_eq!(page["data"].as_array().map(Vec::len), Some(1));

    let all = TestRequest::get("/api/calendars/public?sortBy=createdAt&sortOrder=asc")
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(all["meta"]["total"], 3);
    assert_eq!(all["data"][0]["name"], "Football");

    TestRequest::get("/api/calendars/public?limit=0")
        .send(&app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
