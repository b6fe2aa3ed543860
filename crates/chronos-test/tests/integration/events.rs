#![allow(clippy::too_many_lines)]
//! Event integration tests.
//!
//! Listing windows are fixed in January 2024 so recurrence expectations do not
//! depend on the current date.

use std::collections::BTreeSet;

use salvo::http::StatusCode;

use super::helpers::*;

const FROM: &str = "2024-01-15T00:00:00Z";
const TO: &str = "2024-01-20T00:00:00Z";

async fn create_event(app: &TestApp, user: &TestUser, body: Value) -> TestResponse {
    TestRequest::post("/api/events")
        .bearer(&user.access_token)
        .json(body)
        .send(app)
        .await
}

fn names(listing: &Value) -> BTreeSet<String> {
    listing
        .as_array()
        .expect("listing is an array")
        .iter()
        .map(|event| string_field(event, "name"))
        .collect()
}

/// ## Summary
/// A listing returns one-off events starting in the window and recurring
/// events with an occurrence in it, wherever their first occurrence lies.
#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn listing_selects_occurrences_in_window() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let owner = register_user(&app, "owner").await;
    let calendar = create_calendar(&app, &owner, "Life", "private").await;

    let fixtures = [
        // One-off inside and outside the window.
        json!({ "name": "Dentist", "category": "arrangement",
                "start_at": "2024-01-16T09:00:00Z", "end_at": "2024-01-16T10:00:00Z" }),
        json!({ "name": "Old meeting", "category": "arrangement",
                "start_at": "2024-01-02T09:00:00Z", "end_at": "2024-01-02T10:00:00Z" }),
        // A one-off start on the window end still counts.
        json!({ "name": "Deadline", "category": "task",
                "start_at": "2024-01-20T00:00:00Z", "end_at": "2024-01-20T00:30:00Z" }),
        // Weekly from January 1st lands on January 15th.
        json!({ "name": "Weekly sync", "category": "task",
                "start_at": "2024-01-01T10:00:00Z", "end_at": "2024-01-01T11:00:00Z",
                "frequency": "weekly", "interval": 1 }),
        // Every five days from January 1st lands on January 16th.
        json!({ "name": "Watering", "category": "task",
                "start_at": "2024-01-01T07:00:00Z", "end_at": "2024-01-01T07:15:00Z",
                "frequency": "daily", "interval": 5 }),
        // Thirty-day period from January 1st skips to January 31st.
        json!({ "name": "Rent", "category": "task",
                "start_at": "2024-01-01T08:00:00Z", "end_at": "2024-01-01T08:05:00Z",
                "frequency": "monthly", "interval": 1 }),
        // Reminders only match on their own instant.
        json!({ "name": "Call mum", "category": "reminder",
                "start_at": "2024-01-17T18:00:00Z" }),
        json!({ "name": "Renew passport", "category": "reminder",
                "start_at": "2024-01-25T18:00:00Z" }),
    ];
    for mut fixture in fixtures {
        fixture["calendar_id"] = json!(calendar);
        create_event(&app, &owner, fixture)
            .await
            .assert_status(StatusCode::CREATED);
    }

    let listing = TestRequest::get(&format!(
        "/api/events?calendarId={calendar}&fromDate={FROM}&toDate={TO}"
    ))
    .bearer(&owner.access_token)
    .send(&app)
    .await
    .assert_status(StatusCode::OK)
    .value();

    let expected: BTreeSet<String> = ["Call mum", "Deadline", "Dentist", "Watering", "Weekly sync"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(names(&listing), expected);

    let weekly = listing
        .as_array()
        .and_then(|events| events.iter().find(|event| event["name"] == "Weekly sync"))
        .expect("weekly event listed");
    assert_eq!(weekly["recurrence"]["frequency"], "weekly");
    assert_eq!(weekly["recurrence"]["interval"], 1);
    assert_eq!(weekly["participants"][0]["id"], owner.id.to_string());
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn listing_rejects_bad_windows() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let owner = register_user(&app, "owner").await;
    let stranger = register_user(&app, "stranger").await;
    let calendar = create_calendar(&app, &owner, "Life", "public").await;

    TestRequest::get("/api/events?fromDate=2024-01-01T00:00:00Z&toDate=2024-03-01T00:00:00Z")
        .bearer(&owner.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body_contains("one month");

    TestRequest::get(&format!("/api/events?fromDate={TO}&toDate={FROM}"))
        .bearer(&owner.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::get(&format!("/api/events?calendarId={calendar}"))
        .bearer(&stranger.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let empty = TestRequest::get("/api/events")
        .bearer(&stranger.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(empty.as_array().map(Vec::len), Some(0));
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn create_validates_payload_and_role() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let owner = register_user(&app, "owner").await;
    let member = register_user(&app, "member").await;
    let calendar = create_calendar(&app, &owner, "Team", "shared").await;

    let invitation = TestRequest::post("/api/calendar-invitations")
        .bearer(&owner.access_token)
        .json(json!({ "calendar_id": calendar, "email": member.email }))
        .send(&app)
        .await
        .assert_status(StatusCode::CREATED)
        .value();
    TestRequest::post(&format!(
        "/api/calendar-invitations/{}/accept",
        uuid_field(&invitation, "id")
    ))
    .bearer(&member.access_token)
    .send(&app)
    .await
    .assert_status(StatusCode::OK);

    let standup = json!({
        "calendar_id": calendar, "name": "Standup", "category": "arrangement",
        "start_at": "2024-01-15T09:00:00Z", "end_at": "2024-01-15T09:15:00Z",
    });

    create_event(&app, &member, standup.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let mut only_frequency = standup.clone();
    only_frequency["frequency"] = json!("daily");
    create_event(&app, &owner, only_frequency)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let mut bad_interval = standup.clone();
    bad_interval["frequency"] = json!("daily");
    bad_interval["interval"] = json!(0);
    create_event(&app, &owner, bad_interval)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let mut unknown_frequency = standup.clone();
    unknown_frequency["frequency"] = json!("fortnightly");
    unknown_frequency["interval"] = json!(1);
    create_event(&app, &owner, unknown_frequency)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    create_event(
        &app,
        &owner,
        json!({
            "calendar_id": calendar, "name": "Pay bills", "category": "reminder",
            "start_at": "2024-01-15T09:00:00Z", "end_at": "2024-01-15T09:15:00Z",
        }),
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);

    let created = create_event(&app, &owner, standup)
        .await
        .assert_status(StatusCode::CREATED)
        .value();
    assert_eq!(created["recurrence"], Value::Null);
    assert_eq!(created["creator_id"], owner.id.to_string());
}

/// ## Summary
/// Updates replace the recurrence and only the creator may change or delete
/// the event.
#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn update_and_delete_are_creator_only() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let owner = register_user(&app, "owner").await;
    let stranger = register_user(&app, "stranger").await;
    let calendar = create_calendar(&app, &owner, "Life", "private").await;

    let created = create_event(
        &app,
        &owner,
        json!({
            "calendar_id": calendar, "name": "Run", "category": "task",
            "start_at": "2024-01-01T06:00:00Z", "end_at": "2024-01-01T07:00:00Z",
            "frequency": "daily", "interval": 2,
        }),
    )
    .await
    .assert_status(StatusCode::CREATED)
    .value();
    assert_eq!(created["recurrence"]["frequency"], "daily");
    let path = format!("/api/events/{}", uuid_field(&created, "id"));

    let once = json!({
        "name": "Long run", "category": "task",
        "start_at": "2024-01-16T06:00:00Z", "end_at": "2024-01-16T08:00:00Z",
    });

    TestRequest::patch(&path)
        .bearer(&stranger.access_token)
        .json(once.clone())
        .send(&app)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let updated = TestRequest::patch(&path)
        .bearer(&owner.access_token)
        .json(once)
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(updated["name"], "Long run");
    assert_eq!(updated["recurrence"], Value::Null);

    let weekly = TestRequest::patch(&path)
        .bearer(&owner.access_token)
        .json(json!({
            "name": "Long run", "category": "task",
            "start_at": "2024-01-16T06:00:00Z", "end_at": "2024-01-16T08:00:00Z",
            "frequency": "weekly", "interval": 2,
        }))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(weekly["recurrence"]["frequency"], "weekly");
    assert_eq!(weekly["recurrence"]["interval"], 2);

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

    TestRequest::delete(&path)
        .bearer(&owner.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
