//! Calendar invitation integration tests.

use salvo::http::StatusCode;

use super::helpers::*;

/// ## Summary
/// An accepted invitation makes the invitee a participant of a shared calendar.
#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn accepted_invitation_grants_participation() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let owner = register_user(&app, "owner").await;
    let guest = register_user(&app, "guest").await;
    let calendar = create_calendar(&app, &owner, "Team", "shared").await;

    let invitation = TestRequest::post("/api/calendar-invitations")
        .bearer(&owner.access_token)
        .json(json!({ "calendar_id": calendar, "email": "GUEST@chronos.test" }))
        .send(&app)
        .await
        .assert_status(StatusCode::CREATED)
        .value();
    assert_eq!(invitation["status"], "pending");
    assert_eq!(invitation["role"], "member");
    assert_eq!(invitation["invitee_id"], guest.id.to_string());
    let invitation_id = uuid_field(&invitation, "id");

    let incoming = TestRequest::get("/api/calendar-invitations")
        .bearer(&guest.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(incoming.as_array().map(Vec::len), Some(1));

    TestRequest::post(&format!("/api/calendar-invitations/{invitation_id}/accept"))
        .bearer(&owner.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let accepted = TestRequest::post(&format!("/api/calendar-invitations/{invitation_id}/accept"))
        .bearer(&guest.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(accepted["status"], "accepted");

    TestRequest::post(&format!("/api/calendar-invitations/{invitation_id}/decline"))
        .bearer(&guest.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::CONFLICT);

    let participating = TestRequest::get("/api/calendars/participating")
        .bearer(&guest.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(participating[0]["id"], calendar.to_string());

    TestRequest::get(&format!("/api/calendars/{calendar}"))
        .bearer(&guest.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::OK);

    TestRequest::post("/api/calendar-invitations")
        .bearer(&owner.access_token)
        .json(json!({ "calendar_id": calendar, "email": guest.email }))
        .send(&app)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL server"]
async fn invitation_rules() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let app = create_db_test_service(&test_db);
    let owner = register_user(&app, "owner").await;
    let guest = register_user(&app, "guest").await;
    let calendar = create_calendar(&app, &owner, "Team", "shared").await;

    TestRequest::post("/api/calendar-invitations")
        .bearer(&guest.access_token)
        .json(json!({ "calendar_id": calendar, "email": owner.email }))
        .send(&app)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    TestRequest::post("/api/calendar-invitations")
        .bearer(&owner.access_token)
        .json(json!({ "calendar_id": calendar, "email": guest.email, "role": "owner" }))
        .send(&app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::post("/api/calendar-invitations")
        .bearer(&owner.access_token)
        .json(json!({ "calendar_id": calendar, "email": "nobody@chronos.test" }))
        .send(&app)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let invitation = TestRequest::post("/api/calendar-invitations")
        .bearer(&owner.access_token)
        .json(json!({ "calendar_id": calendar, "email": guest.email, "role": "admin" }))
        .send(&app)
        .await
        .assert_status(StatusCode::CREATED)
        .value();

    TestRequest::post("/api/calendar-invitations")
        .bearer(&owner.access_token)
        .json(json!({ "calendar_id": calendar, "email": guest.email }))
        .send(&app)
        .await
        .assert_status(StatusCode::CONFLICT);

    let declined = TestRequest::post(&format!(
        "/api/calendar-invitations/{}/decline",
        uuid_field(&invitation, "id")
    ))
    .bearer(&guest.access_token)
    .send(&app)
    .await
    .assert_status(StatusCode::OK)
    .value();
    assert_eq!(declined["status"], "declined");

    let participating = TestRequest::get("/api/calendars/participating")
        .bearer(&guest.access_token)
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .value();
    assert_eq!(participating.as_array().map(Vec::len), Some(0));
}
