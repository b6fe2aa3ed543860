use chrono::{DateTime, Utc};
use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use serde::Deserialize;

use chronos_core::window::TimeWindow;
use chronos_db::db::connection::DbConnection;
use chronos_db::db::enums::{CalendarRole, EventCategory};
use chronos_db::db::query::{calendar as calendar_query, event as event_query, membership};
use chronos_db::model::event::participant::NewEventParticipant;
use chronos_db::model::event::repeat::NewEventRepeat;
use chronos_db::model::event::{Event, EventChangeset, NewEvent};

use super::listing::{EventDetails, attach_participants, select_occurring};
use super::validate::validate_event;
use crate::error::{ServiceError, ServiceResult};
use crate::policy;

/// Editable fields shared by create and update payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct EventFields {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    pub category: EventCategory,
    pub start_at: DateTime<Utc>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub interval: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub calendar_id: uuid::Uuid,
    #[serde(flatten)]
    pub fields: EventFields,
}

/// Query string of the event listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListQuery {
    #[serde(default, alias = "calendarId")]
    pub calendar_id: Option<uuid::Uuid>,
    #[serde(default, alias = "fromDate")]
    pub from_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "toDate")]
    pub to_date: Option<DateTime<Utc>>,
}

/// ## Summary
/// Lists the events of the user's calendars that occur in the requested
/// window.
///
/// ## Errors
/// - `ValidationError` for an inverted window or one longer than a month
/// - `Forbidden` if `calendar_id` names a calendar the user is not a member of
/// - `InvariantViolation` if a stored recurrence is corrupt
#[tracing::instrument(skip(conn))]
pub async fn list(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
    query: &EventListQuery,
    now: DateTime<Utc>,
) -> ServiceResult<Vec<EventDetails>> {
    let window = TimeWindow::resolve(query.from_date, query.to_date, now)?;

    let mut calendar_ids = membership::calendar_ids_for_user(conn, user_id).await?;
    if let Some(calendar_id) = query.calendar_id {
        if !calendar_ids.contains(&calendar_id) {
            return Err(ServiceError::Forbidden(
                "You are not a member of this calendar".to_string(),
            ));
        }
        calendar_ids = vec![calendar_id];
    }
    if calendar_ids.is_empty() {
        return Ok(Vec::new());
    }

    let candidates =
        event_query::list_candidates(conn, &calendar_ids, window.from(), window.to()).await?;
    let candidate_count = candidates.len();
    let occurring = select_occurring(candidates, &window)?;

    let event_ids: Vec<uuid::Uuid> = occurring.iter().map(|(event, _)| event.id).collect();
    let participants = if event_ids.is_empty() {
        Vec::new()
    } else {
        event_query::list_participants(conn, &event_ids).await?
    };

    tracing::debug!(
        candidates = candidate_count,
        selected = event_ids.len(),
        "Listed events"
    );

    Ok(attach_participants(occurring, participants))
}

async fn details(conn: &mut DbConnection<'_>, event: Event) -> ServiceResult<EventDetails> {
    let recurrence = match event_query::find_repeat(conn, event.id).await? {
        Some(repeat) if !event.category.is_reminder() => Some(repeat.rule()?),
        _ => None,
    };
    let participants = event_query::list_participants(conn, &[event.id])
        .await?
        .into_iter()
        .map(|(_, user)| user)
        .collect();
    Ok(EventDetails {
        event,
        recurrence,
        participants,
    })
}

/// ## Summary
/// Creates an event in a calendar the user may schedule in.
///
/// ## Errors
/// - `NotFound` if the calendar does not exist
/// - `Forbidden` if the user is not a member, or only a plain member
/// - `ValidationError` for an inconsistent payload
///
/// ## Side Effects
/// Inserts the event, its recurrence and the creator's participant row in one
/// transaction.
#[tracing::instrument(skip(conn, request), fields(calendar_id = %request.calendar_id))]
pub async fn create(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
    request: CreateEventRequest,
) -> ServiceResult<EventDetails> {
    let calendar_id = request.calendar_id;
    calendar_query::find_by_id(conn, calendar_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Calendar not found".to_string()))?;

    let role = membership::find(conn, calendar_id, user_id)
        .await?
        .ok_or_else(|| ServiceError::Forbidden("You are not a member of this calendar".to_string()))?
        .role;
    if !policy::can_create_events(role) {
        return Err(ServiceError::Forbidden(
            "You do not have permission to create events".to_string(),
        ));
    }

    let rule = validate_event(&request.fields)?;
    let fields = request.fields;

    let event = conn
        .transaction::<_, ServiceError, _>(move |tx| {
            async move {
                let event = event_query::create_event(
                    tx,
                    &NewEvent {
                        id: uuid::Uuid::now_v7(),
                        calendar_id,
                        creator_id: user_id,
                        name: fields.name.trim(),
                        description: fields.description.as_deref(),
                        color: fields.color.as_deref(),
                        link: fields.link.as_deref(),
                        category: fields.category,
                        start_at: fields.start_at,
                        end_at: fields.end_at,
                    },
                )
                .await?;

                if let Some(rule) = rule {
                    event_query::upsert_repeat(tx, &NewEventRepeat::from_rule(event.id, &rule))
                        .await?;
                }

                event_query::add_participant(
                    tx,
                    &NewEventParticipant {
                        event_id: event.id,
                        user_id,
                        role: CalendarRole::Owner,
                    },
                )
                .await?;

                Ok(event)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(event_id = %event.id, "Event created");
    details(conn, event).await
}

async fn find_modifiable(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    action: &str,
) -> ServiceResult<Event> {
    let event = event_query::find_by_id(conn, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Event not found".to_string()))?;
    if !policy::can_modify_event(&event, user_id) {
        return Err(ServiceError::Forbidden(format!(
            "You do not have permission to {action} this event"
        )));
    }
    Ok(event)
}

/// ## Summary
/// Replaces the editable fields of an event.
///
/// The recurrence row follows the payload: it is written when frequency and
/// interval are given, with the period derived again, and removed otherwise.
///
/// ## Errors
/// `NotFound`, `Forbidden` unless the user created the event, and
/// `ValidationError` for an inconsistent payload.
#[tracing::instrument(skip(conn, fields))]
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    fields: EventFields,
) -> ServiceResult<EventDetails> {
    find_modifiable(conn, id, user_id, "update").await?;
    let rule = validate_event(&fields)?;

    let event = conn
        .transaction::<_, ServiceError, _>(move |tx| {
            async move {
                let event = event_query::update_event(
                    tx,
                    id,
                    &EventChangeset {
                        name: fields.name.trim(),
                        description: fields.description.as_deref(),
                        color: fields.color.as_deref(),
                        link: fields.link.as_deref(),
                        category: fields.category,
                        start_at: fields.start_at,
                        end_at: fields.end_at,
                    },
                )
                .await?;

                match rule {
                    Some(rule) => {
                        event_query::upsert_repeat(tx, &NewEventRepeat::from_rule(id, &rule))
                            .await?;
                    }
                    None => {
                        event_query::delete_repeat(tx, id).await?;
                    }
                }

                Ok(event)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(event_id = %event.id, "Event updated");
    details(conn, event).await
}

/// ## Errors
/// `NotFound`, or `Forbidden` unless the user created the event.
///
/// ## Side Effects
/// Removes the event with its recurrence and participants.
#[tracing::instrument(skip(conn))]
pub async fn delete(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> ServiceResult<()> {
    find_modifiable(conn, id, user_id, "delete").await?;
    event_query::delete_event(conn, id).await?;
    tracing::info!(event_id = %id, "Event deleted");
    Ok(())
}
