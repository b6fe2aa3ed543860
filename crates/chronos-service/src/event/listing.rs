//! Window filtering of listing candidates.

use std::collections::HashMap;

use serde::Serialize;

use chronos_core::recurrence::{RecurrenceRule, occurs_within};
use chronos_core::window::TimeWindow;
use chronos_db::model::event::Event;
use chronos_db::model::event::repeat::EventRepeat;
use chronos_db::model::user::UserSummary;

use crate::error::{ServiceError, ServiceResult};

/// An event as returned by the API, with its recurrence and participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub recurrence: Option<RecurrenceRule>,
    pub participants: Vec<UserSummary>,
}

/// ## Summary
/// Keeps the candidates that occur inside `window`.
///
/// Reminders and one-off events qualify by their start instant, with the end
/// of the window included. Recurring events qualify when an occurrence lands
/// in `[from, to)`. A reminder is never
/// treated as recurring, even if a recurrence row exists for it.
///
/// ## Errors
/// Returns `InvariantViolation` if a stored recurrence row cannot be turned
/// back into a rule, including a period that disagrees with its interval.
pub fn select_occurring(
    candidates: Vec<(Event, Option<EventRepeat>)>,
    window: &TimeWindow,
) -> ServiceResult<Vec<(Event, Option<RecurrenceRule>)>> {
    let mut selected = Vec::with_capacity(candidates.len());

    for (event, repeat) in candidates {
        let rule = match repeat {
            Some(repeat) if !event.category.is_reminder() => Some(repeat.rule().map_err(|e| {
                tracing::error!(event_id = %event.id, error = %e, "Stored recurrence is invalid");
                ServiceError::InvariantViolation("stored recurrence is inconsistent")
            })?),
            _ => None,
        };

        let occurs = match &rule {
            Some(rule) => occurs_within(event.start_at, rule.period(), window),
            None => window.contains_start(event.start_at),
        };

        if occurs {
            selected.push((event, rule));
        }
    }

    Ok(selected)
}

/// ## Summary
/// Attaches participants to each event, preserving event order.
#[must_use]
pub fn attach_participants(
    events: Vec<(Event, Option<RecurrenceRule>)>,
    participants: Vec<(uuid::Uuid, UserSummary)>,
) -> Vec<EventDetails> {
    let mut by_event: HashMap<uuid::Uuid, Vec<UserSummary>> = HashMap::new();
    for (event_id, user) in participants {
        by_event.entry(event_id).or_default().push(user);
    }

    events
        .into_iter()
        .map(|(event, recurrence)| {
            let participants = by_event.remove(&event.id).unwrap_or_default();
            EventDetails {
                event,
                recurrence,
                participants,
            }
        })
        .collect()
}
