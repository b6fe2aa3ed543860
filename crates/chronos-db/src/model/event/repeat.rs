use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use chronos_core::error::{CoreError, CoreResult};
use chronos_core::recurrence::RecurrenceRule;

use crate::{db::schema, model};

pub use crate::db::enums::Frequency;

#[derive(
    Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Associations, Serialize,
)]
#[diesel(table_name = schema::event_repeat)]
#[diesel(check_for_backend(Pg))]
#[diesel(primary_key(event_id))]
#[diesel(belongs_to(model::event::Event, foreign_key = event_id))]
pub struct EventRepeat {
    pub event_id: uuid::Uuid,
    pub frequency: Frequency,
    #[serde(rename = "interval")]
    pub repeat_interval: i32,
    pub repeat_time: i64,
}

impl EventRepeat {
    /// ## Summary
    /// Rebuilds the recurrence rule from frequency and interval and checks
    /// it against the stored `repeat_time`.
    ///
    /// ## Errors
    /// Returns `InvalidInterval` if the stored interval is not positive, or
    /// `InvariantViolation` if `repeat_time` is not the derived period.
    pub fn rule(&self) -> CoreResult<RecurrenceRule> {
        let rule = RecurrenceRule::new(self.frequency.into(), self.repeat_interval)?;
        if rule.period().as_millis() != self.repeat_time {
            tracing::warn!(
                event_id = %self.event_id,
                stored = self.repeat_time,
                derived = rule.period().as_millis(),
                "Stored repeat time disagrees with frequency and interval"
            );
            return Err(CoreError::InvariantViolation(
                "stored repeat time disagrees with frequency and interval",
            ));
        }
        Ok(rule)
    }
}

/// Insert and update payload; both paths write all three columns together.
#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = schema::event_repeat)]
pub struct NewEventRepeat {
    pub event_id: uuid::Uuid,
    pub frequency: Frequency,
    pub repeat_interval: i32,
    pub repeat_time: i64,
}

impl NewEventRepeat {
    #[must_use]
    pub fn from_rule(event_id: uuid::Uuid, rule: &RecurrenceRule) -> Self {
        Self {
            event_id,
            frequency: rule.frequency().into(),
            repeat_interval: rule.interval(),
            repeat_time: rule.period().as_millis(),
        }
    }
}
