use std::str::FromStr;

use chronos_core::error::CoreError;
use chronos_core::recurrence::{Frequency, RecurrenceRule};
use chronos_db::db::enums::EventCategory;

use super::service::EventFields;
use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Checks an event payload and builds its recurrence rule, if any.
///
/// ## Errors
/// Returns `ValidationError` when
/// - the name is blank,
/// - a reminder carries an end instant or a recurrence,
/// - any other category lacks an end instant or ends before it starts,
/// - only one of frequency and interval is given, or either is invalid.
pub fn validate_event(fields: &EventFields) -> ServiceResult<Option<RecurrenceRule>> {
    if fields.name.trim().is_empty() {
        return Err(invalid("Name must not be empty"));
    }

    match (fields.category, fields.end_at) {
        (EventCategory::Reminder, Some(_)) => {
            return Err(invalid("A reminder must not have an end date"));
        }
        (EventCategory::Reminder, None) => {}
        (_, None) => return Err(invalid("End date is required")),
        (_, Some(end_at)) if end_at < fields.start_at => {
            return Err(invalid("End date must not be before start date"));
        }
        (_, Some(_)) => {}
    }

    let rule = match (fields.frequency.as_deref(), fields.interval) {
        (None, None) => None,
        (Some(frequency), Some(interval)) => {
            let frequency = Frequency::from_str(frequency).map_err(core_to_validation)?;
            Some(RecurrenceRule::new(frequency, interval).map_err(core_to_validation)?)
        }
        _ => {
            return Err(invalid(
                "If frequency is provided, interval must also be provided, and vice versa",
            ));
        }
    };

    if rule.is_some() && fields.category.is_reminder() {
        return Err(invalid("A reminder cannot repeat"));
    }

    Ok(rule)
}

fn invalid(message: &str) -> ServiceError {
    ServiceError::ValidationError(message.to_string())
}

fn core_to_validation(err: CoreError) -> ServiceError {
    ServiceError::ValidationError(err.to_string())
}
