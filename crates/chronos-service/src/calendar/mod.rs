//! Calendars and calendar invitations.

pub mod invitation;
pub mod service;

pub use service::{CalendarQuery, CreateCalendarRequest, UpdateCalendarRequest};
