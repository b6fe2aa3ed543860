//! Events: creation, editing and windowed listing of recurring entries.

pub mod listing;
pub mod service;
pub mod validate;

pub use listing::EventDetails;
pub use service::{CreateEventRequest, EventFields, EventListQuery};
