//! Chronos business logic: authentication, authorization policy and the
//! calendar, invitation, event and user services.

pub mod auth;
pub mod calendar;
pub mod error;
pub mod event;
pub mod mail;
pub mod policy;
pub mod user;
