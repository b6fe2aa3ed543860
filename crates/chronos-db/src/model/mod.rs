pub mod calendar;
pub mod event;
pub mod session;
pub mod user;
