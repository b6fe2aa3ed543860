//! Shared building blocks for the Chronos calendar server.
//!
//! Everything in this crate is free of database and HTTP dependencies so it
//! can be unit tested in isolation.

pub mod config;
pub mod constants;
pub mod error;
pub mod pagination;
pub mod recurrence;
pub mod window;
