//! Chronos persistence layer: `PostgreSQL` schema, models and queries.

pub mod db;
pub mod error;
pub mod model;
