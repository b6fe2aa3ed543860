pub mod app;
pub mod config;
pub mod db_handler;
pub mod error;
pub mod mail_handler;
pub mod middleware;
