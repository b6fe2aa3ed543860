//! Authentication flow.
//!
//! ## Module Organization
//!
//! - `authenticate`: Bearer token extraction and verification
//! - `depot`: Authenticated user handling in the Salvo depot
//! - `password`: Password hashing and verification with Argon2
//! - `service`: Register, login, refresh, logout, activation and password reset
//! - `session`: Refresh token persistence
//! - `token`: JWT issuing and verification

pub mod authenticate;
pub mod depot;
pub mod password;
pub mod service;
pub mod session;
pub mod token;

pub use depot::{DepotUser, depot_keys, get_user_from_depot, get_viewer_id};
pub use token::{Claims, TokenKind, TokenPair};
