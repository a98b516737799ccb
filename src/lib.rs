//! # Postboard
//!
//! Social-content backend: posts, comments, likes and user profiles over a
//! REST/JSON API.
//!
//! ## Architecture
//!
//! - **domain**: entities, creation DTOs and repository traits
//! - **application**: one service per aggregate, enforcing ownership,
//!   existence and uniqueness rules
//! - **infrastructure**: SeaORM persistence, the in-memory store, JWT and
//!   password hashing
//! - **interfaces**: axum handlers, auth middleware, OpenAPI document
//! - **shared**: pagination, request validation, errors, shutdown signalling

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::create_api_router;
